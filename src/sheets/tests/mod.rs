//! Unit tests for the spreadsheet client.

mod construction_tests;

//! Inventory and sales store backed by the spreadsheet.
//!
//! Combines the spreadsheet client, the row codecs and the inventory rules.
//! Every call takes the caller's [`Session`](crate::auth::Session).

mod products;
mod reference;
mod sales;

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use log::{debug, info, warn};

use crate::error::{PosError, Result};
use crate::journal::SaleJournal;
use crate::sheets::SheetsApi;

pub use sales::{SaleReceipt, SalesData};

/// Spreadsheet-backed store for products, reference data and sales.
pub struct PosStore {
    pub(crate) api: SheetsApi,
    pub(crate) journal: SaleJournal,
    ids: IdGenerator,
    busy: AtomicBool,
}

impl PosStore {
    /// Creates a store with an in-memory sale journal.
    pub fn new(api: SheetsApi) -> Self {
        Self::with_journal(api, SaleJournal::in_memory())
    }

    pub fn with_journal(api: SheetsApi, journal: SaleJournal) -> Self {
        info!("Creating store for spreadsheet {}", api.spreadsheet_id());
        Self {
            api,
            journal,
            ids: IdGenerator::default(),
            busy: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &SheetsApi {
        &self.api
    }

    pub fn journal(&self) -> &SaleJournal {
        &self.journal
    }

    /// Claims the store for a submission. Fails while another one is running.
    pub(crate) fn begin_submission(&self) -> Result<SubmissionGuard<'_>> {
        if self.busy.swap(true, Ordering::SeqCst) {
            warn!("Submission rejected, another one is in flight");
            return Err(PosError::Busy);
        }
        Ok(SubmissionGuard { busy: &self.busy })
    }

    /// Next record id, strictly above `floor`.
    pub(crate) fn next_id(&self, floor: i64) -> i64 {
        self.ids.next_after(floor)
    }
}

/// Releases the busy flag when dropped.
pub(crate) struct SubmissionGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

/// Millisecond-timestamp ids that never go backwards within a process.
#[derive(Debug, Default)]
pub(crate) struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub(crate) fn next_after(&self, floor: i64) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let pick = |prev: i64| prev.max(floor).max(now - 1) + 1;
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| Some(pick(prev)))
            .unwrap_or_else(|prev| prev);
        let id = pick(prev);
        debug!("Assigned id {id}");
        id
    }
}

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

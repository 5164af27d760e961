//! Runtime configuration from environment variables.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `POS_SPREADSHEET_ID` | Spreadsheet document id (required) |
//! | `POS_ACCESS_TOKEN` | OAuth bearer token |
//! | `POS_SHEETS_BASE_URL` | API base URL, defaults to the public endpoint |
//! | `POS_JOURNAL_PATH` | Sale journal file |

use std::path::PathBuf;

use log::debug;

use crate::error::{PosError, Result};
use crate::journal::default_journal_path;
use crate::sheets::DEFAULT_BASE_URL;

pub const SPREADSHEET_ID_VAR: &str = "POS_SPREADSHEET_ID";
pub const ACCESS_TOKEN_VAR: &str = "POS_ACCESS_TOKEN";
pub const BASE_URL_VAR: &str = "POS_SHEETS_BASE_URL";
pub const JOURNAL_PATH_VAR: &str = "POS_JOURNAL_PATH";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub spreadsheet_id: String,
    pub base_url: String,
    pub journal_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let spreadsheet_id = get(SPREADSHEET_ID_VAR)
            .ok_or_else(|| PosError::Config(format!("{SPREADSHEET_ID_VAR} is not set")))?;
        let base_url = get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let journal_path = get(JOURNAL_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_journal_path);

        let config = Config {
            spreadsheet_id,
            base_url,
            journal_path,
        };
        debug!("Configuration: {config:?}");
        Ok(config)
    }
}

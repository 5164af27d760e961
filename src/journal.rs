//! Sale write journal.
//!
//! Recording a sale takes four separate writes with no transaction around
//! them. The journal remembers, per sale id, which of those writes already
//! landed, so resubmitting a sale after a partial failure only performs the
//! missing steps and never appends the same rows twice.
//!
//! - Entries are keyed by sale id and never removed.
//! - Once every step of a sale is done its payload is dropped; only the id,
//!   timestamp and completed steps stay, so the file grows by a few bytes per
//!   finished sale.
//! - The journal file is rewritten after every change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{PosError, Result};
use crate::models::SalePayload;

/// One write of the sale recording sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SaleStep {
    SaleRow,
    Details,
    Payments,
    Stock,
}

impl SaleStep {
    pub const ALL: [SaleStep; 4] = [
        SaleStep::SaleRow,
        SaleStep::Details,
        SaleStep::Payments,
        SaleStep::Stock,
    ];
}

/// Progress of one sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub sale_id: String,
    pub timestamp: String,
    /// Data still to be written. `None` once the sale is complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<SalePayload>,
    pub completed: Vec<SaleStep>,
}

impl JournalEntry {
    pub fn is_done(&self, step: SaleStep) -> bool {
        self.completed.contains(&step)
    }

    pub fn is_complete(&self) -> bool {
        SaleStep::ALL.iter().all(|step| self.is_done(*step))
    }

    fn compact(&mut self) {
        if self.is_complete() {
            self.payload = None;
        }
    }
}

/// Journal of sale submissions, optionally backed by a JSON file.
#[derive(Debug)]
pub struct SaleJournal {
    path: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, JournalEntry>>,
}

/// Returns the default journal path: <data dir>/phone_shop_pos/sale_journal.json
pub fn default_journal_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("phone_shop_pos")
        .join("sale_journal.json")
}

impl SaleJournal {
    /// Journal that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Opens (or creates) a journal file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PosError::Journal(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }

        let mut entries: BTreeMap<String, JournalEntry> = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| PosError::Journal(format!("cannot read {}: {e}", path.display())))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    PosError::Journal(format!("corrupt journal {}: {e}", path.display()))
                })?
            }
        } else {
            BTreeMap::new()
        };

        entries.values_mut().for_each(JournalEntry::compact);

        info!(
            "Sale journal: {} ({} entries)",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path: Some(path),
            entries: Mutex::new(entries),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, JournalEntry>>> {
        self.entries
            .lock()
            .map_err(|_| PosError::Journal("journal lock poisoned".to_string()))
    }

    fn persist(&self, entries: &BTreeMap<String, JournalEntry>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| PosError::Journal(format!("cannot serialize journal: {e}")))?;
        std::fs::write(path, content)
            .map_err(|e| PosError::Journal(format!("cannot write {}: {e}", path.display())))
    }

    /// Registers a new sale. An existing entry with the same id is kept as is.
    pub fn begin(&self, sale_id: &str, timestamp: &str, payload: &SalePayload) -> Result<JournalEntry> {
        let mut entries = self.lock()?;
        if let Some(existing) = entries.get(sale_id) {
            debug!("Sale {sale_id} already journaled: {:?}", existing.completed);
            return Ok(existing.clone());
        }
        let entry = JournalEntry {
            sale_id: sale_id.to_string(),
            timestamp: timestamp.to_string(),
            payload: Some(payload.clone()),
            completed: Vec::new(),
        };
        entries.insert(sale_id.to_string(), entry.clone());
        self.persist(&entries)?;
        debug!("Sale {sale_id} journaled");
        Ok(entry)
    }

    /// Marks `step` of `sale_id` as written.
    pub fn mark(&self, sale_id: &str, step: SaleStep) -> Result<()> {
        let mut entries = self.lock()?;
        let Some(entry) = entries.get_mut(sale_id) else {
            warn!("Marking {step:?} for unknown sale {sale_id}");
            return Err(PosError::Journal(format!("sale {sale_id} is not journaled")));
        };
        if !entry.completed.contains(&step) {
            entry.completed.push(step);
            entry.completed.sort();
        }
        entry.compact();
        debug!("Sale {sale_id}: {step:?} done");
        self.persist(&entries)
    }

    pub fn get(&self, sale_id: &str) -> Result<Option<JournalEntry>> {
        Ok(self.lock()?.get(sale_id).cloned())
    }

    /// Sales with at least one step still missing.
    pub fn pending(&self) -> Result<Vec<JournalEntry>> {
        Ok(self
            .lock()?
            .values()
            .filter(|entry| !entry.is_complete())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;

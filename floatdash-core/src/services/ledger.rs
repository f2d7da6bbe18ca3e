//! services/ledger.rs
//!
//! The per-day usage ledger and the storage scopes that hold it.
//! - One scope per catalog kind; scopes never share state.
//! - Reads return absent-or-value; writes overwrite wholesale (no merging).
//! - The file scope keeps the ledger as pretty JSON next to the archive.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{PickResult, PickerError};
use crate::utils::fsio::write_atomic;

/// Keys already issued on `date`. A ledger whose `date` is not today is stale
/// and treated as empty by the picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLedger {
    #[serde(default)]
    pub date: String,
    // Older ledgers named the list after the catalog kind.
    #[serde(default, alias = "usedQuotes", alias = "usedWords")]
    pub used_keys: Vec<String>,
}

impl DailyLedger {
    pub fn new(date: impl Into<String>, used_keys: Vec<String>) -> Self {
        Self {
            date: date.into(),
            used_keys,
        }
    }

    pub fn is_for(&self, day: &str) -> bool {
        self.date == day
    }

    pub fn contains(&self, key: &str) -> bool {
        self.used_keys.iter().any(|k| k == key)
    }
}

/// Read/write capability over one ledger.
pub trait LedgerStore {
    /// Current ledger, or `None` if nothing has been stored yet.
    fn read(&self) -> PickResult<Option<DailyLedger>>;

    /// Replace the stored ledger.
    fn write(&self, ledger: &DailyLedger) -> PickResult<()>;
}

impl<T: LedgerStore + ?Sized> LedgerStore for &T {
    fn read(&self) -> PickResult<Option<DailyLedger>> {
        (**self).read()
    }

    fn write(&self, ledger: &DailyLedger) -> PickResult<()> {
        (**self).write(ledger)
    }
}

/// Ledger kept in a single JSON file, e.g. `saved-quotes/used-quotes.json`.
#[derive(Debug, Clone)]
pub struct FileLedgerStore {
    path: PathBuf,
}

impl FileLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for FileLedgerStore {
    fn read(&self) -> PickResult<Option<DailyLedger>> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PickerError::storage_with_source(
                    format!("read ledger {}", self.path.display()),
                    e,
                ));
            }
        };
        let ledger = serde_json::from_slice::<DailyLedger>(&bytes).map_err(|e| {
            PickerError::storage_with_source(format!("parse ledger {}", self.path.display()), e)
        })?;
        Ok(Some(ledger))
    }

    fn write(&self, ledger: &DailyLedger) -> PickResult<()> {
        let bytes = serde_json::to_vec_pretty(ledger)
            .map_err(|e| PickerError::storage_with_source("serialize ledger", e))?;
        write_atomic(&self.path, &bytes).map_err(|e| {
            PickerError::storage_with_source(format!("write ledger {}", self.path.display()), e)
        })
    }
}

/// In-process ledger; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    slot: Mutex<Option<DailyLedger>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: DailyLedger) -> Self {
        Self {
            slot: Mutex::new(Some(ledger)),
        }
    }

    /// Copy of the stored ledger.
    pub fn snapshot(&self) -> Option<DailyLedger> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn read(&self) -> PickResult<Option<DailyLedger>> {
        Ok(self.snapshot())
    }

    fn write(&self, ledger: &DailyLedger) -> PickResult<()> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(ledger.clone());
        Ok(())
    }
}

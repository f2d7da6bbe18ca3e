// src/services/mod.rs

pub mod archive;      // write-only dated snapshots
pub mod catalog;      // fixed item lists (quotes, words)
pub mod ledger;       // per-day used-keys storage scopes

// Public API
pub use archive::{ArchiveRecord, ArchiveSink, DailyArchive, MemoryArchive, NullArchive};
pub use catalog::{Catalog, CatalogItem, CatalogKind};
pub use ledger::{DailyLedger, FileLedgerStore, LedgerStore, MemoryLedgerStore};

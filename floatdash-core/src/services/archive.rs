// src/services/archive.rs
//! Archive: dated, human-inspectable snapshots of each day's selection.
//!
//! - Files are stored under `<dir>/<prefix>_<day>.json`, e.g.
//!   `saved-quotes/quotes_Sun_Oct_18_2026.json`.
//! - **Write-only.** The picker never reads these back; they are an audit trail.
//! - A second pick on the same day overwrites the file, so it always holds the
//!   day's latest selection.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{PickResult, PickerError};
use crate::services::catalog::CatalogKind;
use crate::utils::fsio::write_atomic;

/// One archived selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    pub date: String,
    pub key: String,
    pub payload: String,
    pub fetched_at: DateTime<Utc>,
}

/// Append-style, date-keyed write target.
pub trait ArchiveSink {
    fn record(&self, record: &ArchiveRecord) -> PickResult<()>;
}

impl<T: ArchiveSink + ?Sized> ArchiveSink for &T {
    fn record(&self, record: &ArchiveRecord) -> PickResult<()> {
        (**self).record(record)
    }
}

/// Filesystem archive, one JSON file per day.
#[derive(Debug, Clone)]
pub struct DailyArchive {
    /// Directory where day files are written, e.g. `.floatdash/saved-quotes/`
    dir: PathBuf,
    kind: CatalogKind,
}

impl DailyArchive {
    pub fn new(dir: impl Into<PathBuf>, kind: CatalogKind) -> Self {
        Self {
            dir: dir.into(),
            kind,
        }
    }

    /// Path of the archive file for `day` (whitespace runs become `_`).
    pub fn path_for(&self, day: &str) -> PathBuf {
        let stem = day.split_whitespace().collect::<Vec<_>>().join("_");
        self.dir
            .join(format!("{}_{}.json", self.kind.archive_prefix(), stem))
    }

    fn render(&self, record: &ArchiveRecord) -> Value {
        let (key_field, payload_field) = self.kind.archive_fields();
        let mut obj = Map::new();
        obj.insert("date".into(), Value::String(record.date.clone()));
        obj.insert(key_field.into(), Value::String(record.key.clone()));
        obj.insert(payload_field.into(), Value::String(record.payload.clone()));
        obj.insert(
            "fetchedAt".into(),
            Value::String(record.fetched_at.to_rfc3339()),
        );
        Value::Object(obj)
    }
}

impl ArchiveSink for DailyArchive {
    fn record(&self, record: &ArchiveRecord) -> PickResult<()> {
        let path = self.path_for(&record.date);
        let bytes = serde_json::to_vec_pretty(&self.render(record))
            .map_err(|e| PickerError::storage_with_source("serialize archive record", e))?;
        write_atomic(&path, &bytes).map_err(|e| {
            PickerError::storage_with_source(format!("write archive {}", path.display()), e)
        })
    }
}

/// Sink that drops every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullArchive;

impl ArchiveSink for NullArchive {
    fn record(&self, _record: &ArchiveRecord) -> PickResult<()> {
        Ok(())
    }
}

/// Sink that keeps records in memory, in write order.
#[derive(Debug, Default)]
pub struct MemoryArchive {
    records: Mutex<Vec<ArchiveRecord>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ArchiveRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ArchiveSink for MemoryArchive {
    fn record(&self, record: &ArchiveRecord) -> PickResult<()> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record.clone());
        Ok(())
    }
}

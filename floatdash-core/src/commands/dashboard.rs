// src/commands/dashboard.rs
use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Display;
use std::path::Path;

use crate::commands::init::ensure_initialized;
use crate::config::CoreConfig;
use crate::error::{CatalogError, PickResult};
use crate::picker::DailyPicker;
use crate::services::archive::DailyArchive;
use crate::services::catalog::{Catalog, CatalogItem, CatalogKind};
use crate::services::ledger::{DailyLedger, FileLedgerStore, LedgerStore};
use crate::utils::logbook::emit_event_best_effort;

/// Whether a [`DailyContent`] came from a live pick or the static fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Picked,
    Fallback,
}

/// What the dashboard shows: `primary`/`secondary` are text/author for
/// quotes and word/meaning for words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyContent {
    pub primary: String,
    pub secondary: String,
    pub source: ContentSource,
}

impl DailyContent {
    fn from_item(item: CatalogItem, source: ContentSource) -> Self {
        Self {
            primary: item.key,
            secondary: item.payload,
            source,
        }
    }
}

type FilePicker = DailyPicker<FileLedgerStore, DailyArchive>;

struct Feed {
    picker: FilePicker,
    // Loaded once; a failed load is kept so every call falls back.
    catalog: std::result::Result<Catalog, CatalogError>,
}

impl Feed {
    fn open(config: &CoreConfig, kind: CatalogKind) -> Self {
        let catalog = Catalog::load(kind, config.catalog_path(kind));
        if let Err(e) = &catalog {
            tracing::warn!(kind = %kind, error = %e, "catalog failed to load; serving fallback");
        }
        let picker = DailyPicker::new(
            kind,
            FileLedgerStore::new(config.ledger_path(kind)),
            DailyArchive::new(config.storage.state_dir.clone(), kind),
        );
        Self { picker, catalog }
    }
}

/// Quote-of-the-day and word-of-the-day over file-backed storage.
///
/// Never fails a request: any picker or catalog error is logged and replaced by
/// the kind's static fallback item.
pub struct Dashboard {
    config: CoreConfig,
    quotes: Feed,
    words: Feed,
}

impl Dashboard {
    /// Bootstrap `root` (idempotent), load its config and both catalogs.
    pub fn open(root: &Path) -> Result<Self> {
        let report = ensure_initialized(root)?;
        let config = CoreConfig::load(&report.root)?;
        Ok(Self::from_config(config))
    }

    /// Open a workspace that must already exist; nothing is created.
    pub fn open_existing(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            anyhow::bail!("workspace {} does not exist (run init first)", root.display());
        }
        let config = CoreConfig::load(root)?;
        Ok(Self::from_config(config))
    }

    /// Build from an already-resolved config. Catalogs are read here, once.
    pub fn from_config(config: CoreConfig) -> Self {
        let quotes = Feed::open(&config, CatalogKind::Quotes);
        let words = Feed::open(&config, CatalogKind::Words);
        Self {
            config,
            quotes,
            words,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    fn feed(&self, kind: CatalogKind) -> &Feed {
        match kind {
            CatalogKind::Quotes => &self.quotes,
            CatalogKind::Words => &self.words,
        }
    }

    pub fn quote_of_the_day(&self) -> DailyContent {
        self.content_of_the_day(CatalogKind::Quotes)
    }

    pub fn word_of_the_day(&self) -> DailyContent {
        self.content_of_the_day(CatalogKind::Words)
    }

    pub fn content_of_the_day(&self, kind: CatalogKind) -> DailyContent {
        self.content_at(kind, Local::now(), &mut rand::thread_rng())
    }

    /// Same as [`Dashboard::content_of_the_day`] with an explicit clock and RNG.
    pub fn content_at<Tz, R>(
        &self,
        kind: CatalogKind,
        now: DateTime<Tz>,
        rng: &mut R,
    ) -> DailyContent
    where
        Tz: TimeZone,
        Tz::Offset: Display,
        R: Rng + ?Sized,
    {
        let feed = self.feed(kind);
        let ts = now.with_timezone(&Utc).to_rfc3339();

        let outcome = match &feed.catalog {
            Ok(catalog) => feed.picker.pick_at(catalog, now, rng).map_err(|e| describe(&e)),
            Err(e) => Err(describe(e)),
        };

        match outcome {
            Ok(selection) => {
                self.log_event(
                    "picked",
                    json!({
                        "kind": kind.as_str(),
                        "key": selection.item.key,
                        "date": selection.ledger.date,
                        "used": selection.ledger.used_keys.len(),
                    }),
                    &ts,
                );
                DailyContent::from_item(selection.item, ContentSource::Picked)
            }
            Err(reason) => {
                tracing::warn!(kind = %kind, error = %reason, "daily pick failed; serving fallback");
                self.log_event(
                    "fallback",
                    json!({ "kind": kind.as_str(), "reason": reason }),
                    &ts,
                );
                DailyContent::from_item(kind.fallback_item(), ContentSource::Fallback)
            }
        }
    }

    /// The stored ledger for `kind`, as the picker would read it.
    pub fn ledger(&self, kind: CatalogKind) -> PickResult<Option<DailyLedger>> {
        self.feed(kind).picker.ledger_store().read()
    }

    /// The loaded catalog for `kind`, or the load error.
    pub fn catalog(&self, kind: CatalogKind) -> std::result::Result<&Catalog, &CatalogError> {
        self.feed(kind).catalog.as_ref()
    }

    fn log_event(&self, event: &str, data: serde_json::Value, ts: &str) {
        if self.config.logbook.enabled {
            emit_event_best_effort(&self.config.logbook_file(), event, data, ts);
        }
    }
}

/// `error: cause: cause...` on one line, for logs and the logbook.
fn describe(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut cur = err.source();
    while let Some(cause) = cur {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        cur = cause.source();
    }
    out
}

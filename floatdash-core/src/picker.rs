//! picker.rs
//!
//! Daily rotating selection over a fixed catalog.
//!
//! One pick = read ledger → (rollover?) → scan for the first unused key →
//! (exhaustion? random item, fresh cycle) → write ledger → write archive.
//! The ledger write strictly precedes the archive write; if the ledger cannot
//! be written the archive is never touched.

use chrono::{DateTime, Local, TimeZone, Utc};
use rand::Rng;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Mutex;

use crate::error::{PickResult, PickerError};
use crate::services::archive::{ArchiveRecord, ArchiveSink};
use crate::services::catalog::{Catalog, CatalogItem, CatalogKind};
use crate::services::ledger::{DailyLedger, LedgerStore};

/// Calendar-day identity used as the ledger date, e.g. `Sun Oct 18 2026`.
pub fn day_key<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%a %b %d %Y").to_string()
}

/// Result of one pick: the chosen item and the ledger that was persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub item: CatalogItem,
    pub ledger: DailyLedger,
}

/// Picks one catalog item per call without repeats inside a calendar day.
///
/// Quotes and words are two instances of this type, each with its own ledger
/// scope and archive sink. Calls on one instance are serialised so the
/// read-modify-write of the ledger is a single unit.
#[derive(Debug)]
pub struct DailyPicker<L, A> {
    kind: CatalogKind,
    ledger: L,
    archive: A,
    gate: Mutex<()>,
}

impl<L: LedgerStore, A: ArchiveSink> DailyPicker<L, A> {
    pub fn new(kind: CatalogKind, ledger: L, archive: A) -> Self {
        Self {
            kind,
            ledger,
            archive,
            gate: Mutex::new(()),
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn ledger_store(&self) -> &L {
        &self.ledger
    }

    pub fn archive_sink(&self) -> &A {
        &self.archive
    }

    /// Pick today's item using local time and the thread RNG.
    pub fn pick_for_today(&self, catalog: &Catalog) -> PickResult<Selection> {
        self.pick_at(catalog, Local::now(), &mut rand::thread_rng())
    }

    /// Pick as of `now`. `rng` is only consulted when the catalog is exhausted.
    ///
    /// # Errors
    /// * [`PickerError::EmptyCatalog`] — `catalog` has no items; storage is not touched.
    /// * [`PickerError::Storage`] — the ledger could not be read or written, or
    ///   the archive could not be written.
    pub fn pick_at<Tz, R>(
        &self,
        catalog: &Catalog,
        now: DateTime<Tz>,
        rng: &mut R,
    ) -> PickResult<Selection>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
        R: Rng + ?Sized,
    {
        if catalog.is_empty() {
            return Err(PickerError::EmptyCatalog);
        }

        // The guarded value is `()`, so a poisoned lock carries no broken state.
        let _gate = self
            .gate
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let today = day_key(&now);
        let mut used = match self.ledger.read()? {
            Some(ledger) if ledger.is_for(&today) => ledger.used_keys,
            Some(stale) => {
                tracing::info!(
                    kind = %self.kind,
                    from = %stale.date,
                    to = %today,
                    "daily ledger rolled over"
                );
                Vec::new()
            }
            None => Vec::new(),
        };

        // Keys dropped from the catalog since they were issued are forgotten.
        let in_catalog: HashSet<&str> = catalog.iter().map(|item| item.key.as_str()).collect();
        used.retain(|key| in_catalog.contains(key.as_str()));

        let unused = {
            let seen: HashSet<&str> = used.iter().map(String::as_str).collect();
            catalog
                .iter()
                .find(|item| !seen.contains(item.key.as_str()))
                .cloned()
        };
        let item = match unused {
            Some(item) => item,
            None => {
                let idx = rng.gen_range(0..catalog.len());
                tracing::info!(
                    kind = %self.kind,
                    size = catalog.len(),
                    "catalog exhausted for today; starting a new cycle"
                );
                used.clear();
                catalog.items()[idx].clone()
            }
        };

        used.push(item.key.clone());
        let ledger = DailyLedger::new(today.clone(), used);
        self.ledger.write(&ledger)?;

        self.archive.record(&ArchiveRecord {
            date: today,
            key: item.key.clone(),
            payload: item.payload.clone(),
            fetched_at: now.with_timezone(&Utc),
        })?;

        tracing::debug!(
            kind = %self.kind,
            key = %item.key,
            used = ledger.used_keys.len(),
            "picked daily item"
        );
        Ok(Selection { item, ledger })
    }
}

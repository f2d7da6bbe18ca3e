//! services/catalog.rs
//!
//! Fixed, read-only catalogs of selectable items.
//! - A catalog is an ordered list; insertion order is scan order for the picker.
//! - Two kinds exist: quotes (`text`/`author`) and words (`word`/`meaning`).
//! - Files are validated once at load time; the picker never re-reads them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::CatalogError;

const EMBEDDED_QUOTES: &str = include_str!("../../assets/quotes.json");
const EMBEDDED_WORDS: &str = include_str!("../../assets/words.json");

/// Which catalog a picker instance serves. Each kind carries its own file
/// names, JSON field names and static fallback item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Quotes,
    Words,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 2] = [CatalogKind::Quotes, CatalogKind::Words];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Quotes => "quotes",
            CatalogKind::Words => "words",
        }
    }

    /// Field names of one entry in the catalog file: `(key, payload)`.
    pub fn catalog_fields(&self) -> (&'static str, &'static str) {
        match self {
            CatalogKind::Quotes => ("text", "author"),
            CatalogKind::Words => ("word", "meaning"),
        }
    }

    /// Field names used in the dated archive record: `(key, payload)`.
    pub fn archive_fields(&self) -> (&'static str, &'static str) {
        match self {
            CatalogKind::Quotes => ("quote", "author"),
            CatalogKind::Words => ("word", "meaning"),
        }
    }

    pub fn catalog_file_name(&self) -> &'static str {
        match self {
            CatalogKind::Quotes => "quotes.json",
            CatalogKind::Words => "words.json",
        }
    }

    pub fn ledger_file_name(&self) -> &'static str {
        match self {
            CatalogKind::Quotes => "used-quotes.json",
            CatalogKind::Words => "used-words.json",
        }
    }

    /// Prefix of the per-day archive files, e.g. `quotes_Sun_Oct_18_2026.json`.
    pub fn archive_prefix(&self) -> &'static str {
        self.as_str()
    }

    /// Static item served when a live pick is impossible.
    pub fn fallback_item(&self) -> CatalogItem {
        match self {
            CatalogKind::Quotes => CatalogItem::new(
                "The only way to do great work is to love what you do.",
                "Steve Jobs",
            ),
            CatalogKind::Words => CatalogItem::new(
                "Serendipity",
                "The occurrence of events by chance in a happy or beneficial way; finding good things by luck.",
            ),
        }
    }

    fn embedded_text(&self) -> &'static str {
        match self {
            CatalogKind::Quotes => EMBEDDED_QUOTES,
            CatalogKind::Words => EMBEDDED_WORDS,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quotes" | "quote" => Ok(CatalogKind::Quotes),
            "words" | "word" => Ok(CatalogKind::Words),
            other => Err(format!("unknown catalog kind: {other} (expected quotes|words)")),
        }
    }
}

/// One selectable entry: `key` identifies it (quote text, word) and `payload`
/// rides along (author, meaning).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub key: String,
    pub payload: String,
}

impl CatalogItem {
    pub fn new(key: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
        }
    }
}

/// Ordered, read-only list of catalog items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Build a catalog from items already in memory. No validation beyond what
    /// the caller did; use [`Catalog::load`] for untrusted input.
    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// Load and validate a catalog file for `kind`.
    ///
    /// The file is a JSON array of objects carrying the kind's two string
    /// fields. Empty keys and duplicate keys are rejected; an empty array is
    /// accepted and yields an empty catalog.
    pub fn load(kind: CatalogKind, path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(kind, &value)
    }

    /// The default catalog bundled with the crate.
    pub fn embedded(kind: CatalogKind) -> Result<Self, CatalogError> {
        let value: Value =
            serde_json::from_str(kind.embedded_text()).map_err(|source| CatalogError::Parse {
                path: format!("<embedded {kind}>").into(),
                source,
            })?;
        Self::from_json(kind, &value)
    }

    /// Raw text of the bundled catalog, for seeding a fresh workspace.
    pub fn embedded_text(kind: CatalogKind) -> &'static str {
        kind.embedded_text()
    }

    fn from_json(kind: CatalogKind, value: &Value) -> Result<Self, CatalogError> {
        let entries = value.as_array().ok_or_else(|| CatalogError::Invalid {
            index: 0,
            reason: "catalog must be a JSON array".to_string(),
        })?;
        let (key_field, payload_field) = kind.catalog_fields();

        let mut seen = HashSet::with_capacity(entries.len());
        let mut items = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let field = |name: &str| -> Result<String, CatalogError> {
                entry
                    .get(name)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| CatalogError::Invalid {
                        index,
                        reason: format!("missing string field `{name}`"),
                    })
            };
            let key = field(key_field)?;
            let payload = field(payload_field)?;
            if key.trim().is_empty() {
                return Err(CatalogError::Invalid {
                    index,
                    reason: format!("`{key_field}` is empty"),
                });
            }
            if !seen.insert(key.clone()) {
                return Err(CatalogError::Invalid {
                    index,
                    reason: format!("duplicate {key_field}: {key}"),
                });
            }
            items.push(CatalogItem { key, payload });
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogItem> {
        self.items.iter()
    }
}

impl FromIterator<CatalogItem> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

//! Error types surfaced by the daily picker and the catalog loader.
//!
//! The picker reports two distinguishable failure kinds so the calling layer
//! can swap in a static fallback item instead of failing the request.

use std::path::PathBuf;

/// Result alias for picker operations.
pub type PickResult<T> = std::result::Result<T, PickerError>;

/// Errors raised by [`crate::picker::DailyPicker`] and its storage seams.
#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    /// The catalog handed to the picker had no items.
    #[error("catalog is empty")]
    EmptyCatalog,

    /// The ledger or archive could not be read or written.
    #[error("storage error: {message}")]
    Storage {
        /// What was being attempted.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PickerError {
    /// Creates a storage error without an underlying cause.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a storage error wrapping an underlying cause.
    #[must_use]
    pub fn storage_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    pub fn is_empty_catalog(&self) -> bool {
        matches!(self, Self::EmptyCatalog)
    }
}

/// Errors raised while loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("reading catalog {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing catalog {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but an entry failed validation.
    #[error("invalid catalog entry #{index}: {reason}")]
    Invalid { index: usize, reason: String },
}

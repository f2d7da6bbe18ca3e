//! Daily rotating content for the floating dashboard.
//!
//! [`picker::DailyPicker`] returns one catalog item per call, never repeating
//! within a calendar day until the catalog is exhausted, and persists its
//! ledger so restarts see the same sequence. [`commands::Dashboard`] wires two
//! pickers (quotes, words) to files on disk and substitutes a static item when
//! a pick fails.

pub mod commands;
pub mod config;
pub mod error;
pub mod picker;
pub mod services;
pub mod utils;

pub use error::{CatalogError, PickResult, PickerError};
pub use picker::{DailyPicker, Selection, day_key};

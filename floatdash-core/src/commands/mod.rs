// src/commands/mod.rs
pub mod init;
mod dashboard;

pub use dashboard::{ContentSource, DailyContent, Dashboard};

pub use init::{InitReport, ensure_initialized, resolve_root};

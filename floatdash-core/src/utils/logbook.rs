// src/utils/logbook.rs
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::{fs, io::Write, path::Path};

#[derive(Serialize)]
struct EventLine<'a> {
    timestamp: &'a str,
    event: &'a str,
    data: Value,
}

/// Append one `{timestamp, event, data}` line to the JSONL file at `log_path`.
pub fn emit_event(log_path: &Path, event: &str, data: Value, ts: &str) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create logbook dir {}", parent.display()))?;
    }
    let line = EventLine {
        timestamp: ts,
        event,
        data,
    };
    let json = serde_json::to_string(&line)?;
    let mut f = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("open logbook {}", log_path.display()))?;
    writeln!(f, "{}", json)?;
    Ok(())
}

/// Like [`emit_event`] but never fails; errors are reported through tracing.
pub fn emit_event_best_effort(log_path: &Path, event: &str, data: Value, ts: &str) {
    if let Err(e) = emit_event(log_path, event, data, ts) {
        tracing::warn!(error = %e, event, "logbook append failed");
    }
}

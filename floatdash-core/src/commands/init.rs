// floatdash-core/src/commands/init.rs

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::catalog::{Catalog, CatalogKind};
use crate::utils::fsio::write_atomic;

#[derive(Debug, Clone)]
pub struct InitReport {
    pub root: PathBuf,
    pub created: Vec<String>,
    pub existed: Vec<String>,
}

/// Resolve the workspace root: explicit path, then `FLOATDASH_ROOT`, then `.floatdash`.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    std::env::var_os("FLOATDASH_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".floatdash"))
}

/// Ensure the workspace layout exists (idempotent). Existing files are never
/// overwritten, so edited catalogs and config survive re-initialisation.
pub fn ensure_initialized(root: &Path) -> Result<InitReport> {
    let root = root.to_path_buf();
    let mut created = Vec::new();
    let mut existed = Vec::new();

    // Directories
    ensure_dir(&root, "", &mut created, &mut existed)?;
    ensure_dir(&root, "catalogs", &mut created, &mut existed)?;
    ensure_dir(&root, "saved-quotes", &mut created, &mut existed)?;
    ensure_dir(&root, "logbook", &mut created, &mut existed)?;

    // Config
    ensure_file(
        &root,
        "config.toml",
        DEFAULT_CONFIG_TOML,
        &mut created,
        &mut existed,
    )?;

    // Seed catalogs from the bundled defaults
    for kind in CatalogKind::ALL {
        let rel = format!("catalogs/{}", kind.catalog_file_name());
        ensure_file(
            &root,
            &rel,
            Catalog::embedded_text(kind),
            &mut created,
            &mut existed,
        )?;
    }

    tracing::debug!(
        root = %root.display(),
        created = created.len(),
        existed = existed.len(),
        "workspace initialized"
    );
    Ok(InitReport {
        root,
        created,
        existed,
    })
}

fn ensure_dir(
    base: &Path,
    rel: &str,
    created: &mut Vec<String>,
    existed: &mut Vec<String>,
) -> Result<()> {
    let p = if rel.is_empty() { base.to_path_buf() } else { base.join(rel) };
    let label = if rel.is_empty() { ".".to_string() } else { rel.to_string() };
    if p.exists() {
        existed.push(label);
        return Ok(());
    }
    fs::create_dir_all(&p).with_context(|| format!("create_dir_all({:?})", p))?;
    created.push(label);
    Ok(())
}

fn ensure_file(
    base: &Path,
    rel_file: &str,
    content_if_absent: &str,
    created: &mut Vec<String>,
    existed: &mut Vec<String>,
) -> Result<()> {
    let p = base.join(rel_file);
    if p.exists() {
        existed.push(rel_file.to_string());
        return Ok(());
    }
    write_atomic(&p, content_if_absent.as_bytes())
        .with_context(|| format!("write {:?}", p))?;
    created.push(rel_file.to_string());
    Ok(())
}

// ---------- defaults ----------

const DEFAULT_CONFIG_TOML: &str = r#"[catalogs]
quotes = "catalogs/quotes.json"
words = "catalogs/words.json"

[storage]
# Ledgers (used-quotes.json, used-words.json) and daily archive files.
state_dir = "saved-quotes"

[logbook]
path = "logbook"
events = "events.jsonl"
enabled = true
"#;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::catalog::CatalogKind;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub catalogs: CatalogsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logbook: LogbookConfig,
}

impl CoreConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("config.toml");
        let mut cfg = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str::<CoreConfig>(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        } else {
            tracing::info!(
                "No config file found at {}. Using CoreConfig::default().",
                path.display()
            );
            CoreConfig::default()
        };
        cfg.resolve_paths(root);
        Ok(cfg)
    }

    fn resolve_paths(&mut self, root: &Path) {
        self.catalogs.quotes = absolutize(root, &self.catalogs.quotes);
        self.catalogs.words = absolutize(root, &self.catalogs.words);
        self.storage.state_dir = absolutize(root, &self.storage.state_dir);
        self.logbook.path = absolutize(root, &self.logbook.path);
    }

    pub fn catalog_path(&self, kind: CatalogKind) -> &Path {
        match kind {
            CatalogKind::Quotes => &self.catalogs.quotes,
            CatalogKind::Words => &self.catalogs.words,
        }
    }

    pub fn ledger_path(&self, kind: CatalogKind) -> PathBuf {
        self.storage.state_dir.join(kind.ledger_file_name())
    }

    pub fn logbook_file(&self) -> PathBuf {
        self.logbook.path.join(&self.logbook.events)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogsConfig {
    #[serde(default = "CatalogsConfig::default_quotes")]
    pub quotes: PathBuf,
    #[serde(default = "CatalogsConfig::default_words")]
    pub words: PathBuf,
}

impl CatalogsConfig {
    fn default_quotes() -> PathBuf {
        PathBuf::from("catalogs").join(CatalogKind::Quotes.catalog_file_name())
    }

    fn default_words() -> PathBuf {
        PathBuf::from("catalogs").join(CatalogKind::Words.catalog_file_name())
    }
}

impl Default for CatalogsConfig {
    fn default() -> Self {
        Self {
            quotes: Self::default_quotes(),
            words: Self::default_words(),
        }
    }
}

/// Where ledgers and daily archive files live. Both kinds share the directory;
/// file names keep them apart.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_state_dir")]
    pub state_dir: PathBuf,
}

impl StorageConfig {
    fn default_state_dir() -> PathBuf {
        PathBuf::from("saved-quotes")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_dir: Self::default_state_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogbookConfig {
    #[serde(default = "LogbookConfig::default_path")]
    pub path: PathBuf,
    #[serde(default = "LogbookConfig::default_events")]
    pub events: PathBuf,
    #[serde(default = "LogbookConfig::default_enabled")]
    pub enabled: bool,
}

impl LogbookConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("logbook")
    }

    fn default_events() -> PathBuf {
        PathBuf::from("events.jsonl")
    }

    fn default_enabled() -> bool {
        true
    }
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            events: Self::default_events(),
            enabled: Self::default_enabled(),
        }
    }
}

fn absolutize(root: &Path, value: &Path) -> PathBuf {
    if value.is_absolute() {
        value.to_path_buf()
    } else {
        root.join(value)
    }
}

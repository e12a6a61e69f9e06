// src/config.rs
//! Runtime settings for the readiness binary.
//!
//! Load order:
//! 1) `$READINESS_CONFIG_PATH` (must exist if set)
//! 2) `config/readiness.toml`
//! 3) built-in defaults
//!
//! Then env overrides: `READINESS_STORE`, `READINESS_CACHE_DIR`, `READINESS_LOG`,
//! `READINESS_LOG_FORMAT`.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::{JsonFileStore, MemoryStore, ScoreStore};

pub const ENV_CONFIG_PATH: &str = "READINESS_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/readiness.toml";

const ENV_STORE: &str = "READINESS_STORE";
const ENV_CACHE_DIR: &str = "READINESS_CACHE_DIR";
const ENV_LOG: &str = "READINESS_LOG";
const ENV_LOG_FORMAT: &str = "READINESS_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    File,
}

impl StoreKind {
    fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreKind::Memory),
            "file" | "json" => Ok(StoreKind::File),
            other => bail!("unknown store kind: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

fn default_store() -> StoreKind {
    StoreKind::File
}
fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache/scores")
}
fn default_log_filter() -> String {
    "site_readiness=info,warn".to_string()
}
fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_store")]
    pub store: StoreKind,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: default_store(),
            cache_dir: default_cache_dir(),
            log_filter: default_log_filter(),
            log_format: default_log_format(),
        }
    }
}

impl Settings {
    /// Parse a TOML file. Missing keys fall back to defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// File lookup per the module docs, then env overrides.
    pub fn load_default() -> Result<Self> {
        let mut settings = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
            if fallback.exists() {
                Self::load_from(&fallback)?
            } else {
                Self::default()
            }
        };
        settings.apply_env()?;
        Ok(settings)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var(ENV_STORE) {
            self.store = StoreKind::parse(&v)?;
        }
        if let Ok(v) = std::env::var(ENV_CACHE_DIR) {
            if !v.trim().is_empty() {
                self.cache_dir = PathBuf::from(v.trim());
            }
        }
        if let Ok(v) = std::env::var(ENV_LOG) {
            if !v.trim().is_empty() {
                self.log_filter = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var(ENV_LOG_FORMAT) {
            self.log_format = match v.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Compact,
            };
        }
        Ok(())
    }

    /// Build the configured store behind a shareable handle.
    pub fn open_store(&self) -> Result<Arc<dyn ScoreStore>> {
        Ok(match self.store {
            StoreKind::Memory => Arc::new(MemoryStore::new()),
            StoreKind::File => Arc::new(
                JsonFileStore::open(&self.cache_dir)
                    .with_context(|| format!("opening score store {}", self.cache_dir.display()))?,
            ),
        })
    }
}

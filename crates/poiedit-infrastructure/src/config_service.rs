//! Configuration service.
//!
//! Loads `EditorConfig` from `config.toml` and caches it. A missing file
//! yields the defaults; a malformed one is an error.

use crate::paths::PoieditPaths;
use poiedit_core::config::EditorConfig;
use poiedit_core::error::{PoiError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration, filled on first access
    config: Arc<RwLock<Option<EditorConfig>>>,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Uses `~/.config/poiedit/config.toml`.
    pub fn default_location() -> Result<Self> {
        let path = PoieditPaths::config_file().map_err(|e| PoiError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading it from the file if not cached.
    pub fn get_config(&self) -> Result<EditorConfig> {
        {
            let cached = self
                .config
                .read()
                .map_err(|_| PoiError::internal("config cache poisoned"))?;
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load()?;
        let mut cached = self
            .config
            .write()
            .map_err(|_| PoiError::internal("config cache poisoned"))?;
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut cached) = self.config.write() {
            *cached = None;
        }
    }

    fn load(&self) -> Result<EditorConfig> {
        if !self.path.exists() {
            tracing::info!(
                "No config at {}, using defaults",
                self.path.display()
            );
            return Ok(EditorConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let config: EditorConfig = toml::from_str(&content).map_err(|e| {
            PoiError::config(format!("{}: {}", self.path.display(), e))
        })?;
        tracing::debug!("Loaded config from {}", self.path.display());
        Ok(config)
    }
}

//! Default file locations.
//!
//! ```text
//! ~/.config/poiedit/           # Config directory
//! ├── config.toml              # EditorConfig
//! └── strings.toml             # Optional text overrides
//!
//! ~/.local/share/poiedit/      # Data directory
//! ├── catalog.toml             # Catalog store document
//! └── photos/                  # <name>.jpg files and uploads.toml
//! ```
//!
//! Relative paths found in `config.toml` are resolved against the data
//! directory.

use std::path::{Path, PathBuf};

const APP_NAME: &str = "poiedit";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform has no config or data directory for this user.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct PoieditPaths;

impl PoieditPaths {
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|d| d.join(APP_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|d| d.join(APP_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Resolves a configured path; absolute paths are kept as they are.
    pub fn resolve_data_path(path: &Path) -> Result<PathBuf, PathError> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        Ok(Self::data_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_under_config_dir() {
        let Ok(config_dir) = PoieditPaths::config_dir() else {
            return;
        };
        assert!(config_dir.ends_with(APP_NAME));
        let config_file = PoieditPaths::config_file().unwrap();
        assert!(config_file.starts_with(&config_dir));
        assert!(config_file.ends_with("config.toml"));
    }

    #[test]
    fn test_absolute_data_path_is_kept() {
        let absolute = std::env::temp_dir().join("catalog.toml");
        assert_eq!(
            PoieditPaths::resolve_data_path(&absolute).unwrap(),
            absolute
        );
    }
}

//! Text Resolver backed by TOML tables.
//!
//! Built-in English strings are compiled in; a strings file, when given,
//! overrides them key by key. Nested tables become dotted keys, so
//! `[editor.panel] desc = "..."` answers `editor.panel.desc`.

use poiedit_core::error::{PoiError, Result};
use poiedit_core::text::TextResolver;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_STRINGS: &str = include_str!("default_strings.toml");

#[derive(Debug, Clone)]
pub struct TomlTextResolver {
    strings: HashMap<String, String>,
}

impl TomlTextResolver {
    /// Only the built-in strings.
    pub fn builtin() -> Result<Self> {
        let mut strings = HashMap::new();
        merge(&mut strings, DEFAULT_STRINGS)?;
        Ok(Self { strings })
    }

    /// Built-in strings overridden by the file at `path`.
    pub fn with_overrides(path: &Path) -> Result<Self> {
        let mut resolver = Self::builtin()?;
        let content = std::fs::read_to_string(path)?;
        merge(&mut resolver.strings, &content)
            .map_err(|e| PoiError::config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded text overrides from {}", path.display());
        Ok(resolver)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl TextResolver for TomlTextResolver {
    fn lookup(&self, key: &str) -> Option<String> {
        let found = self.strings.get(key).cloned();
        if found.is_none() {
            tracing::warn!("Missing text for key {}", key);
        }
        found
    }
}

fn merge(strings: &mut HashMap<String, String>, content: &str) -> Result<()> {
    let table: toml::Table = toml::from_str(content)?;
    flatten("", &table, strings);
    Ok(())
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::String(text) => {
                out.insert(path, text.clone());
            }
            toml::Value::Table(nested) => flatten(&path, nested, out),
            _ => {}
        }
    }
}

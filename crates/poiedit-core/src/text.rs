//! Text Resolver trait.
//!
//! User-facing strings are looked up by dotted key paths such as
//! `editor.panel.desc`. A missing key is a configuration mistake, so lookups
//! never fail; implementations return the key itself instead.

/// Localized string lookup.
pub trait TextResolver: Send + Sync {
    /// Returns the raw string stored under `key`.
    fn lookup(&self, key: &str) -> Option<String>;

    /// Returns the string for `key`, falling back to the key itself.
    fn text(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| key.to_string())
    }

    /// Returns the string for `key` with `{name}` placeholders substituted.
    fn format(&self, key: &str, params: &[(&str, &str)]) -> String {
        substitute(&self.text(key), params)
    }
}

/// Replaces `{name}` placeholders with the matching parameter values.
pub fn substitute(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in params {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}

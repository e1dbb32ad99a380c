use crate::hours::HoursGrammar;
use crate::poi::BoundingBox;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration of the editor, read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct EditorConfig {
    /// Refuse to start new edits
    pub maintenance: bool,
    /// `[min_lon, min_lat, max_lon, max_lat]`
    pub bbox: Option<BoundingBox>,
    pub photos_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub strings_path: Option<PathBuf>,
    pub moderators: Vec<String>,
    pub reviewers: Vec<String>,
    /// `{lat}` and `{lon}` are substituted
    pub map_url: String,
    pub tags: TagConfig,
    pub links: LinkConfig,
    pub hours: HoursConfig,
    pub photo_radius_m: f64,
    pub photo_suggestions: usize,
    pub house_suggestions: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            maintenance: false,
            bbox: None,
            photos_dir: PathBuf::from("photos"),
            catalog_path: PathBuf::from("catalog.toml"),
            strings_path: None,
            moderators: Vec::new(),
            reviewers: Vec::new(),
            map_url: "https://zverik.github.io/latlon/#18/{lat}/{lon}".to_string(),
            tags: TagConfig::default(),
            links: LinkConfig::default(),
            hours: HoursConfig::default(),
            photo_radius_m: 10.0,
            photo_suggestions: 3,
            house_suggestions: 3,
        }
    }
}

impl EditorConfig {
    pub fn map_url_for(&self, lat: f64, lon: f64) -> String {
        self.map_url
            .replace("{lat}", &lat.to_string())
            .replace("{lon}", &lon.to_string())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct TagConfig {
    /// Tags offered as choices, in order
    pub suggest: Vec<String>,
    /// Display label per tag; the tag itself is shown when missing
    pub labels: BTreeMap<String, String>,
}

impl TagConfig {
    pub fn label<'a>(&'a self, tag: &'a str) -> &'a str {
        self.labels.get(tag).map(String::as_str).unwrap_or(tag)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct LinkConfig {
    /// Label used when the user sends a bare URL
    pub default_label: String,
    /// Typed label -> canonical label
    pub aliases: BTreeMap<String, String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            default_label: "website".to_string(),
            aliases: BTreeMap::from([
                ("site".to_string(), "website".to_string()),
                ("web".to_string(), "website".to_string()),
                ("сайт".to_string(), "website".to_string()),
                ("insta".to_string(), "instagram".to_string()),
                ("инста".to_string(), "instagram".to_string()),
                ("инстаграм".to_string(), "instagram".to_string()),
                ("вк".to_string(), "vk".to_string()),
                ("вконтакте".to_string(), "vk".to_string()),
            ]),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct HoursConfig {
    /// Localized two-letter weekday abbreviations, Monday first
    pub weekday_abbr: [String; 7],
    /// Words introducing the midday break
    pub break_words: Vec<String>,
}

impl Default for HoursConfig {
    fn default() -> Self {
        Self {
            weekday_abbr: ["пн", "вт", "ср", "чт", "пт", "сб", "вс"].map(String::from),
            break_words: vec!["обед".to_string(), "lunch".to_string(), "break".to_string()],
        }
    }
}

impl HoursConfig {
    pub fn grammar(&self) -> HoursGrammar {
        HoursGrammar::new(&self.weekday_abbr, &self.break_words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_toml() {
        let config: EditorConfig = toml::from_str(
            r#"
            maintenance = true
            bbox = [27.4, 53.8, 27.8, 54.0]
            moderators = ["42"]

            [tags]
            suggest = ["amenity=cafe"]
            labels = { "amenity=cafe" = "Cafe" }
            "#,
        )
        .unwrap();
        assert!(config.maintenance);
        assert_eq!(config.bbox.unwrap().max_lat, 54.0);
        assert_eq!(config.moderators, vec!["42"]);
        assert_eq!(config.tags.label("amenity=cafe"), "Cafe");
        assert_eq!(config.tags.label("shop=books"), "shop=books");
        // Untouched sections keep their defaults
        assert_eq!(config.links.default_label, "website");
        assert_eq!(config.photo_suggestions, 3);
    }

    #[test]
    fn test_map_url() {
        let config = EditorConfig::default();
        assert_eq!(
            config.map_url_for(53.9, 27.6),
            "https://zverik.github.io/latlon/#18/53.9/27.6"
        );
    }
}

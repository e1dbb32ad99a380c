//! Summary view-model.
//!
//! Produced by the summary renderer and handed to the Messaging Gateway
//! untouched; the gateway decides how to draw it.

use crate::poi::Link;
use serde::{Deserialize, Serialize};

/// Marker for a tri-state flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagMarker {
    Yes,
    No,
    Unset,
}

impl From<Option<bool>> for FlagMarker {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Yes,
            Some(false) => Self::No,
            None => Self::Unset,
        }
    }
}

/// Formatted value of one summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SummaryValue {
    Text { text: String },
    /// Absent or empty value, with the placeholder to show
    Unknown { placeholder: String },
    Flag { marker: FlagMarker, text: String },
    /// Coordinates rendered as a link to a map viewer
    Location {
        lat: f64,
        lon: f64,
        url: String,
        text: String,
    },
    Links { links: Vec<Link> },
}

impl SummaryValue {
    /// Plain text form, without link targets.
    pub fn plain(&self) -> String {
        match self {
            Self::Text { text } | Self::Flag { text, .. } | Self::Location { text, .. } => {
                text.clone()
            }
            Self::Unknown { placeholder } => placeholder.clone(),
            Self::Links { links } => links
                .iter()
                .map(|l| l.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// One labelled line of the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Edit command without the slash, e.g. `edesc`
    pub command: Option<String>,
    pub label: String,
    pub value: SummaryValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryView {
    pub title: String,
    pub rows: Vec<SummaryRow>,
    /// Trailing hint under the rows
    pub comment: Option<String>,
}

impl SummaryView {
    pub fn row(&self, label: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn row_by_command(&self, command: &str) -> Option<&SummaryRow> {
        self.rows
            .iter()
            .find(|r| r.command.as_deref() == Some(command))
    }
}

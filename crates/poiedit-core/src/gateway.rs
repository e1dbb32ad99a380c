//! Messaging Gateway trait and the message types crossing it.
//!
//! The gateway is the chat transport seen from the editor: it delivers
//! outgoing messages with attached choice sets, retracts earlier messages,
//! and turns user activity into `Inbound` events.

use crate::error::Result;
use crate::fields::Attribute;
use crate::poi::Location;
use crate::view::SummaryView;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Transport handle of a message sent by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle(pub i64);

/// What to do with a photo picked from a choice set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoAction {
    /// Use as the outside photo
    Out,
    /// Use as the inside photo
    In,
    /// Detach from the draft, keep the file
    Unlink,
    /// Delete a freshly uploaded file
    Del,
    /// Forget a known upload without deleting it
    Skip,
}

/// Payload of a selectable option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Callback {
    /// Start creating a new POI
    New,
    /// Start editing a catalog POI
    Edit { poi_id: i64 },
    /// Show a saved POI
    Look { poi_id: i64 },
    /// Tear the session down
    Cancel,
    /// Leave the attribute prompt, back to the summary
    CancelAttr,
    Save,
    ContinueReview,
    House { key: String },
    Floor { floor: String },
    /// Tri-state flag choice; `None` is "unknown"
    Flag { attr: Attribute, value: Option<bool> },
    Tag { tag: String },
    TagPage { page: usize },
    Photo { name: String, action: PhotoAction },
}

/// A single selectable option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Button {
    Action { label: String, callback: Callback },
    Url { label: String, url: String },
}

impl Button {
    pub fn action(label: impl Into<String>, callback: Callback) -> Self {
        Self::Action {
            label: label.into(),
            callback,
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Url {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Action { label, .. } | Self::Url { label, .. } => label,
        }
    }
}

/// Options attached to a message, laid out in rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceSet {
    pub rows: Vec<Vec<Button>>,
    /// Maximum buttons per row used by `insert`
    #[serde(default)]
    pub row_width: Option<usize>,
}

impl ChoiceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_width(row_width: usize) -> Self {
        Self {
            rows: Vec::new(),
            row_width: Some(row_width),
        }
    }

    /// Appends a new row holding the given buttons.
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }

    /// Appends a button to the last row, starting a new row when the last
    /// one is full.
    pub fn insert(&mut self, button: Button) {
        let width = self.row_width.unwrap_or(usize::MAX);
        match self.rows.last_mut() {
            Some(last) if last.len() < width => last.push(button),
            _ => self.rows.push(vec![button]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.is_empty())
    }

    /// All buttons in reading order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    /// Callback of the `n`-th button (1-based, reading order).
    pub fn pick(&self, n: usize) -> Option<&Callback> {
        match self.buttons().nth(n.checked_sub(1)?)? {
            Button::Action { callback, .. } => Some(callback),
            Button::Url { .. } => None,
        }
    }
}

/// Content of an outgoing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageBody {
    Text { text: String },
    Summary { view: SummaryView },
    Photo { name: String, caption: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub body: MessageBody,
    #[serde(default)]
    pub choices: ChoiceSet,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            body: MessageBody::Text { text: text.into() },
            choices: ChoiceSet::default(),
        }
    }

    pub fn summary(view: SummaryView) -> Self {
        Self {
            body: MessageBody::Summary { view },
            choices: ChoiceSet::default(),
        }
    }

    pub fn photo(name: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            body: MessageBody::Photo {
                name: name.into(),
                caption: caption.into(),
            },
            choices: ChoiceSet::default(),
        }
    }

    pub fn with_choices(mut self, choices: ChoiceSet) -> Self {
        self.choices = choices;
        self
    }
}

/// An event addressed to one user's session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    /// `/name args` typed by the user
    Command { name: String, args: String },
    Text { text: String },
    /// Native location payload
    Location { location: Location },
    /// Option picked on a message; `origin` is the message carrying it
    Choice {
        callback: Callback,
        origin: Option<MessageHandle>,
    },
    Photo { upload_id: String },
}

impl Inbound {
    /// Classifies typed text as a command or plain text.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if let Some(rest) = trimmed.strip_prefix('/') {
            let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if !name.is_empty() {
                return Self::Command {
                    name: name.to_lowercase(),
                    args: args.trim().to_string(),
                };
            }
        }
        Self::Text {
            text: text.to_string(),
        }
    }

    pub fn choice(callback: Callback) -> Self {
        Self::Choice {
            callback,
            origin: None,
        }
    }

    /// The text the user typed, with commands restored to `/name args`.
    pub fn raw_text(&self) -> Option<String> {
        match self {
            Self::Text { text } => Some(text.clone()),
            Self::Command { name, args } if args.is_empty() => Some(format!("/{}", name)),
            Self::Command { name, args } => Some(format!("/{} {}", name, args)),
            _ => None,
        }
    }
}

/// Chat transport used by the editor.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Sends a message and returns its handle.
    async fn send(&self, user: &str, message: OutgoingMessage) -> Result<MessageHandle>;

    /// Sends several photos as one group.
    async fn send_album(&self, user: &str, photos: &[String]) -> Result<Vec<MessageHandle>>;

    /// Replaces the choice set of an earlier message.
    async fn edit_choices(&self, user: &str, handle: MessageHandle, choices: ChoiceSet)
    -> Result<()>;

    /// Deletes earlier messages. Already deleted handles are ignored.
    async fn retract(&self, user: &str, handles: &[MessageHandle]) -> Result<()>;

    /// Shows a short transient notice, answering a choice.
    async fn notice(&self, user: &str, text: &str) -> Result<()>;

    /// Downloads the bytes of an uploaded photo.
    async fn fetch_upload(&self, upload_id: &str) -> Result<Vec<u8>>;
}

//! Session state.
//!
//! A session walks the creation path `Name -> Location -> Keywords` once
//! and then stays in `Editing`, where `Mode` tells whether the summary is
//! shown (`Confirm`), one attribute is being prompted for (`Attr`) or a
//! message to moderators is being composed (`Message`).

use poiedit_core::fields::Attribute;
use poiedit_core::gateway::MessageHandle;
use poiedit_core::poi::{House, Location, Poi};

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Name,
    Location { name: String },
    Keywords { name: String, location: Location },
    Editing { draft: Poi, mode: Mode },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Confirm,
    Attr(ActiveAttr),
    Message,
}

/// The attribute being prompted for, with the options it was offered.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveAttr {
    pub attr: Attribute,
    /// Floors observed at the draft's house
    pub floors: Vec<String>,
    /// Houses offered as choices
    pub houses: Vec<House>,
    pub tag_page: usize,
}

impl ActiveAttr {
    pub fn new(attr: Attribute) -> Self {
        Self {
            attr,
            floors: Vec::new(),
            houses: Vec::new(),
            tag_page: 1,
        }
    }
}

/// Observable state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Name,
    Location,
    Keywords,
    Confirm,
    Attr(Attribute),
    Message,
}

/// Outcome of handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The session is over and must be dropped
    Finished,
}

/// One user's editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub(crate) stage: Stage,
    /// Messages to retract on the next transition
    pub(crate) replies: Vec<MessageHandle>,
}

impl EditSession {
    pub(crate) fn with_stage(stage: Stage) -> Self {
        Self {
            stage,
            replies: Vec::new(),
        }
    }

    pub fn state(&self) -> EditState {
        match &self.stage {
            Stage::Name => EditState::Name,
            Stage::Location { .. } => EditState::Location,
            Stage::Keywords { .. } => EditState::Keywords,
            Stage::Editing { mode, .. } => match mode {
                Mode::Confirm => EditState::Confirm,
                Mode::Attr(active) => EditState::Attr(active.attr),
                Mode::Message => EditState::Message,
            },
        }
    }

    pub fn draft(&self) -> Option<&Poi> {
        match &self.stage {
            Stage::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub(crate) fn draft_mut(&mut self) -> Option<&mut Poi> {
        match &mut self.stage {
            Stage::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub(crate) fn active(&self) -> Option<&ActiveAttr> {
        match &self.stage {
            Stage::Editing {
                mode: Mode::Attr(active),
                ..
            } => Some(active),
            _ => None,
        }
    }

    pub(crate) fn set_mode(&mut self, new_mode: Mode) {
        if let Stage::Editing { mode, .. } = &mut self.stage {
            *mode = new_mode;
        }
    }

    pub fn pending_replies(&self) -> &[MessageHandle] {
        &self.replies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_follows_stage() {
        let draft = Poi::new("Cafe", Location::new(1.0, 2.0), vec![]);
        let mut session = EditSession::with_stage(Stage::Editing {
            draft,
            mode: Mode::Confirm,
        });
        assert_eq!(session.state(), EditState::Confirm);
        session.set_mode(Mode::Attr(ActiveAttr::new(Attribute::Hours)));
        assert_eq!(session.state(), EditState::Attr(Attribute::Hours));
        assert_eq!(session.active().map(|a| a.tag_page), Some(1));
    }

    #[test]
    fn test_creation_stages_have_no_draft() {
        let session = EditSession::with_stage(Stage::Location {
            name: "Cafe".into(),
        });
        assert_eq!(session.state(), EditState::Location);
        assert!(session.draft().is_none());
    }
}

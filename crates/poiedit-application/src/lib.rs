//! Application layer of the POI editor.
//!
//! This crate drives the per-user editing session: it reacts to inbound
//! events, dispatches them to the field parsers of `poiedit-core`, renders
//! the summary and commits drafts through the collaborator traits.

pub mod editor;

pub use editor::{EditState, EditorContext, EditorService, SummaryRenderer};

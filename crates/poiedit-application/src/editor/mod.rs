//! The editing session.
//!
//! - `state`: session stages and the observable `EditState`
//! - `machine`: transitions and the generic attribute prompt
//! - `commit`: save, delete, undelete and messages to moderators
//! - `photos`: photo suggestions, uploads and photo choices
//! - `summary`: the summary view-model
//! - `prompts`: choice sets attached to editor messages
//! - `service`: the per-user session registry

mod commit;
mod context;
mod machine;
mod photos;
mod prompts;
mod service;
mod state;
mod summary;

pub use context::EditorContext;
pub use photos::{new_photo_name, rank_photos};
pub use service::EditorService;
pub use state::{EditSession, EditState, Flow};
pub use summary::SummaryRenderer;

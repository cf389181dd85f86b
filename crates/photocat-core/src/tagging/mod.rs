//! Operator tagging: category vocabulary, label sets, and the session state
//! machine that commits them to the catalog.

pub mod keymap;
pub mod labels;
pub mod session;
pub mod state;

pub use keymap::{CategoryMap, RESERVED_TRIGGERS};
pub use labels::Labels;
pub use session::TaggingSession;
pub use state::{NavOutcome, PendingTags, SessionPhase, SessionState, TagMutation};

//! Actor system: the session supervisor and its persistence collaborator.

pub mod messages;
pub mod supervisor;
pub mod traits;

pub use messages::{ActorError, AskOutcome, SessionSnapshot};
pub use supervisor::{SupervisorHandle, SupervisorOptions};
pub use traits::ConversationStore;

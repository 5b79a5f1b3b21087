pub mod action;
pub mod backend;
pub mod event;
pub mod generation;
pub mod notice;
pub mod session;
pub mod transcript;
pub mod turn;

pub use action::Action;
pub use backend::*;
pub use event::{ArcEventTx, Event, EventTx};
pub use generation::{GenerationOperation, GenerationState};
pub use notice::*;
pub use session::{ConversationHandle, HistoryEntry, SessionConfiguration};
pub use transcript::Transcript;
pub use turn::{Citation, ConversationTurn, Role, merge_citations};

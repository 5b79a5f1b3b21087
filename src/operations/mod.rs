pub mod poller;
pub mod speech;
pub mod stream;

pub use poller::{GenerationError, MediaPoller};
pub use speech::prepare_speech_text;
pub use stream::{StreamAggregator, aggregate_turn};

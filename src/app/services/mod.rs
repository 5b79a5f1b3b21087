pub mod action;
pub mod clipboard;
pub mod events;
pub mod voice;

pub use action::ActionService;
pub use clipboard::ClipboardService;
pub use events::EventService;
pub use voice::{ArcVoice, Voice, WavFileVoice};

pub mod input;
pub mod notice;
pub mod scroll;
pub mod status;
pub mod transcript;
pub mod utils;
pub mod video;

pub use notice::Notice;
pub use scroll::Scroll;
pub use transcript::TranscriptView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Chat,
    Video,
}

impl View {
    pub fn toggle(self) -> Self {
        match self {
            View::Chat => View::Video,
            View::Video => View::Chat,
        }
    }
}

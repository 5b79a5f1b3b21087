use std::sync::Arc;

use tokio::sync::mpsc;
use tui_textarea::Input;

use super::{Citation, MediaResult};

#[derive(Debug)]
pub enum Event {
    Notice(crate::models::NoticeMessage),

    // Chat turn, tagged with the session version it was sent under
    TurnUpdated {
        version: u64,
        turn_id: String,
        text: String,
        citations: Vec<Citation>,
    },
    TurnCompleted {
        version: u64,
        turn_id: String,
    },
    TurnFailed {
        version: u64,
        turn_id: String,
        error: String,
    },

    // Video generation, tagged with the operation id
    GenerationStarted {
        op_id: String,
    },
    GenerationProgress {
        op_id: String,
        message: String,
    },
    GenerationSucceeded {
        op_id: String,
        result: MediaResult,
    },
    GenerationFailed {
        op_id: String,
        error: String,
    },

    SpeechFinished,
    VoiceTranscript(String),

    KeyboardCharInput(Input),
    KeyboardEsc,
    KeyboardEnter,
    KeyboardNewLine,
    KeyboardTab,
    KeyboardCtrlC,
    KeyboardCtrlT,
    KeyboardCtrlG,
    KeyboardCtrlS,
    KeyboardCtrlL,
    KeyboardCtrlY,
    KeyboardCtrlR,
    KeyboardPaste(String),

    Quit,

    UiTick,
    UiScrollUp,
    UiScrollDown,
    UiScrollPageUp,
    UiScrollPageDown,
}

#[macro_export]
macro_rules! notice_info {
    ($msg:expr) => {
        $crate::models::Event::Notice($crate::models::NoticeMessage::info($msg))
    };
    ($msg:expr, $duration:expr) => {
        $crate::models::Event::Notice(
            $crate::models::NoticeMessage::info($msg).with_duration($duration),
        )
    };
}

#[macro_export]
macro_rules! notice_warning {
    ($msg:expr) => {
        $crate::models::Event::Notice($crate::models::NoticeMessage::warning($msg))
    };
    ($msg:expr, $duration:expr) => {
        $crate::models::Event::Notice(
            $crate::models::NoticeMessage::warning($msg).with_duration($duration),
        )
    };
}

#[macro_export]
macro_rules! notice_error {
    ($msg:expr) => {
        $crate::models::Event::Notice($crate::models::NoticeMessage::error($msg))
    };
    ($msg:expr, $duration:expr) => {
        $crate::models::Event::Notice(
            $crate::models::NoticeMessage::error($msg).with_duration($duration),
        )
    };
}

#[async_trait::async_trait]
pub trait EventTx {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>>;
}

#[async_trait::async_trait]
impl EventTx for mpsc::Sender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event).await
    }
}

#[async_trait::async_trait]
impl EventTx for mpsc::UnboundedSender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event)
    }
}

pub type ArcEventTx = Arc<dyn EventTx + Send + Sync>;

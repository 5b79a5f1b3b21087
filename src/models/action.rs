use super::ConversationHandle;

/// Work the UI hands over to the action service
#[derive(Debug)]
pub enum Action {
    SendTurn {
        version: u64,
        turn_id: String,
        handle: ConversationHandle,
        text: String,
    },
    GenerateMedia {
        op_id: String,
        prompt: String,
    },
    Speak(String),
    Listen,
    CopyText {
        content: String,
        notice: bool,
    },
}

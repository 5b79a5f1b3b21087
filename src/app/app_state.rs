#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use crate::{
    backend::ArcBackend,
    config::constants::{CHAT_ERROR_MESSAGE, HELLO_MESSAGE, MAX_SPEECH_CHARS},
    models::{
        Action, ConversationHandle, ConversationTurn, Event, GenerationOperation, Role,
        SessionConfiguration, Transcript,
    },
    operations::prepare_speech_text,
};

/// Everything both views display. Mutated only on the UI task, async work
/// is requested through the returned actions and reports back as events.
pub struct AppState {
    backend: ArcBackend,
    session: SessionConfiguration,
    version: u64,
    handle: ConversationHandle,
    transcript: Transcript,

    generation: Option<GenerationOperation>,
    generation_in_flight: bool,

    speaking: bool,
    listening: bool,
    max_speech_chars: usize,
}

impl AppState {
    pub fn new(backend: ArcBackend, session: SessionConfiguration) -> Self {
        let handle = backend.start_conversation(&session);
        Self {
            backend,
            session,
            version: 0,
            handle,
            transcript: Transcript::with_notice(Role::Model, HELLO_MESSAGE),
            generation: None,
            generation_in_flight: false,
            speaking: false,
            listening: false,
            max_speech_chars: MAX_SPEECH_CHARS,
        }
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.transcript = Transcript::with_notice(Role::Model, greeting);
        self
    }

    pub fn with_max_speech_chars(mut self, max_chars: usize) -> Self {
        self.max_speech_chars = max_chars;
        self
    }

    pub fn session(&self) -> SessionConfiguration {
        self.session
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn generation(&self) -> Option<&GenerationOperation> {
        self.generation.as_ref()
    }

    pub fn is_waiting_for_turn(&self) -> bool {
        self.transcript.has_pending()
    }

    pub fn is_generating(&self) -> bool {
        self.generation_in_flight
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn submit_user_text(&mut self, text: &str) -> Option<Action> {
        let text = text.trim();
        if text.is_empty() || self.transcript.has_pending() {
            return None;
        }

        self.transcript.push(ConversationTurn::new_user(text));
        let pending = ConversationTurn::new_pending();
        let turn_id = pending.id().to_string();
        self.transcript.push(pending);

        Some(Action::SendTurn {
            version: self.version,
            turn_id,
            handle: self.handle.clone(),
            text: text.to_string(),
        })
    }

    /// Start over with a fresh conversation. Whatever is still streaming
    /// for the previous session is dropped when it arrives.
    pub fn reconfigure(&mut self, session: SessionConfiguration) {
        self.version += 1;
        self.session = session;
        self.handle = self.backend.start_conversation(&session);
        self.transcript = Transcript::with_notice(Role::System, session.notice());
        log::info!(
            "Session {} uses {} ({})",
            self.version,
            self.handle.model(),
            session.notice()
        );
    }

    pub fn request_speech_for_last_model_turn(&mut self) -> Option<Action> {
        if self.speaking {
            return None;
        }
        let turn = self.transcript.last_model_turn()?;
        let text = prepare_speech_text(turn.text(), self.max_speech_chars);
        if text.trim().is_empty() {
            return None;
        }
        self.speaking = true;
        Some(Action::Speak(text))
    }

    pub fn request_listen(&mut self) -> Option<Action> {
        if self.listening {
            return None;
        }
        self.listening = true;
        Some(Action::Listen)
    }

    pub fn finish_listening(&mut self) {
        self.listening = false;
    }

    /// Code blocks of the last model turn, ready for the clipboard
    pub fn copy_code_blocks(&self) -> Option<Action> {
        let turn = self.transcript.last_model_turn()?;
        let blocks = turn.code_blocks();
        let content = if blocks.is_empty() {
            turn.text().to_string()
        } else {
            blocks.join("\n\n")
        };
        Some(Action::CopyText {
            content,
            notice: true,
        })
    }

    pub fn submit_generation(&mut self, prompt: &str) -> Option<Action> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }

        // Replaces any live operation, its late events fail the id check
        let operation = GenerationOperation::new(prompt);
        let op_id = operation.id().to_string();
        self.generation = Some(operation);
        self.generation_in_flight = true;

        Some(Action::GenerateMedia {
            op_id,
            prompt: prompt.to_string(),
        })
    }

    /// Clear a failed generation so a new prompt can be entered. Nothing is
    /// re-submitted.
    pub fn retry_generation(&mut self) -> bool {
        match self.generation.as_mut() {
            Some(op) => op.reset(),
            None => false,
        }
    }

    /// Apply a completion coming back from a worker. Returns false when the
    /// event belongs to a superseded session, turn or operation.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::TurnUpdated {
                version,
                turn_id,
                text,
                citations,
            } => {
                *version == self.version
                    && self.transcript.update_pending(turn_id, text, citations)
            }

            Event::TurnCompleted { version, turn_id } => {
                *version == self.version && self.transcript.finalize_pending(turn_id)
            }

            Event::TurnFailed {
                version,
                turn_id,
                error,
            } => {
                if *version != self.version {
                    return false;
                }
                log::warn!("Turn {} failed: {}", turn_id, error);
                self.transcript.fail_pending(turn_id, CHAT_ERROR_MESSAGE)
            }

            Event::GenerationStarted { op_id } => self
                .current_generation(op_id)
                .map(|op| op.start())
                .unwrap_or_default(),

            Event::GenerationProgress { op_id, message } => self
                .current_generation(op_id)
                .map(|op| op.set_progress(message.as_str()))
                .unwrap_or_default(),

            Event::GenerationSucceeded { op_id, result } => {
                let Some(op) = self.current_generation(op_id) else {
                    return false;
                };
                let applied = op.succeed(result.clone());
                self.generation_in_flight = false;
                applied
            }

            Event::GenerationFailed { op_id, error } => {
                let Some(op) = self.current_generation(op_id) else {
                    return false;
                };
                let applied = op.fail(error.as_str());
                self.generation_in_flight = false;
                applied
            }

            Event::SpeechFinished => {
                let was_speaking = self.speaking;
                self.speaking = false;
                was_speaking
            }

            _ => false,
        }
    }

    fn current_generation(&mut self, op_id: &str) -> Option<&mut GenerationOperation> {
        self.generation.as_mut().filter(|op| op.id() == op_id)
    }
}

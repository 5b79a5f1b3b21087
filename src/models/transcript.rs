#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use super::{Citation, ConversationTurn, Role};

/// Ordered turns of the current chat session. Only the trailing pending
/// turn can change after it has been appended.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn with_notice(role: Role, text: impl Into<String>) -> Self {
        Self {
            turns: vec![ConversationTurn::new(role, text)],
        }
    }

    /// Append a turn. Rejected while another turn is pending, so at most one
    /// turn ever receives streamed content.
    pub fn push(&mut self, turn: ConversationTurn) -> bool {
        if self.pending().is_some() {
            log::warn!("Rejecting turn {}: a turn is still pending", turn.id());
            return false;
        }
        self.turns.push(turn);
        true
    }

    pub fn pending(&self) -> Option<&ConversationTurn> {
        self.turns.last().filter(|t| t.is_pending())
    }

    pub fn has_pending(&self) -> bool {
        self.pending().is_some()
    }

    fn pending_mut(&mut self, turn_id: &str) -> Option<&mut ConversationTurn> {
        self.turns
            .last_mut()
            .filter(|t| t.is_pending() && t.id() == turn_id)
    }

    pub fn update_pending(&mut self, turn_id: &str, text: &str, citations: &[Citation]) -> bool {
        match self.pending_mut(turn_id) {
            Some(turn) => turn.update(text, citations),
            None => false,
        }
    }

    pub fn finalize_pending(&mut self, turn_id: &str) -> bool {
        match self.pending_mut(turn_id) {
            Some(turn) => turn.finalize(),
            None => false,
        }
    }

    pub fn fail_pending(&mut self, turn_id: &str, message: &str) -> bool {
        match self.pending_mut(turn_id) {
            Some(turn) => turn.fail(message),
            None => false,
        }
    }

    /// Last model turn that has some text
    pub fn last_model_turn(&self) -> Option<&ConversationTurn> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.is_model() && !t.text().trim().is_empty())
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

use std::sync::{Arc, Mutex};

use super::Role;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfiguration {
    pub deep_reasoning_enabled: bool,
    pub search_grounding_enabled: bool,
}

impl SessionConfiguration {
    pub fn new(deep_reasoning_enabled: bool, search_grounding_enabled: bool) -> Self {
        Self {
            deep_reasoning_enabled,
            search_grounding_enabled,
        }
    }

    pub fn toggle_deep_reasoning(self) -> Self {
        Self {
            deep_reasoning_enabled: !self.deep_reasoning_enabled,
            ..self
        }
    }

    pub fn toggle_search_grounding(self) -> Self {
        Self {
            search_grounding_enabled: !self.search_grounding_enabled,
            ..self
        }
    }

    /// Notice shown as the only turn after the session was recreated
    pub fn notice(&self) -> String {
        format!(
            "Switched to {}{}.",
            if self.deep_reasoning_enabled {
                "Code Mode (Deep Thinking)"
            } else {
                "Standard Mode"
            },
            if self.search_grounding_enabled {
                " with Research"
            } else {
                ""
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub role: Role,
    pub text: String,
}

/// Conversational context held between turns. Cloning shares the history.
#[derive(Debug, Clone)]
pub struct ConversationHandle {
    id: String,
    model: String,
    system_instruction: String,
    thinking_budget: Option<u32>,
    search_grounding: bool,
    history: Arc<Mutex<Vec<HistoryEntry>>>,
}

impl ConversationHandle {
    pub fn new(model: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            model: model.into(),
            system_instruction: system_instruction.into(),
            thinking_budget: None,
            search_grounding: false,
            history: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }

    pub fn with_search_grounding(mut self, enabled: bool) -> Self {
        self.search_grounding = enabled;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn thinking_budget(&self) -> Option<u32> {
        self.thinking_budget
    }

    pub fn search_grounding(&self) -> bool {
        self.search_grounding
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Record a completed exchange
    pub fn record_exchange(&self, user: impl Into<String>, model: impl Into<String>) {
        let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.push(HistoryEntry {
            role: Role::User,
            text: user.into(),
        });
        history.push(HistoryEntry {
            role: Role::Model,
            text: model.into(),
        });
    }
}

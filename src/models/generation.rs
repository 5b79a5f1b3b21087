#[cfg(test)]
#[path = "generation_test.rs"]
mod tests;

use std::fmt::Display;

use crate::config::constants::PROGRESS_INITIALIZING;

use super::MediaResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// A single video generation request as seen by the video view
#[derive(Debug, Clone)]
pub struct GenerationOperation {
    id: String,
    prompt: String,
    state: GenerationState,
    progress_message: String,
    result: Option<MediaResult>,
    error_detail: Option<String>,
}

impl GenerationOperation {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            state: GenerationState::Idle,
            progress_message: String::new(),
            result: None,
            error_detail: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn progress_message(&self) -> &str {
        &self.progress_message
    }

    pub fn result(&self) -> Option<&MediaResult> {
        self.result.as_ref()
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.state == GenerationState::Running
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            GenerationState::Succeeded | GenerationState::Failed
        )
    }

    pub fn start(&mut self) -> bool {
        if self.state != GenerationState::Idle {
            return false;
        }
        self.state = GenerationState::Running;
        self.progress_message = PROGRESS_INITIALIZING.to_string();
        true
    }

    pub fn set_progress(&mut self, message: impl Into<String>) -> bool {
        if self.state != GenerationState::Running {
            return false;
        }
        self.progress_message = message.into();
        true
    }

    pub fn succeed(&mut self, result: MediaResult) -> bool {
        if self.state != GenerationState::Running {
            return false;
        }
        self.state = GenerationState::Succeeded;
        self.result = Some(result);
        true
    }

    /// Fail from idle as well: the loop may give up before it ever started
    pub fn fail(&mut self, detail: impl Into<String>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.state = GenerationState::Failed;
        self.error_detail = Some(detail.into());
        true
    }

    /// Back to idle after a failure. The prompt is kept for display only,
    /// the user has to submit again.
    pub fn reset(&mut self) -> bool {
        if self.state != GenerationState::Failed {
            return false;
        }
        self.state = GenerationState::Idle;
        self.progress_message.clear();
        self.error_detail = None;
        true
    }
}

impl Display for GenerationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationState::Idle => write!(f, "idle"),
            GenerationState::Running => write!(f, "running"),
            GenerationState::Succeeded => write!(f, "succeeded"),
            GenerationState::Failed => write!(f, "failed"),
        }
    }
}

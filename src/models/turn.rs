#[cfg(test)]
#[path = "turn_test.rs"]
mod tests;

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
    System,
}

/// A web source the model consulted while answering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct ConversationTurn {
    id: String,
    role: Role,
    text: String,
    created_at: chrono::DateTime<chrono::Utc>,
    pending: bool,
    citations: Vec<Citation>,
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            created_at: chrono::Utc::now(),
            pending: false,
            citations: vec![],
        }
    }

    pub fn new_user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn new_model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    pub fn new_system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    /// An empty model turn waiting for streamed content
    pub fn new_pending() -> Self {
        let mut turn = Self::new(Role::Model, "");
        turn.pending = true;
        turn
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Pending and nothing received yet
    pub fn is_thinking(&self) -> bool {
        self.pending && self.text.is_empty()
    }

    pub fn is_model(&self) -> bool {
        self.role == Role::Model
    }

    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    /// Replace the streamed state of a pending turn. Finalized turns are
    /// immutable, in which case this returns false.
    pub fn update(&mut self, text: impl Into<String>, citations: &[Citation]) -> bool {
        if !self.pending {
            return false;
        }
        self.text = text.into();
        merge_citations(&mut self.citations, citations.iter().cloned());
        true
    }

    pub fn finalize(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        true
    }

    /// Finalize with `message` in place of whatever was streamed so far
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if !self.pending {
            return false;
        }
        self.text = message.into();
        self.citations.clear();
        self.pending = false;
        true
    }

    /// Fenced code blocks in the turn text, without the fences
    pub fn code_blocks(&self) -> Vec<String> {
        let mut blocks: Vec<String> = vec![];
        let mut current: Vec<&str> = vec![];
        let mut in_block = false;
        for line in self.text.split('\n') {
            if line.trim().starts_with("```") {
                if in_block {
                    blocks.push(current.join("\n"));
                    current.clear();
                }
                in_block = !in_block;
                continue;
            }
            if in_block {
                current.push(line);
            }
        }
        blocks
    }
}

/// Merge `incoming` into `set` keeping the first title seen for every url
pub fn merge_citations(set: &mut Vec<Citation>, incoming: impl IntoIterator<Item = Citation>) {
    for citation in incoming {
        if citation.url.is_empty() {
            continue;
        }
        if set.iter().any(|c| c.url == citation.url) {
            continue;
        }
        set.push(citation);
    }
}

impl Citation {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
            Role::System => write!(f, "system"),
        }
    }
}

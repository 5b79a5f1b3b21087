use std::path::PathBuf;

use crate::config::VideoConfig;

use super::Citation;

/// One incremental piece of a streamed response. `citations` holds every
/// citation observed so far in the stream, not only the new ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFragment {
    pub text: String,
    pub citations: Vec<Citation>,
}

impl TextFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: vec![],
        }
    }

    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }
}

/// Handle to a long-running media generation job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationToken {
    pub name: String,
}

/// Where a finished job's output can be downloaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRef {
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollStatus {
    pub done: bool,
    pub result: Option<ResultRef>,
    pub error: Option<String>,
}

impl PollStatus {
    pub fn running() -> Self {
        Self::default()
    }

    pub fn finished(uri: impl Into<String>) -> Self {
        Self {
            done: true,
            result: Some(ResultRef { uri: uri.into() }),
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaOptions {
    pub number_of_items: u8,
    pub resolution: String,
    pub aspect_ratio: String,
}

impl From<&VideoConfig> for MediaOptions {
    fn from(value: &VideoConfig) -> Self {
        Self {
            number_of_items: value.number_of_videos,
            resolution: value.resolution.clone(),
            aspect_ratio: value.aspect_ratio.clone(),
        }
    }
}

impl Default for MediaOptions {
    fn default() -> Self {
        (&VideoConfig::default()).into()
    }
}

/// A downloaded generation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResult {
    pub path: PathBuf,
    pub size_bytes: usize,
}

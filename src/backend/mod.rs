pub mod credentials;
pub mod error;
pub mod gemini;

pub use credentials::{ArcCredentials, CredentialProvider, EnvCredentials};
pub use error::{BackendError, GeminiError};
pub use gemini::Gemini;

#[cfg(test)]
use mockall::automock;

use crate::models::{
    ConversationHandle, MediaOptions, OperationToken, PollStatus, ResultRef,
    SessionConfiguration, TextFragment,
};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

/// Lazy sequence of fragments for one turn. It must be consumed until it
/// ends or yields an error; the turn counts as in flight until then.
pub type FragmentStream = BoxStream<'static, Result<TextFragment, BackendError>>;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Backend {
    fn name(&self) -> &str;

    /// Create a fresh conversational context. Nothing is sent until the
    /// first turn, so missing credentials only surface then.
    fn start_conversation(&self, config: &SessionConfiguration) -> ConversationHandle;

    fn send_turn(&self, handle: &ConversationHandle, text: &str) -> FragmentStream;

    async fn start_media_generation(
        &self,
        prompt: &str,
        options: &MediaOptions,
    ) -> Result<OperationToken, BackendError>;

    /// Safe to call repeatedly, it only reads the job status
    async fn poll_media_generation(
        &self,
        token: &OperationToken,
    ) -> Result<PollStatus, BackendError>;

    async fn fetch_result(&self, result: &ResultRef) -> Result<Vec<u8>, BackendError>;

    /// `None` when the service produced no audio
    async fn synthesize_speech(&self, text: &str) -> Result<Option<Vec<u8>>, BackendError>;
}

pub type ArcBackend = Arc<dyn Backend + Send + Sync>;

#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;

use std::time::Duration;

use thiserror::Error;

use crate::{
    backend::{ArcBackend, ArcCredentials, BackendError},
    config::constants::{
        ERR_AUTH_REFRESHED, ERR_NO_VIDEO_URI, ERR_VIDEO_NOT_FOUND, POLL_INTERVAL_SECS,
        PROGRESS_DOWNLOADING, PROGRESS_INITIALIZING, PROGRESS_RENDERING,
        PROGRESS_RENDERING_FIRST, PROGRESS_SESSION_EXPIRED, PROGRESS_WAITING_FOR_KEY,
    },
    models::{ArcEventTx, Event, MediaOptions},
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{}", ERR_NO_VIDEO_URI)]
    MissingResult,
    #[error("{}", ERR_VIDEO_NOT_FOUND)]
    ResultNotFound,
    #[error("{}", ERR_AUTH_REFRESHED)]
    AuthorizationRefreshed,
    /// The job finished and reported an error of its own
    #[error("{0}")]
    Operation(String),
    #[error("{0}")]
    Backend(#[from] BackendError),
}

/// Drives one media generation job from start to downloaded bytes.
///
/// The job is polled sequentially with a fixed delay. The result is fetched
/// exactly once, and only after the job reported `done`. Progress is
/// published as `GenerationProgress` events tagged with the operation id,
/// the owner decides whether the operation is still current.
pub struct MediaPoller {
    backend: ArcBackend,
    credentials: ArcCredentials,
    options: MediaOptions,
    interval: Duration,
}

impl MediaPoller {
    pub fn new(backend: ArcBackend, credentials: ArcCredentials) -> Self {
        Self {
            backend,
            credentials,
            options: MediaOptions::default(),
            interval: Duration::from_secs(POLL_INTERVAL_SECS),
        }
    }

    pub fn with_options(mut self, options: MediaOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub async fn run(
        &self,
        op_id: &str,
        prompt: &str,
        event_tx: &ArcEventTx,
    ) -> Result<Vec<u8>, GenerationError> {
        let started = Event::GenerationStarted {
            op_id: op_id.to_string(),
        };
        if event_tx.send(started).await.is_err() {
            log::debug!("Dropping start of operation {}: receiver closed", op_id);
        }

        if !self.credentials.has_credential() {
            report(event_tx, op_id, PROGRESS_WAITING_FOR_KEY).await;
            self.credentials.request_selection().await?;
            report(event_tx, op_id, PROGRESS_INITIALIZING).await;
        }

        match self.drive(op_id, prompt, event_tx).await {
            Err(GenerationError::Backend(err)) if err.is_authorization_lost() => {
                log::warn!("Operation {} lost authorization: {}", op_id, err);
                report(event_tx, op_id, PROGRESS_SESSION_EXPIRED).await;
                if let Err(err) = self.credentials.request_selection().await {
                    log::error!("Failed to select a new credential: {}", err);
                }
                Err(GenerationError::AuthorizationRefreshed)
            }
            other => other,
        }
    }

    async fn drive(
        &self,
        op_id: &str,
        prompt: &str,
        event_tx: &ArcEventTx,
    ) -> Result<Vec<u8>, GenerationError> {
        let token = self
            .backend
            .start_media_generation(prompt, &self.options)
            .await?;
        log::debug!("Operation {} started as {}", op_id, token.name);
        report(event_tx, op_id, PROGRESS_RENDERING_FIRST).await;

        let status = loop {
            tokio::time::sleep(self.interval).await;
            let status = self.backend.poll_media_generation(&token).await?;
            if status.done {
                break status;
            }
            report(event_tx, op_id, PROGRESS_RENDERING).await;
        };

        if let Some(error) = status.error {
            return Err(GenerationError::Operation(error));
        }
        let Some(result) = status.result else {
            return Err(GenerationError::MissingResult);
        };

        report(event_tx, op_id, PROGRESS_DOWNLOADING).await;
        match self.backend.fetch_result(&result).await {
            Ok(bytes) => {
                log::debug!("Operation {} downloaded {} bytes", op_id, bytes.len());
                Ok(bytes)
            }
            Err(BackendError::NotFound(reason)) => {
                log::warn!("Operation {} result is gone: {}", op_id, reason);
                Err(GenerationError::ResultNotFound)
            }
            Err(err) => Err(err.into()),
        }
    }
}

async fn report(event_tx: &ArcEventTx, op_id: &str, message: &str) {
    let event = Event::GenerationProgress {
        op_id: op_id.to_string(),
        message: message.to_string(),
    };
    if event_tx.send(event).await.is_err() {
        log::debug!("Dropping progress of operation {}: receiver closed", op_id);
    }
}

#[cfg(test)]
#[path = "action_test.rs"]
mod tests;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use eyre::{Context, Result};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    backend::{ArcBackend, ArcCredentials},
    config::{Configuration, VideoConfig, resolve_path},
    models::{Action, ArcEventTx, Event, MediaOptions, MediaResult},
    notice_error, notice_info, notice_warning,
    operations::{MediaPoller, aggregate_turn},
};

use super::{ArcVoice, ClipboardService};

/// Runs the work the UI asks for. Each action gets its own task, results
/// travel back as events. Nothing is ever cancelled, the UI drops events of
/// work it no longer cares about.
pub struct ActionService<'a> {
    event_tx: ArcEventTx,
    action_rx: &'a mut mpsc::UnboundedReceiver<Action>,
    cancel_token: CancellationToken,
    backend: ArcBackend,
    credentials: ArcCredentials,
    voice: ArcVoice,
    video: VideoConfig,
}

impl ActionService<'_> {
    pub fn new(
        event_tx: ArcEventTx,
        action_rx: &'_ mut mpsc::UnboundedReceiver<Action>,
        backend: ArcBackend,
        credentials: ArcCredentials,
        voice: ArcVoice,
        cancel_token: CancellationToken,
    ) -> ActionService<'_> {
        ActionService {
            event_tx,
            action_rx,
            cancel_token,
            backend,
            credentials,
            voice,
            video: Configuration::instance().video.clone(),
        }
    }

    pub fn with_video_config(mut self, video: VideoConfig) -> Self {
        self.video = video;
        self
    }

    pub async fn start(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    log::debug!("Action service cancelled");
                    return Ok(());
                }

                action = self.action_rx.recv() => {
                    let Some(action) = action else {
                        return Ok(());
                    };
                    self.dispatch(action).await;
                }
            }
        }
    }

    async fn dispatch(&self, action: Action) {
        let event_tx = Arc::clone(&self.event_tx);
        let backend = Arc::clone(&self.backend);

        match action {
            Action::SendTurn {
                version,
                turn_id,
                handle,
                text,
            } => {
                tokio::spawn(async move {
                    let stream = backend.send_turn(&handle, &text);
                    if let Err(err) = aggregate_turn(stream, version, &turn_id, event_tx).await {
                        log::warn!("Dropping turn {}: {}", turn_id, err);
                    }
                });
            }

            Action::GenerateMedia { op_id, prompt } => {
                let poller = MediaPoller::new(backend, Arc::clone(&self.credentials))
                    .with_options(MediaOptions::from(&self.video))
                    .with_interval(self.video.poll_interval());
                let output_dir = self.video.output_dir.clone();
                tokio::spawn(async move {
                    let event = generate_media(&poller, &op_id, &prompt, &output_dir, &event_tx).await;
                    if event_tx.send(event).await.is_err() {
                        log::warn!("Dropping result of operation {}", op_id);
                    }
                });
            }

            Action::Speak(text) => {
                let voice = Arc::clone(&self.voice);
                tokio::spawn(async move { speak(&backend, &voice, &text, &event_tx).await });
            }

            Action::Listen => {
                let voice = Arc::clone(&self.voice);
                tokio::spawn(async move { listen(&voice, &event_tx).await });
            }

            Action::CopyText { content, notice } => {
                if let Err(err) = ClipboardService::set(content) {
                    log::error!("Failed to copy text: {}", err);
                    send(&event_tx, notice_error!(format!("Failed to copy: {}", err))).await;
                    return;
                }
                if notice {
                    send(&event_tx, notice_info!("Copied to clipboard!")).await;
                }
            }
        }
    }
}

/// Run one generation to the end and turn the outcome into the event that
/// closes the operation.
async fn generate_media(
    poller: &MediaPoller,
    op_id: &str,
    prompt: &str,
    output_dir: &str,
    event_tx: &ArcEventTx,
) -> Event {
    let bytes = match poller.run(op_id, prompt, event_tx).await {
        Ok(bytes) => bytes,
        Err(err) => {
            log::error!("Operation {} failed: {}", op_id, err);
            return Event::GenerationFailed {
                op_id: op_id.to_string(),
                error: err.to_string(),
            };
        }
    };

    match save_media(output_dir, &bytes).await {
        Ok(result) => {
            log::info!(
                "Operation {} saved {} bytes to {}",
                op_id,
                result.size_bytes,
                result.path.display()
            );
            Event::GenerationSucceeded {
                op_id: op_id.to_string(),
                result,
            }
        }
        Err(err) => {
            log::error!("Failed to save video of operation {}: {:?}", op_id, err);
            Event::GenerationFailed {
                op_id: op_id.to_string(),
                error: format!("Failed to save video: {}", err),
            }
        }
    }
}

pub(crate) async fn save_media(output_dir: &str, bytes: &[u8]) -> Result<MediaResult> {
    let dir = PathBuf::from(resolve_path(output_dir)?);
    tokio::fs::create_dir_all(&dir)
        .await
        .wrap_err_with(|| format!("creating {}", dir.display()))?;

    let path = media_path(&dir, chrono::Utc::now().timestamp_millis());
    tokio::fs::write(&path, bytes)
        .await
        .wrap_err_with(|| format!("writing {}", path.display()))?;

    Ok(MediaResult {
        path,
        size_bytes: bytes.len(),
    })
}

fn media_path(dir: &Path, millis: i64) -> PathBuf {
    dir.join(format!("veo-generation-{}.mp4", millis))
}

/// Synthesis errors are only logged, the speaking flag is cleared either way
async fn speak(backend: &ArcBackend, voice: &ArcVoice, text: &str, event_tx: &ArcEventTx) {
    match backend.synthesize_speech(text).await {
        Ok(Some(pcm)) => match voice.play(&pcm).await {
            Ok(Some(path)) => {
                send(
                    event_tx,
                    notice_info!(format!("Speech saved to {}", path.display())),
                )
                .await
            }
            Ok(None) => {}
            Err(err) => log::error!("Failed to play speech: {:?}", err),
        },
        Ok(None) => log::warn!("No audio returned for {} chars", text.chars().count()),
        Err(err) => log::error!("Failed to synthesize speech: {}", err),
    }
    send(event_tx, Event::SpeechFinished).await;
}

async fn listen(voice: &ArcVoice, event_tx: &ArcEventTx) {
    let transcript = match voice.listen().await {
        Ok(text) => text,
        Err(err) => {
            log::warn!("Voice input failed: {}", err);
            send(event_tx, notice_warning!(format!("Voice input: {}", err))).await;
            String::new()
        }
    };
    send(event_tx, Event::VoiceTranscript(transcript)).await;
}

async fn send(event_tx: &ArcEventTx, event: Event) {
    if let Err(err) = event_tx.send(event).await {
        log::error!("Failed to send event: {}", err);
    }
}

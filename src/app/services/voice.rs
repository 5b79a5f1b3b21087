#[cfg(test)]
#[path = "voice_test.rs"]
mod tests;

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use eyre::{Context, Result, bail};

#[cfg(test)]
use mockall::automock;

use crate::config::{constants::SPEECH_SAMPLE_RATE, resolve_path};

/// Audio in and out of the app
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Voice {
    /// Record one utterance and return what was said
    async fn listen(&self) -> Result<String>;

    /// Play raw 16-bit mono PCM. Returns the file the audio went to, when
    /// the implementation writes one.
    async fn play(&self, pcm: &[u8]) -> Result<Option<PathBuf>>;
}

pub type ArcVoice = Arc<dyn Voice + Send + Sync>;

/// Terminal implementation: there is no microphone access, and speech is
/// written to WAV files instead of being played.
pub struct WavFileVoice {
    output_dir: String,
    sample_rate: u32,
}

impl WavFileVoice {
    pub fn new(output_dir: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            sample_rate: SPEECH_SAMPLE_RATE,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }
}

#[async_trait]
impl Voice for WavFileVoice {
    async fn listen(&self) -> Result<String> {
        bail!("voice input is not supported in the terminal")
    }

    async fn play(&self, pcm: &[u8]) -> Result<Option<PathBuf>> {
        let dir = PathBuf::from(resolve_path(&self.output_dir)?);
        tokio::fs::create_dir_all(&dir)
            .await
            .wrap_err_with(|| format!("creating {}", dir.display()))?;

        let path = dir.join(format!(
            "pychat-speech-{}.wav",
            chrono::Utc::now().timestamp_millis()
        ));
        tokio::fs::write(&path, encode_wav_pcm16(pcm, self.sample_rate))
            .await
            .wrap_err_with(|| format!("writing {}", path.display()))?;
        log::info!("Speech written to {}", path.display());
        Ok(Some(path))
    }
}

/// Wrap little-endian 16-bit mono samples in a RIFF/WAVE container
pub fn encode_wav_pcm16(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    let channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let block_align = channels * (bits_per_sample / 8);
    let byte_rate = sample_rate * block_align as u32;
    // An odd trailing byte is not a sample
    let data = &pcm[..pcm.len() - pcm.len() % 2];
    let data_len = data.len() as u32;

    let mut out = Vec::with_capacity(44 + data.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits_per_sample.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(data);
    out
}

use std::time::Duration;

use eyre::Result;
use serde::{Deserialize, Serialize};

use super::constants::*;
use super::defaults::*;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub video: VideoConfig,

    #[serde(default)]
    pub speech: SpeechConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeneralConfig {
    #[serde(default)]
    pub verbose: bool,

    #[serde(default = "hello_message")]
    pub hello_message: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "log_level")]
    pub level: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<LogFilter>>,

    #[serde(default)]
    pub file: LogFile,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFilter {
    #[serde(default)]
    pub module: Option<String>,

    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFile {
    #[serde(default = "log_file_path")]
    pub path: String,

    #[serde(default)]
    pub append: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BackendConfig {
    #[serde(default = "endpoint")]
    pub endpoint: String,

    /// Inline API key. Takes precedence over the environment and the key file.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub api_key_file: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u16>,

    #[serde(default = "chat_model")]
    pub chat_model: String,

    #[serde(default = "reasoning_model")]
    pub reasoning_model: String,

    #[serde(default = "video_model")]
    pub video_model: String,

    #[serde(default = "tts_model")]
    pub tts_model: String,

    #[serde(default = "voice")]
    pub voice: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ChatConfig {
    /// Start in Code Mode
    #[serde(default = "default_true")]
    pub deep_reasoning: bool,

    #[serde(default = "default_true")]
    pub search_grounding: bool,

    #[serde(default = "thinking_budget")]
    pub thinking_budget: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct VideoConfig {
    #[serde(default = "poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "resolution")]
    pub resolution: String,

    #[serde(default = "aspect_ratio")]
    pub aspect_ratio: String,

    #[serde(default = "number_of_videos")]
    pub number_of_videos: u8,

    #[serde(default = "output_dir")]
    pub output_dir: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SpeechConfig {
    #[serde(default = "max_speech_chars")]
    pub max_chars: usize,

    #[serde(default = "output_dir")]
    pub output_dir: String,
}

#[cfg(not(test))]
static CONFIG: std::sync::OnceLock<Configuration> = std::sync::OnceLock::new();

// Each test thread gets its own configuration
#[cfg(test)]
thread_local! {
    static TEST_CONFIG: std::cell::RefCell<&'static Configuration> =
        std::cell::RefCell::new(Box::leak(Box::new(Configuration::default())));
}

impl Configuration {
    #[cfg(not(test))]
    pub fn instance() -> &'static Configuration {
        CONFIG.get_or_init(Configuration::default)
    }

    #[cfg(not(test))]
    pub fn init(config: Configuration) -> Result<()> {
        CONFIG
            .set(config)
            .map_err(|_| eyre::eyre!("Config already initialized"))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn instance() -> &'static Configuration {
        TEST_CONFIG.with(|config| *config.borrow())
    }

    #[cfg(test)]
    pub fn init(config: Configuration) -> Result<()> {
        TEST_CONFIG.with(|test_config| {
            *test_config.borrow_mut() = Box::leak(Box::new(config));
        });
        Ok(())
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(|s| Duration::from_secs(s as u64))
    }
}

impl VideoConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            hello_message: Some(HELLO_MESSAGE.to_string()),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            file: LogFile::default(),
            filters: None,
        }
    }
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            path: LOG_FILE_PATH.to_string(),
            append: false,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            api_key_env: API_KEY_ENV.to_string(),
            api_key_file: None,
            timeout_secs: None,
            chat_model: CHAT_MODEL.to_string(),
            reasoning_model: REASONING_MODEL.to_string(),
            video_model: VIDEO_MODEL.to_string(),
            tts_model: TTS_MODEL.to_string(),
            voice: TTS_VOICE.to_string(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            deep_reasoning: true,
            search_grounding: true,
            thinking_budget: THINKING_BUDGET,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: POLL_INTERVAL_SECS,
            resolution: VIDEO_RESOLUTION.to_string(),
            aspect_ratio: VIDEO_ASPECT_RATIO.to_string(),
            number_of_videos: VIDEO_COUNT,
            output_dir: OUTPUT_DIR.to_string(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            max_chars: MAX_SPEECH_CHARS,
            output_dir: OUTPUT_DIR.to_string(),
        }
    }
}

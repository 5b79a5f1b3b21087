use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when deep reasoning (Code Mode) is enabled
pub const REASONING_MODEL: &str = "gemini-3-pro-preview";

/// Model used for the standard chat mode
pub const CHAT_MODEL: &str = "gemini-2.5-flash";

pub const VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

pub const TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

pub const TTS_VOICE: &str = "Kore";

pub const THINKING_BUDGET: u32 = 8192;

pub const API_KEY_ENV: &str = "API_KEY";

pub const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const REASONING_INSTRUCTION: &str = "You are PyChat, an expert Python and Full-stack engineer. You write clean, efficient, and type-safe code. You explain complex concepts simply. When asked to generate code, provide the full implementation.";

pub const ASSISTANT_INSTRUCTION: &str = "You are PyChat, a helpful and knowledgeable AI assistant. You answer questions concisely and accurately.";

pub const HELLO_MESSAGE: &str = "Hello! I'm PyChat. Toggle 'Code Mode' for complex engineering tasks, or use 'Research' to access the web. You can also talk to me!";

/// Replaces the text of a model turn whose stream failed
pub const CHAT_ERROR_MESSAGE: &str = "**Error:** Failed to generate response. Please try again.";

pub const POLL_INTERVAL_SECS: u64 = 5;

pub const VIDEO_RESOLUTION: &str = "1080p";

pub const VIDEO_ASPECT_RATIO: &str = "16:9";

pub const VIDEO_COUNT: u8 = 1;

/// Speech input is cut at this many characters
pub const MAX_SPEECH_CHARS: usize = 4000;

pub const CODE_BLOCK_PLACEHOLDER: &str = "Code block omitted for brevity.";

/// Sample rate of the PCM audio returned by the TTS model
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

pub const LOG_FILE_PATH: &str = "/tmp/pychat.log";

pub const OUTPUT_DIR: &str = ".";

pub const FRAME_DURATION: Duration = Duration::from_millis(1000 / 30);

// Progress messages reported by the poll loop
pub const PROGRESS_WAITING_FOR_KEY: &str = "Waiting for API Key selection...";
pub const PROGRESS_INITIALIZING: &str = "Initializing generation...";
pub const PROGRESS_RENDERING_FIRST: &str = "Rendering video (this may take a minute)...";
pub const PROGRESS_RENDERING: &str = "Rendering video...";
pub const PROGRESS_DOWNLOADING: &str = "Downloading video...";
pub const PROGRESS_SESSION_EXPIRED: &str = "Session expired. Please re-select API key...";

pub const ERR_NO_VIDEO_URI: &str = "No video URI returned from operation.";
pub const ERR_VIDEO_NOT_FOUND: &str = "Video resource not found. Please try again.";
pub const ERR_AUTH_REFRESHED: &str = "Authentication refreshed. Please try generating again.";

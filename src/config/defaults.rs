use super::constants::*;

pub(crate) fn hello_message() -> Option<String> {
    Some(HELLO_MESSAGE.to_string())
}

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn log_file_path() -> String {
    LOG_FILE_PATH.to_string()
}

pub(crate) fn endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

pub(crate) fn api_key_env() -> String {
    API_KEY_ENV.to_string()
}

pub(crate) fn chat_model() -> String {
    CHAT_MODEL.to_string()
}

pub(crate) fn reasoning_model() -> String {
    REASONING_MODEL.to_string()
}

pub(crate) fn video_model() -> String {
    VIDEO_MODEL.to_string()
}

pub(crate) fn tts_model() -> String {
    TTS_MODEL.to_string()
}

pub(crate) fn voice() -> String {
    TTS_VOICE.to_string()
}

pub(crate) fn thinking_budget() -> u32 {
    THINKING_BUDGET
}

pub(crate) fn poll_interval_secs() -> u64 {
    POLL_INTERVAL_SECS
}

pub(crate) fn resolution() -> String {
    VIDEO_RESOLUTION.to_string()
}

pub(crate) fn aspect_ratio() -> String {
    VIDEO_ASPECT_RATIO.to_string()
}

pub(crate) fn number_of_videos() -> u8 {
    VIDEO_COUNT
}

pub(crate) fn max_speech_chars() -> usize {
    MAX_SPEECH_CHARS
}

pub(crate) fn output_dir() -> String {
    OUTPUT_DIR.to_string()
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
#[path = "speech_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::constants::CODE_BLOCK_PLACEHOLDER;

static CODE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("valid code block pattern"));

/// Text handed to speech synthesis: fenced code blocks are replaced by a
/// short placeholder and the result is cut to `max_chars` characters.
pub fn prepare_speech_text(text: &str, max_chars: usize) -> String {
    let cleaned = CODE_BLOCK_RE.replace_all(text, CODE_BLOCK_PLACEHOLDER);
    cleaned.chars().take(max_chars).collect()
}

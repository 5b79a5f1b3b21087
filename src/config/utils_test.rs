use crate::config::constants::{CHAT_MODEL, DEFAULT_ENDPOINT, LOG_FILE_PATH, POLL_INTERVAL_SECS};

use super::*;

#[test]
fn test_load_configuration() {
    let config = load_configuration("./testdata/config.toml").expect("failed to load config");

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("debug"));
    let log_filters = log.filters.as_deref().unwrap_or_default();
    assert_eq!(log_filters.len(), 1);
    assert_eq!(log_filters[0].module.as_deref(), Some("reqwest"));
    assert_eq!(log_filters[0].level.as_deref(), Some("warn"));

    assert_eq!(log.file.path, "/var/logs/pychat.log");
    assert_eq!(log.file.append, true);

    assert_eq!(config.general.verbose, true);

    let backend = &config.backend;
    assert_eq!(backend.endpoint, "http://localhost:8080/v1beta");
    assert_eq!(backend.api_key_env, "MY_GEMINI_KEY");
    assert_eq!(backend.timeout_secs, Some(60));
    assert_eq!(backend.reasoning_model, "gemini-2.5-pro");
    // Not set in the file, falls back to the default
    assert_eq!(backend.chat_model, CHAT_MODEL);

    assert_eq!(config.chat.deep_reasoning, false);
    assert_eq!(config.chat.search_grounding, true);
    assert_eq!(config.chat.thinking_budget, 1024);

    assert_eq!(config.video.poll_interval_secs, 10);
    assert_eq!(config.video.aspect_ratio, "9:16");
    assert_eq!(config.video.output_dir, "/tmp/videos");

    assert_eq!(config.speech.max_chars, 2000);
}

#[test]
fn test_default_configuration() {
    let config: Configuration = toml::from_str("").expect("failed to parse empty config");
    assert_eq!(config.log.file.path, LOG_FILE_PATH);
    assert_eq!(config.backend.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.backend.api_key, None);
    assert_eq!(config.chat.deep_reasoning, true);
    assert_eq!(config.video.poll_interval_secs, POLL_INTERVAL_SECS);
    assert_eq!(config.video.number_of_videos, 1);
}

#[test]
fn test_resolve_path() {
    unsafe { std::env::set_var("PYCHAT_TEST_HOME", "/home/pychat") };
    assert_eq!(
        resolve_path("$PYCHAT_TEST_HOME/logs/pychat.log").unwrap(),
        "/home/pychat/logs/pychat.log"
    );
    assert_eq!(
        resolve_path("${PYCHAT_TEST_HOME}/out").unwrap(),
        "/home/pychat/out"
    );
    assert_eq!(resolve_path("/var/x$PYCHAT_UNSET_VAR").unwrap(), "/var/x");
}

#[test]
fn test_basename() {
    assert_eq!(basename("src/backend/gemini.rs"), "gemini.rs");
    assert_eq!(basename("main.rs"), "main.rs");
}

use super::*;

#[tokio::test]
async fn test_inline_key_wins() {
    let credentials = EnvCredentials::new("PYCHAT_TEST_UNSET_KEY").with_api_key(" inline ");
    assert!(credentials.has_credential());
    assert_eq!(credentials.api_key().as_deref(), Some("inline"));
}

#[tokio::test]
async fn test_reload_from_key_file() {
    let path = std::env::temp_dir().join(format!("pychat-key-{}", uuid::Uuid::new_v4()));
    let path_str = path.to_string_lossy().to_string();

    let credentials = EnvCredentials::new("PYCHAT_TEST_UNSET_KEY").with_key_file(&path_str);
    assert!(!credentials.has_credential());
    assert!(matches!(
        credentials.request_selection().await,
        Err(BackendError::Configuration(_))
    ));

    std::fs::write(&path, "file-key\n").expect("failed to write key file");
    credentials
        .request_selection()
        .await
        .expect("failed to reload key");
    assert_eq!(credentials.api_key().as_deref(), Some("file-key"));

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_env_key() {
    unsafe { std::env::set_var("PYCHAT_TEST_ENV_KEY", "env-key") };
    let credentials = EnvCredentials::new("PYCHAT_TEST_ENV_KEY");
    assert_eq!(credentials.api_key().as_deref(), Some("env-key"));
}

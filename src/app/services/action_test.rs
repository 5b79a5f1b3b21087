use std::sync::Mutex;

use crate::{
    app::services::voice::MockVoice,
    backend::{BackendError, MockBackend},
};

use super::*;

#[derive(Default)]
struct EventCollector(Mutex<Vec<Event>>);

#[async_trait::async_trait]
impl crate::models::EventTx for EventCollector {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.0.lock().expect("poisoned").push(event);
        Ok(())
    }
}

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("pychat-media-{}", uuid::Uuid::new_v4()))
}

#[test]
fn test_media_path() {
    assert_eq!(
        media_path(Path::new("/tmp/videos"), 1700000000123),
        PathBuf::from("/tmp/videos/veo-generation-1700000000123.mp4")
    );
}

#[tokio::test]
async fn test_save_media() {
    let dir = temp_dir();
    let result = save_media(&dir.to_string_lossy(), b"video")
        .await
        .expect("Failed to save media");

    assert_eq!(result.size_bytes, 5);
    assert!(result.path.starts_with(&dir));
    let name = result
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    assert!(name.starts_with("veo-generation-") && name.ends_with(".mp4"));
    assert_eq!(std::fs::read(&result.path).expect("Failed to read"), b"video");
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_speak_clears_flag_on_failure() {
    let mut backend = MockBackend::new();
    backend
        .expect_synthesize_speech()
        .times(1)
        .returning(|_| Err(BackendError::Transport("boom".to_string())));
    let mut voice = MockVoice::new();
    voice.expect_play().never();

    let collector = Arc::new(EventCollector::default());
    let event_tx: ArcEventTx = collector.clone();
    let backend: ArcBackend = Arc::new(backend);
    let voice: ArcVoice = Arc::new(voice);
    speak(&backend, &voice, "hello", &event_tx).await;

    let events = collector.0.lock().expect("poisoned");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Event::SpeechFinished));
}

#[tokio::test]
async fn test_speak_plays_audio() {
    let mut backend = MockBackend::new();
    backend
        .expect_synthesize_speech()
        .withf(|text| text == "hello")
        .times(1)
        .returning(|_| Ok(Some(vec![0, 1])));
    let mut voice = MockVoice::new();
    voice
        .expect_play()
        .withf(|pcm| pcm == [0u8, 1])
        .times(1)
        .returning(|_| Ok(None));

    let collector = Arc::new(EventCollector::default());
    let event_tx: ArcEventTx = collector.clone();
    let backend: ArcBackend = Arc::new(backend);
    let voice: ArcVoice = Arc::new(voice);
    speak(&backend, &voice, "hello", &event_tx).await;

    let events = collector.0.lock().expect("poisoned");
    assert!(matches!(events.last(), Some(Event::SpeechFinished)));
}

#[tokio::test]
async fn test_listen_failure_still_reports_transcript() {
    let mut voice = MockVoice::new();
    voice
        .expect_listen()
        .times(1)
        .returning(|| Err(eyre::eyre!("no microphone")));

    let collector = Arc::new(EventCollector::default());
    let event_tx: ArcEventTx = collector.clone();
    let voice: ArcVoice = Arc::new(voice);
    listen(&voice, &event_tx).await;

    let events = collector.0.lock().expect("poisoned");
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], Event::Notice(n) if n.message().contains("no microphone")));
    assert!(matches!(&events[1], Event::VoiceTranscript(t) if t.is_empty()));
}

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tokio::sync::mpsc;

use crate::{
    backend::{MockBackend, credentials::MockCredentialProvider},
    models::{OperationToken, PollStatus},
};

use super::*;

fn credentials(present: bool) -> MockCredentialProvider {
    let mut credentials = MockCredentialProvider::new();
    credentials
        .expect_has_credential()
        .returning(move || present);
    credentials
}

fn started_backend() -> MockBackend {
    let mut backend = MockBackend::new();
    backend
        .expect_start_media_generation()
        .times(1)
        .returning(|_, _| {
            Ok(OperationToken {
                name: "operations/abc".to_string(),
            })
        });
    backend
}

fn poller(backend: MockBackend, credentials: MockCredentialProvider) -> MediaPoller {
    MediaPoller::new(Arc::new(backend), Arc::new(credentials)).with_interval(Duration::ZERO)
}

fn progress(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<String> {
    let mut messages = vec![];
    while let Ok(event) = rx.try_recv() {
        match event {
            Event::GenerationStarted { op_id } => {
                assert_eq!(op_id, "op-1");
                messages.push("<started>".to_string());
            }
            Event::GenerationProgress { op_id, message } => {
                assert_eq!(op_id, "op-1");
                messages.push(message);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
    messages
}

#[tokio::test]
async fn test_fetches_once_after_done() {
    let polls = Arc::new(AtomicUsize::new(0));
    let mut backend = started_backend();

    let counter = polls.clone();
    backend
        .expect_poll_media_generation()
        .times(3)
        .returning(move |token| {
            assert_eq!(token.name, "operations/abc");
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Ok(PollStatus::running())
            } else {
                Ok(PollStatus::finished("https://files.example/video"))
            }
        });

    let counter = polls.clone();
    backend
        .expect_fetch_result()
        .times(1)
        .returning(move |result| {
            assert_eq!(counter.load(Ordering::SeqCst), 3);
            assert_eq!(result.uri, "https://files.example/video");
            Ok(vec![1, 2, 3])
        });

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let event_tx: ArcEventTx = Arc::new(tx);
    let bytes = poller(backend, credentials(true))
        .run("op-1", "draw a cat", &event_tx)
        .await
        .expect("Failed to generate");

    assert_eq!(bytes, vec![1, 2, 3]);
    assert_eq!(
        progress(&mut rx),
        vec![
            "<started>",
            PROGRESS_RENDERING_FIRST,
            PROGRESS_RENDERING,
            PROGRESS_RENDERING,
            PROGRESS_DOWNLOADING,
        ]
    );
}

#[tokio::test]
async fn test_runs_to_completion_when_receiver_is_gone() {
    let mut backend = started_backend();
    backend
        .expect_poll_media_generation()
        .times(1)
        .returning(|_| Ok(PollStatus::finished("https://files.example/video")));
    backend
        .expect_fetch_result()
        .times(1)
        .returning(|_| Ok(vec![7]));

    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    drop(rx);
    let event_tx: ArcEventTx = Arc::new(tx);
    let bytes = poller(backend, credentials(true))
        .run("op-1", "draw a cat", &event_tx)
        .await
        .expect("Failed to generate");

    assert_eq!(bytes, vec![7]);
}

#[tokio::test]
async fn test_done_without_result() {
    let mut backend = started_backend();
    backend
        .expect_poll_media_generation()
        .times(1)
        .returning(|_| {
            Ok(PollStatus {
                done: true,
                ..Default::default()
            })
        });
    backend.expect_fetch_result().never();

    let (tx, _rx) = mpsc::unbounded_channel::<Event>();
    let event_tx: ArcEventTx = Arc::new(tx);
    let err = poller(backend, credentials(true))
        .run("op-1", "draw a cat", &event_tx)
        .await
        .unwrap_err();

    assert_eq!(err, GenerationError::MissingResult);
    assert_eq!(err.to_string(), ERR_NO_VIDEO_URI);
}

#[tokio::test]
async fn test_done_with_operation_error() {
    let mut backend = started_backend();
    backend
        .expect_poll_media_generation()
        .times(1)
        .returning(|_| {
            Ok(PollStatus {
                done: true,
                result: None,
                error: Some("Prompt was blocked".to_string()),
            })
        });
    backend.expect_fetch_result().never();

    let (tx, _rx) = mpsc::unbounded_channel::<Event>();
    let event_tx: ArcEventTx = Arc::new(tx);
    let err = poller(backend, credentials(true))
        .run("op-1", "draw a cat", &event_tx)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Prompt was blocked");
}

#[tokio::test]
async fn test_result_not_found() {
    let mut backend = started_backend();
    backend
        .expect_poll_media_generation()
        .times(1)
        .returning(|_| Ok(PollStatus::finished("https://files.example/gone")));
    backend
        .expect_fetch_result()
        .times(1)
        .returning(|_| Err(BackendError::NotFound("Not Found".to_string())));

    let (tx, _rx) = mpsc::unbounded_channel::<Event>();
    let event_tx: ArcEventTx = Arc::new(tx);
    let err = poller(backend, credentials(true))
        .run("op-1", "draw a cat", &event_tx)
        .await
        .unwrap_err();

    assert_eq!(err, GenerationError::ResultNotFound);
    assert_eq!(err.to_string(), ERR_VIDEO_NOT_FOUND);
}

#[tokio::test]
async fn test_fetch_transport_error_keeps_message() {
    let mut backend = started_backend();
    backend
        .expect_poll_media_generation()
        .returning(|_| Ok(PollStatus::finished("https://files.example/v")));
    backend.expect_fetch_result().times(1).returning(|_| {
        Err(BackendError::Transport(
            "Failed to fetch video: Bad Gateway".to_string(),
        ))
    });

    let (tx, _rx) = mpsc::unbounded_channel::<Event>();
    let event_tx: ArcEventTx = Arc::new(tx);
    let err = poller(backend, credentials(true))
        .run("op-1", "draw a cat", &event_tx)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch video: Bad Gateway");
}

#[tokio::test]
async fn test_authorization_lost_requests_selection_once() {
    let mut backend = started_backend();
    backend
        .expect_poll_media_generation()
        .times(1)
        .returning(|_| {
            Err(BackendError::AuthorizationLost(
                "Requested entity was not found.".to_string(),
            ))
        });
    backend.expect_fetch_result().never();

    let mut credentials = credentials(true);
    credentials
        .expect_request_selection()
        .times(1)
        .returning(|| Ok(()));

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let event_tx: ArcEventTx = Arc::new(tx);
    let err = poller(backend, credentials)
        .run("op-1", "draw a cat", &event_tx)
        .await
        .unwrap_err();

    assert_eq!(err, GenerationError::AuthorizationRefreshed);
    assert_eq!(
        progress(&mut rx).last().map(String::as_str),
        Some(PROGRESS_SESSION_EXPIRED)
    );
}

#[tokio::test]
async fn test_waits_for_credential_selection() {
    let mut backend = MockBackend::new();
    backend.expect_start_media_generation().never();

    let mut credentials = credentials(false);
    credentials
        .expect_request_selection()
        .times(1)
        .returning(|| Err(BackendError::Configuration("no key".to_string())));

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let event_tx: ArcEventTx = Arc::new(tx);
    let err = poller(backend, credentials)
        .run("op-1", "draw a cat", &event_tx)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GenerationError::Backend(BackendError::Configuration("no key".to_string()))
    );
    assert_eq!(
        progress(&mut rx),
        vec!["<started>", PROGRESS_WAITING_FOR_KEY]
    );
}

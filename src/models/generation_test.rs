use std::path::PathBuf;

use super::*;

fn result() -> MediaResult {
    MediaResult {
        path: PathBuf::from("/tmp/veo.mp4"),
        size_bytes: 42,
    }
}

#[test]
fn test_success_path() {
    let mut op = GenerationOperation::new("draw a cat");
    assert_eq!(op.state(), GenerationState::Idle);
    assert!(!op.succeed(result()));

    assert!(op.start());
    assert_eq!(op.progress_message(), PROGRESS_INITIALIZING);
    assert!(!op.start());

    assert!(op.set_progress("Rendering video..."));
    assert!(op.succeed(result()));
    assert_eq!(op.state(), GenerationState::Succeeded);
    assert_eq!(op.result().unwrap().size_bytes, 42);

    assert!(!op.fail("late"));
    assert!(!op.set_progress("late"));
    assert_eq!(op.error_detail(), None);
}

#[test]
fn test_fail_and_reset() {
    let mut op = GenerationOperation::new("draw a cat");
    op.start();
    assert!(op.fail("boom"));
    assert_eq!(op.state(), GenerationState::Failed);
    assert_eq!(op.error_detail(), Some("boom"));
    assert!(!op.succeed(result()));

    assert!(op.reset());
    assert_eq!(op.state(), GenerationState::Idle);
    assert_eq!(op.error_detail(), None);
    assert_eq!(op.prompt(), "draw a cat");
    assert!(!op.reset());
}

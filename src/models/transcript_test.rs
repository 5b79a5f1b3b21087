use super::*;

#[test]
fn test_push_rejected_while_pending() {
    let mut transcript = Transcript::with_notice(Role::Model, "hello");
    assert!(transcript.push(ConversationTurn::new_user("hi")));
    assert!(transcript.push(ConversationTurn::new_pending().with_id("p1")));
    assert!(!transcript.push(ConversationTurn::new_user("again")));
    assert!(!transcript.push(ConversationTurn::new_pending()));
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript.pending().map(|t| t.id()), Some("p1"));
}

#[test]
fn test_update_requires_matching_pending_id() {
    let mut transcript = Transcript::default();
    transcript.push(ConversationTurn::new_pending().with_id("p1"));

    assert!(!transcript.update_pending("other", "stale", &[]));
    assert!(transcript.update_pending("p1", "fresh", &[]));
    assert_eq!(transcript.last().unwrap().text(), "fresh");

    assert!(!transcript.finalize_pending("other"));
    assert!(transcript.finalize_pending("p1"));
    assert!(!transcript.has_pending());
    assert!(!transcript.update_pending("p1", "late", &[]));
    assert_eq!(transcript.last().unwrap().text(), "fresh");
}

#[test]
fn test_last_model_turn() {
    let mut transcript = Transcript::with_notice(Role::System, "Switched to Standard Mode.");
    assert!(transcript.last_model_turn().is_none());

    transcript.push(ConversationTurn::new_user("question"));
    transcript.push(ConversationTurn::new_model("answer"));
    transcript.push(ConversationTurn::new_user("another"));
    transcript.push(ConversationTurn::new_pending());

    assert_eq!(transcript.last_model_turn().unwrap().text(), "answer");
}

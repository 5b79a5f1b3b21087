use crate::models::Citation;

use super::*;

fn content(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[test]
fn test_user_turn_lines() {
    let turn = ConversationTurn::new_user("hello world");
    let lines = build_turn_lines(&turn, 40);

    assert_eq!(lines.len(), 3);
    let header = content(&lines[0]);
    assert!(header.starts_with("┃ You"));
    assert_eq!(header.width(), 40);
    assert_eq!(content(&lines[1]), "┃ hello world");
    assert!(lines[2].spans.is_empty());
}

#[test]
fn test_thinking_turn() {
    let turn = ConversationTurn::new_pending();
    let lines = build_turn_lines(&turn, 40);

    assert!(content(&lines[0]).starts_with("┃ PyChat"));
    assert_eq!(content(&lines[1]), "┃ Thinking...");
}

#[test]
fn test_streaming_turn_has_cursor() {
    let mut turn = ConversationTurn::new_pending();
    turn.update("Hel", &[]);
    let lines = build_turn_lines(&turn, 40);

    assert_eq!(content(&lines[1]), "┃ Hel");
    assert_eq!(content(&lines[2]), "┃ ▌");
}

#[test]
fn test_citations_are_listed() {
    let mut turn = ConversationTurn::new_pending();
    turn.update(
        "Answer",
        &[
            Citation::new("A", "https://a.example"),
            Citation::new("B", "https://b.example"),
        ],
    );
    turn.finalize();

    let lines = build_turn_lines(&turn, 60)
        .iter()
        .map(content)
        .collect::<Vec<_>>();
    assert_eq!(
        lines[1..lines.len() - 1],
        [
            "┃ Answer",
            "┃ ",
            "┃ Sources:",
            "┃ [1] A https://a.example",
            "┃ [2] B https://b.example",
        ]
    );
}

#[test]
fn test_code_block_is_highlighted() {
    let turn = ConversationTurn::new_model("Run:\n```sh\nls\n```\nok");
    let lines = build_turn_lines(&turn, 40);

    let code = &lines[3];
    assert_eq!(content(code), "┃ ls");
    assert_eq!(code.spans[1].style.fg, Some(CODE_COLOR));
    assert_eq!(lines[5].spans[1].style.fg, None);
}

#[test]
fn test_view_follows_new_lines() {
    let mut view = TranscriptView::default();
    assert!(view.set_rect(Rect::new(0, 0, 42, 4)));
    assert!(!view.set_rect(Rect::new(0, 0, 42, 4)));

    let mut transcript = Transcript::with_notice(Role::Model, "hi");
    view.sync(&transcript);
    assert_eq!(view.scroll.position, 0);

    transcript.push(ConversationTurn::new_user("one"));
    transcript.push(ConversationTurn::new_user("two"));
    view.sync(&transcript);
    assert_eq!(view.scroll.position, 9 - 4);
}

use super::*;

#[test]
fn test_merge_citations_dedup_by_url() {
    let mut set = vec![];
    merge_citations(&mut set, vec![Citation::new("Rust", "https://rust-lang.org")]);
    merge_citations(&mut set, vec![Citation::new("Rust", "https://rust-lang.org")]);
    assert_eq!(set.len(), 1);

    merge_citations(
        &mut set,
        vec![
            Citation::new("The Rust Language", "https://rust-lang.org"),
            Citation::new("Tokio", "https://tokio.rs"),
        ],
    );
    assert_eq!(set.len(), 2);
    assert_eq!(set[0].title, "Rust");
    assert_eq!(set[1].url, "https://tokio.rs");
}

#[test]
fn test_merge_citations_skips_empty_url() {
    let mut set = vec![];
    merge_citations(&mut set, vec![Citation::new("nothing", "")]);
    assert!(set.is_empty());
}

#[test]
fn test_pending_turn_lifecycle() {
    let mut turn = ConversationTurn::new_pending();
    assert!(turn.is_pending());
    assert!(turn.is_thinking());

    assert!(turn.update("Hello", &[]));
    assert!(!turn.is_thinking());
    assert!(turn.update("Hello world", &[Citation::new("a", "https://a")]));
    assert_eq!(turn.text(), "Hello world");

    assert!(turn.finalize());
    assert!(!turn.finalize());
    assert!(!turn.update("changed", &[]));
    assert!(!turn.fail("error"));
    assert_eq!(turn.text(), "Hello world");
    assert_eq!(turn.citations().len(), 1);
}

#[test]
fn test_fail_discards_partial_text() {
    let mut turn = ConversationTurn::new_pending();
    turn.update("partial", &[Citation::new("a", "https://a")]);
    assert!(turn.fail("oops"));
    assert_eq!(turn.text(), "oops");
    assert!(turn.citations().is_empty());
    assert!(!turn.is_pending());
}

#[test]
fn test_code_blocks() {
    let turn = ConversationTurn::new_model(
        "Here:\n```python\nprint('hi')\n```\nand\n```\nls -la\necho ok\n```\n",
    );
    let blocks = turn.code_blocks();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0], "print('hi')");
    assert_eq!(blocks[1], "ls -la\necho ok");
}

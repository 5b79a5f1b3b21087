use super::*;

#[test]
fn test_replaces_code_blocks() {
    let text = "Here you go:\n```rust\nfn main() {}\n```\nand also ```ls -la``` done";
    assert_eq!(
        prepare_speech_text(text, 4000),
        format!(
            "Here you go:\n{}\nand also {} done",
            CODE_BLOCK_PLACEHOLDER, CODE_BLOCK_PLACEHOLDER
        )
    );
}

#[test]
fn test_unterminated_fence_is_kept() {
    assert_eq!(prepare_speech_text("a ```b", 4000), "a ```b");
}

#[test]
fn test_truncates_on_char_boundary() {
    let text = "héllo wörld".repeat(1000);
    let prepared = prepare_speech_text(&text, 4000);
    assert_eq!(prepared.chars().count(), 4000);
    assert!(text.starts_with(&prepared));

    assert_eq!(prepare_speech_text("short", 4000), "short");
    assert_eq!(prepare_speech_text("ünïcode", 3), "ünï");
}

use super::*;

#[test]
fn test_input_box_per_view() {
    let chat = input_box(View::Chat);
    assert_eq!(chat.placeholder_text(), "Ask PyChat anything...");
    assert_eq!(chat.lines(), [""]);

    let video = input_box(View::Video);
    assert!(video.placeholder_text().starts_with("A neon hologram"));
    assert!(video.block().is_some());
}

use ratatui::style::{Modifier, Style, Stylize};
use ratatui_macros::span;

use super::*;

#[test]
fn test_split_to_lines() {
    let text = "This is a test string that is too long to fit in a single line.";
    let lines = split_to_lines(text, 20);

    assert_eq!(lines.len(), 4);
    assert_eq!(content(&lines[0]), "This is a test ");
    assert_eq!(content(&lines[1]), "string that is too ");
    assert_eq!(content(&lines[2]), "long to fit in a ");
    assert_eq!(content(&lines[3]), "single line.");
}

#[test]
fn test_split_to_lines_keeps_styles() {
    let text = vec![span!("Sources: "), span!("Rust book").bold()];
    let lines = split_to_lines(text, 9);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    assert_eq!(lines.len(), 2);
    assert_eq!(content(&lines[0]), "Sources: ");
    assert_eq!(content(&lines[1]), "Rust book");
    assert!(lines[1].spans.iter().all(|s| s.style == bold));
}

#[test]
fn test_split_to_lines_wide_word() {
    let lines = split_to_lines("a https://example.com/very/long b", 10);
    assert_eq!(lines.len(), 3);
    assert_eq!(content(&lines[0]), "a ");
    assert_eq!(content(&lines[1]), "https://example.com/very/long");
    assert_eq!(content(&lines[2]), " b");
}

#[test]
fn test_repeat_from_subtractions() {
    assert_eq!(repeat_from_subtractions("-", &[5, 2]), "---");
    assert_eq!(repeat_from_subtractions("-", &[5, 2, 3]), "");
    assert_eq!(repeat_from_subtractions("-", &[1, 4]), "");
    assert_eq!(repeat_from_subtractions("-", &[]), "");
}

fn content(line: &Line) -> String {
    line.spans
        .iter()
        .map(|s| s.content.to_string())
        .collect::<Vec<String>>()
        .join("")
}

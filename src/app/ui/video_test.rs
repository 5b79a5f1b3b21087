use std::path::PathBuf;

use crate::{
    config::constants::{ERR_VIDEO_NOT_FOUND, PROGRESS_INITIALIZING},
    models::MediaResult,
};

use super::*;

fn texts(lines: &[Line]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}

#[test]
fn test_empty_panel() {
    let lines = texts(&status_lines(None));
    assert_eq!(lines, vec!["Describe a video and press Enter to generate it."]);
}

#[test]
fn test_running_panel() {
    let mut op = GenerationOperation::new("draw a cat");
    op.start();
    let lines = texts(&status_lines(Some(&op)));
    assert_eq!(lines[0], "Prompt: draw a cat");
    assert_eq!(lines[2], PROGRESS_INITIALIZING);
}

#[test]
fn test_failed_panel() {
    let mut op = GenerationOperation::new("draw a cat");
    op.start();
    op.fail(ERR_VIDEO_NOT_FOUND);
    let lines = texts(&status_lines(Some(&op)));
    assert_eq!(lines[2], "Generation failed");
    assert_eq!(lines[3], ERR_VIDEO_NOT_FOUND);
    assert_eq!(lines.last().map(String::as_str), Some("Press Ctrl+r to try again."));
}

#[test]
fn test_succeeded_panel() {
    let mut op = GenerationOperation::new("draw a cat");
    op.start();
    op.succeed(MediaResult {
        path: PathBuf::from("/tmp/veo-generation-1.mp4"),
        size_bytes: 3 * 1024 * 1024,
    });
    let lines = texts(&status_lines(Some(&op)));
    assert_eq!(lines[2], "Video ready!");
    assert_eq!(lines[3], "Saved to /tmp/veo-generation-1.mp4 (3.0 MB)");
}

#[test]
fn test_format_size() {
    assert_eq!(format_size(512), "512 B");
    assert_eq!(format_size(1536), "1.5 KB");
    assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GB");
}

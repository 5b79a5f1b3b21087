#[cfg(test)]
#[path = "video_test.rs"]
mod tests;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
};

use crate::models::{GenerationOperation, GenerationState};

const RUNNING_COLOR: Color = Color::Rgb(255, 213, 79);
const SUCCESS_COLOR: Color = Color::Rgb(129, 199, 132);
const FAILURE_COLOR: Color = Color::Rgb(255, 138, 128);
const HINT_COLOR: Color = Color::Rgb(158, 158, 158);

pub fn status_lines(op: Option<&GenerationOperation>) -> Vec<Line<'static>> {
    let Some(op) = op else {
        return vec![hint("Describe a video and press Enter to generate it.")];
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Prompt: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(op.prompt().to_string()),
        ]),
        Line::default(),
    ];

    match op.state() {
        GenerationState::Idle => {
            lines.push(hint("Ready. Enter a new prompt to generate a video."));
        }
        GenerationState::Running => {
            lines.push(Line::from(Span::styled(
                op.progress_message().to_string(),
                Style::default().fg(RUNNING_COLOR),
            )));
        }
        GenerationState::Succeeded => {
            lines.push(Line::from(Span::styled(
                "Video ready!",
                Style::default()
                    .fg(SUCCESS_COLOR)
                    .add_modifier(Modifier::BOLD),
            )));
            if let Some(result) = op.result() {
                lines.push(Line::from(format!(
                    "Saved to {} ({})",
                    result.path.display(),
                    format_size(result.size_bytes)
                )));
            }
        }
        GenerationState::Failed => {
            lines.push(Line::from(Span::styled(
                "Generation failed",
                Style::default()
                    .fg(FAILURE_COLOR)
                    .add_modifier(Modifier::BOLD),
            )));
            if let Some(detail) = op.error_detail() {
                lines.push(Line::from(detail.to_string()));
            }
            lines.push(Line::default());
            lines.push(hint("Press Ctrl+r to try again."));
        }
    }
    lines
}

fn hint(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(HINT_COLOR)
            .add_modifier(Modifier::ITALIC),
    ))
}

pub fn format_size(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

pub fn render(f: &mut Frame, rect: Rect, op: Option<&GenerationOperation>) {
    f.render_widget(
        Paragraph::new(status_lines(op))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(" Video Studio ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .padding(Padding::new(1, 1, 0, 0)),
            ),
        rect,
    );
}

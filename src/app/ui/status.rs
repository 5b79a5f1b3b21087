use ratatui::{
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
};
use ratatui_macros::span;

use crate::models::SessionConfiguration;

use super::View;

const ACTIVE_COLOR: Color = Color::Rgb(64, 224, 208);
const INACTIVE_COLOR: Color = Color::Rgb(117, 117, 117);

fn tab(label: &'static str, active: bool) -> Span<'static> {
    if active {
        Span::styled(
            format!(" {} ", label),
            Style::default()
                .fg(Color::Black)
                .bg(ACTIVE_COLOR)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!(" {} ", label), Style::default().fg(INACTIVE_COLOR))
    }
}

fn flag(label: &'static str, on: bool) -> Span<'static> {
    let style = if on {
        Style::default().fg(ACTIVE_COLOR).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(INACTIVE_COLOR)
    };
    Span::styled(format!("[{}] ", label), style)
}

/// Top line: view tabs and the chat session mode
pub fn header_line(
    view: View,
    session: SessionConfiguration,
    speaking: bool,
    listening: bool,
) -> Line<'static> {
    let mut spans = vec![
        span!(" PyChat ").bold(),
        tab("Chat", view == View::Chat),
        tab("Video", view == View::Video),
        span!("  "),
        flag("Code Mode", session.deep_reasoning_enabled),
        flag("Research", session.search_grounding_enabled),
    ];
    if speaking {
        spans.push(span!("♪ speaking ").italic().fg(ACTIVE_COLOR));
    }
    if listening {
        spans.push(span!("● listening ").italic().fg(Color::Rgb(255, 138, 128)));
    }
    Line::from(spans)
}

/// Bottom line: key bindings of the current view
pub fn help_line(view: View) -> Line<'static> {
    let keys: &[(&str, &str)] = match view {
        View::Chat => &[
            ("Enter", "send"),
            ("Tab", "video"),
            ("Ctrl+t", "code mode"),
            ("Ctrl+g", "research"),
            ("Ctrl+s", "speak"),
            ("Ctrl+l", "listen"),
            ("Ctrl+y", "copy code"),
            ("Ctrl+q", "quit"),
        ],
        View::Video => &[
            ("Enter", "generate"),
            ("Tab", "chat"),
            ("Ctrl+r", "reset"),
            ("Ctrl+q", "quit"),
        ],
    };

    let mut spans = vec![];
    for (key, action) in keys {
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}  ", action),
            Style::default().fg(INACTIVE_COLOR),
        ));
    }
    Line::from(spans)
}

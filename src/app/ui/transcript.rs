#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation},
};
use unicode_width::UnicodeWidthStr;

use crate::models::{ConversationTurn, Role, Transcript};

use super::{Scroll, utils};

const USER_COLOR: Color = Color::Rgb(64, 224, 208);
const MODEL_COLOR: Color = Color::Rgb(255, 140, 105);
const SYSTEM_COLOR: Color = Color::Rgb(158, 158, 158);
const CODE_COLOR: Color = Color::Rgb(171, 178, 191);
const LINK_COLOR: Color = Color::Rgb(144, 202, 249);

/// Chat history laid out as wrapped lines, rebuilt whenever the transcript
/// or the viewport changes.
#[derive(Default)]
pub struct TranscriptView {
    lines: Vec<Line<'static>>,
    width: usize,
    height: usize,
    pub scroll: Scroll,
}

impl TranscriptView {
    pub fn sync(&mut self, transcript: &Transcript) {
        let follow = self.scroll.is_position_at_last();
        self.lines = transcript
            .turns()
            .iter()
            .flat_map(|turn| build_turn_lines(turn, self.width))
            .collect();
        self.scroll.set_state(self.lines.len(), self.height);
        if follow {
            self.scroll.last();
        }
    }

    /// Returns true when the viewport changed and the lines need a rebuild
    pub fn set_rect(&mut self, rect: Rect) -> bool {
        let width = rect.width.saturating_sub(2) as usize;
        let height = rect.height as usize;
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    pub fn render(&mut self, f: &mut Frame, rect: Rect) {
        let visible = self
            .lines
            .iter()
            .skip(self.scroll.position)
            .take(rect.height as usize)
            .cloned()
            .collect::<Vec<_>>();
        f.render_widget(Paragraph::new(visible), rect);

        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .end_symbol(None)
                .begin_symbol(None),
            rect.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut self.scroll.scrollbar_state,
        );
    }
}

fn role_style(role: Role) -> (&'static str, Color) {
    match role {
        Role::User => ("You", USER_COLOR),
        Role::Model => ("PyChat", MODEL_COLOR),
        Role::System => ("System", SYSTEM_COLOR),
    }
}

pub(crate) fn build_turn_lines(turn: &ConversationTurn, width: usize) -> Vec<Line<'static>> {
    let (name, color) = role_style(turn.role());
    let bar = || Span::styled("┃ ", Style::default().fg(color));
    let max_width = width.saturating_sub(2).max(1);

    let time = turn
        .created_at()
        .with_timezone(&chrono::Local)
        .format("%H:%M")
        .to_string();
    let padding = utils::repeat_from_subtractions(" ", &[width, 2, name.width(), time.width()]);
    let mut lines = vec![
        Line::from(vec![
            bar(),
            Span::styled(name, Style::default().fg(color)),
            Span::raw(padding),
            Span::styled(time, Style::default().fg(color)),
        ])
        .bold(),
    ];

    if turn.is_thinking() {
        lines.push(Line::from(vec![
            bar(),
            Span::styled(
                "Thinking...",
                Style::default()
                    .fg(SYSTEM_COLOR)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
        lines.push(Line::default());
        return lines;
    }

    let text_style = match turn.role() {
        Role::System => Style::default()
            .fg(SYSTEM_COLOR)
            .add_modifier(Modifier::ITALIC),
        _ => Style::default(),
    };

    let mut in_code = false;
    for raw in turn.text().lines() {
        let fence = raw.trim_start().starts_with("```");
        let style = if in_code || fence {
            Style::default().fg(CODE_COLOR)
        } else {
            text_style
        };
        if fence {
            in_code = !in_code;
        }

        let wrapped = utils::split_to_lines(Span::styled(raw.to_string(), style), max_width);
        if wrapped.is_empty() {
            lines.push(Line::from(bar()));
            continue;
        }
        for line in wrapped {
            let mut spans = vec![bar()];
            spans.extend(line.spans);
            lines.push(Line::from(spans));
        }
    }

    if turn.is_pending() {
        lines.push(Line::from(vec![
            bar(),
            Span::styled("▌", Style::default().fg(color)),
        ]));
    }

    if !turn.citations().is_empty() {
        lines.push(Line::from(bar()));
        lines.push(Line::from(vec![
            bar(),
            Span::styled("Sources:", Style::default().add_modifier(Modifier::BOLD)),
        ]));
        for (i, citation) in turn.citations().iter().enumerate() {
            let entry = vec![
                Span::raw(format!("[{}] ", i + 1)),
                Span::raw(format!("{} ", citation.title)),
                Span::styled(citation.url.clone(), Style::default().fg(LINK_COLOR)),
            ];
            for line in utils::split_to_lines(entry, max_width) {
                let mut spans = vec![bar()];
                spans.extend(line.spans);
                lines.push(Line::from(spans));
            }
        }
    }

    lines.push(Line::default());
    lines
}

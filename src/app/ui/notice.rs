use std::time::Duration;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem},
};
use unicode_width::UnicodeWidthStr;

use crate::models::NoticeMessage;

use super::utils;

struct MessageWrapper {
    value: NoticeMessage,
    created_at: chrono::DateTime<chrono::Utc>,
}

/// Stack of short-lived messages in the top right corner
pub struct Notice {
    notices: Vec<MessageWrapper>,
    display_duration: Duration,
}

impl Notice {
    pub fn add_message(&mut self, msg: NoticeMessage) {
        self.notices.push(MessageWrapper {
            value: msg,
            created_at: chrono::Utc::now(),
        });
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.add_message(NoticeMessage::info(msg))
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.add_message(NoticeMessage::warning(msg))
    }

    fn sync(&mut self) {
        let now = chrono::Utc::now();
        let default_duration = self.display_duration;
        self.notices.retain(|msg| {
            let elapsed = now.signed_duration_since(msg.created_at);
            elapsed.num_milliseconds()
                < msg.value.duration().unwrap_or(default_duration).as_millis() as i64
        });
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        self.sync();
        if self.notices.is_empty() || area.width < 6 || area.height < 3 {
            return;
        }

        let max_width = (area.width as usize).saturating_sub(2);
        let max_height = area.height as usize;

        let mut items = vec![];
        let mut height = 0;
        for item in &self.notices {
            let lines = build_bubble(
                item.value.message(),
                max_width,
                item.value.kind().text_color(),
            );
            height += lines.len();
            if height > max_height {
                break;
            }
            items.push(ListItem::new(lines));
        }

        let used = Rect {
            height: height.min(max_height) as u16,
            ..area
        };
        f.render_widget(Clear, used);
        f.render_widget(List::new(items), used);
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self {
            notices: vec![],
            display_duration: Duration::from_secs(3),
        }
    }
}

fn build_bubble<'a>(message: &str, max_width: usize, color: Color) -> Vec<Line<'a>> {
    let inner = max_width.saturating_sub(2);
    let body = message
        .lines()
        .flat_map(|line| utils::split_to_lines(line.to_string(), inner))
        .map(|line| {
            let text = line
                .spans
                .iter()
                .map(|s| s.content.as_ref())
                .collect::<String>();
            let fill = utils::repeat_from_subtractions(" ", &[inner, text.width()]);
            highlight_line(format!("│ {}{} │", text.trim_end(), fill), color)
        });

    let mut lines = vec![highlight_line(format!("╭{}╮", "─".repeat(max_width)), color)];
    lines.extend(body);
    lines.push(highlight_line(format!("╰{}╯", "─".repeat(max_width)), color));
    lines
}

fn highlight_line<'a>(text: String, color: Color) -> Line<'a> {
    Line::from(Span::styled(text, Style::default().fg(color)))
}

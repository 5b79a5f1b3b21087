#[cfg(test)]
#[path = "input_test.rs"]
mod tests;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};
use ratatui_macros::span;

use super::View;

fn input_block<'a>(title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title_alignment(Alignment::Left)
        .padding(Padding::new(1, 1, 0, 0))
}

/// Empty input box for `view`
pub fn input_box<'a>(view: View) -> tui_textarea::TextArea<'a> {
    let (title, placeholder) = match view {
        View::Chat => (" Message ", "Ask PyChat anything..."),
        View::Video => (
            " Video prompt ",
            "A neon hologram of a cat driving at top speed...",
        ),
    };
    let mut textarea = tui_textarea::TextArea::default();
    textarea.set_block(input_block(title));
    textarea.set_placeholder_text(placeholder);
    textarea
}

/// Drawn over the chat input while the model is answering
pub fn render_thinking(frame: &mut Frame, rect: Rect) {
    let line = Line::from(vec![
        span!("Thinking... Press ").gray(),
        span!("Tab").green().bold(),
        span!(" to switch to the video studio.").gray(),
    ]);
    frame.render_widget(
        Paragraph::new(line)
            .style(Style::default().add_modifier(Modifier::ITALIC))
            .block(input_block("")),
        rect,
    );
}

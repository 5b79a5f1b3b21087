use std::io;

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::Result;
use ratatui::crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    layout::{Alignment, Constraint, Direction, Layout},
    prelude::{Backend, CrosstermBackend},
    widgets::Paragraph,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    app::app_state::AppState,
    app::ui::{Notice, TranscriptView, View, input, status, utils, video},
    models::{Action, Event},
};

use super::services::EventService;

const MIN_WIDTH: u16 = 60;

pub struct App<'a> {
    action_tx: mpsc::UnboundedSender<Action>,
    events: &'a mut EventService,

    app_state: AppState,
    view: View,

    chat_input: tui_textarea::TextArea<'a>,
    video_input: tui_textarea::TextArea<'a>,
    transcript_view: TranscriptView,
    notice: Notice,

    cancel_token: CancellationToken,
}

impl<'a> App<'a> {
    pub fn new(
        app_state: AppState,
        action_tx: mpsc::UnboundedSender<Action>,
        events: &'a mut EventService,
        cancel_token: CancellationToken,
    ) -> App<'a> {
        App {
            action_tx,
            events,
            app_state,
            view: View::Chat,
            chat_input: input::input_box(View::Chat),
            video_input: input::input_box(View::Video),
            transcript_view: TranscriptView::default(),
            notice: Notice::default(),
            cancel_token,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let stdout = io::stdout();
        let mut stdout = stdout.lock();

        enable_raw_mode()?;
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )?;

        let term_backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(term_backend)?;
        let result = self.start_loop(&mut terminal).await;

        self.cancel_token.cancel();

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;

        terminal.show_cursor()?;
        result
    }

    async fn start_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.transcript_view.sync(self.app_state.transcript());
        loop {
            self.render(terminal)?;
            let event = self.events.next().await;
            if self.handle_event(event) {
                return Ok(());
            }
        }
    }

    /// Returns true when the app should quit
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Quit => return true,

            Event::Notice(msg) => self.notice.add_message(msg),

            Event::TurnUpdated { .. } | Event::TurnCompleted { .. } | Event::TurnFailed { .. } => {
                if self.app_state.handle_event(&event) {
                    self.transcript_view.sync(self.app_state.transcript());
                }
            }

            Event::GenerationSucceeded { ref result, .. } => {
                let path = result.path.display().to_string();
                if self.app_state.handle_event(&event) {
                    self.notice.info(format!("Video saved to {}", path));
                }
            }

            Event::GenerationStarted { .. }
            | Event::GenerationProgress { .. }
            | Event::GenerationFailed { .. }
            | Event::SpeechFinished => {
                self.app_state.handle_event(&event);
            }

            Event::VoiceTranscript(text) => {
                self.app_state.finish_listening();
                if !text.trim().is_empty() {
                    self.chat_input.insert_str(text.trim());
                }
            }

            Event::KeyboardCharInput(input) => {
                if self.input_enabled() {
                    self.current_input().input(input);
                }
            }

            Event::KeyboardPaste(text) => {
                if self.input_enabled() {
                    let input = self.current_input();
                    input.set_yank_text(text.replace('\r', "\n"));
                    input.paste();
                }
            }

            Event::KeyboardNewLine => {
                if self.input_enabled() {
                    self.current_input().insert_newline();
                }
            }

            Event::KeyboardEnter => match self.view {
                View::Chat => self.handle_send_text(),
                View::Video => self.handle_generate(),
            },

            Event::KeyboardTab => self.view = self.view.toggle(),

            Event::KeyboardCtrlC => match self.view {
                View::Chat => self.chat_input = input::input_box(View::Chat),
                View::Video => self.video_input = input::input_box(View::Video),
            },

            Event::KeyboardCtrlT => {
                let session = self.app_state.session().toggle_deep_reasoning();
                self.reconfigure(session);
            }

            Event::KeyboardCtrlG => {
                let session = self.app_state.session().toggle_search_grounding();
                self.reconfigure(session);
            }

            Event::KeyboardCtrlS => match self.app_state.request_speech_for_last_model_turn() {
                Some(action) => self.dispatch(action),
                None if self.app_state.is_speaking() => self.notice.warning("Already speaking..."),
                None => self.notice.warning("Nothing to read out yet"),
            },

            Event::KeyboardCtrlL => {
                if let Some(action) = self.app_state.request_listen() {
                    self.notice.info("Listening...");
                    self.dispatch(action);
                }
            }

            Event::KeyboardCtrlY => {
                if let Some(action) = self.app_state.copy_code_blocks() {
                    self.dispatch(action);
                }
            }

            Event::KeyboardCtrlR => {
                if self.app_state.retry_generation() {
                    self.view = View::Video;
                    self.video_input = input::input_box(View::Video);
                }
            }

            Event::UiScrollDown => self.transcript_view.scroll.down(),
            Event::UiScrollUp => self.transcript_view.scroll.up(),
            Event::UiScrollPageDown => self.transcript_view.scroll.page_down(),
            Event::UiScrollPageUp => self.transcript_view.scroll.page_up(),

            Event::KeyboardEsc | Event::UiTick => {}
        }
        false
    }

    fn input_enabled(&self) -> bool {
        match self.view {
            View::Chat => !self.app_state.is_waiting_for_turn(),
            View::Video => true,
        }
    }

    fn current_input(&mut self) -> &mut tui_textarea::TextArea<'a> {
        match self.view {
            View::Chat => &mut self.chat_input,
            View::Video => &mut self.video_input,
        }
    }

    fn handle_send_text(&mut self) {
        let text = self.chat_input.lines().join("\n");
        if let Some(action) = self.app_state.submit_user_text(&text) {
            self.chat_input = input::input_box(View::Chat);
            self.transcript_view.scroll.last();
            self.transcript_view.sync(self.app_state.transcript());
            self.dispatch(action);
        }
    }

    fn handle_generate(&mut self) {
        let prompt = self.video_input.lines().join("\n");
        if let Some(action) = self.app_state.submit_generation(&prompt) {
            self.video_input = input::input_box(View::Video);
            self.dispatch(action);
        }
    }

    fn reconfigure(&mut self, session: crate::models::SessionConfiguration) {
        self.app_state.reconfigure(session);
        self.transcript_view.scroll.last();
        self.transcript_view.sync(self.app_state.transcript());
        self.notice.info(session.notice());
    }

    fn dispatch(&mut self, action: Action) {
        if let Err(err) = self.action_tx.send(action) {
            log::error!("Failed to dispatch action: {}", err);
            self.notice.warning("Background worker is not running");
        }
    }

    fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|f| {
            let current_width = f.area().width;
            if current_width < MIN_WIDTH {
                f.render_widget(
                    Paragraph::new(utils::split_to_lines(
                        format!(
                            "I'm too small, make me bigger! I need at least {} cells (current: {})",
                            MIN_WIDTH, current_width
                        ),
                        current_width.saturating_sub(2) as usize,
                    ))
                    .alignment(Alignment::Left),
                    f.area(),
                );
                return;
            }

            let input_lines = match self.view {
                View::Chat => self.chat_input.lines().len(),
                View::Video => self.video_input.lines().len(),
            };
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Max(input_lines as u16 + 2),
                    Constraint::Length(1),
                ])
                .split(f.area());

            f.render_widget(
                Paragraph::new(status::header_line(
                    self.view,
                    self.app_state.session(),
                    self.app_state.is_speaking(),
                    self.app_state.is_listening(),
                )),
                layout[0],
            );

            match self.view {
                View::Chat => {
                    if self.transcript_view.set_rect(layout[1]) {
                        self.transcript_view.sync(self.app_state.transcript());
                    }
                    self.transcript_view.render(f, layout[1]);

                    if self.app_state.is_waiting_for_turn() {
                        input::render_thinking(f, layout[2]);
                    } else {
                        f.render_widget(&self.chat_input, layout[2]);
                    }
                }
                View::Video => {
                    video::render(f, layout[1], self.app_state.generation());

                    f.render_widget(&self.video_input, layout[2]);
                }
            }

            f.render_widget(Paragraph::new(status::help_line(self.view)), layout[3]);
            self.notice.render(f, utils::notice_area(f.area(), 35));
        })?;
        Ok(())
    }
}

use ratatui::widgets::ScrollbarState;

const PAGE_SIZE: usize = 10;

#[derive(Debug, Default)]
pub struct Scroll {
    list_len: usize,
    viewport_len: usize,
    pub position: usize,
    pub scrollbar_state: ScrollbarState,
}

impl Scroll {
    pub fn up(&mut self) {
        self.position = self.position.saturating_sub(1);
        self.scrollbar_state = self.scrollbar_state.position(self.position);
    }

    pub fn page_up(&mut self) {
        (0..PAGE_SIZE).for_each(|_| self.up());
    }

    pub fn down(&mut self) {
        self.position = (self.position + 1).min(self.last_position());
        self.scrollbar_state = self.scrollbar_state.position(self.position);
    }

    pub fn page_down(&mut self) {
        (0..PAGE_SIZE).for_each(|_| self.down());
    }

    fn last_position(&self) -> usize {
        self.list_len.saturating_sub(self.viewport_len)
    }

    pub fn is_position_at_last(&self) -> bool {
        self.position >= self.last_position()
    }

    pub fn last(&mut self) {
        self.position = self.last_position();
        self.scrollbar_state = self.scrollbar_state.position(self.position);
    }

    pub fn set_state(&mut self, list_len: usize, viewport_len: usize) {
        self.list_len = list_len;
        self.viewport_len = viewport_len;
        self.position = self.position.min(self.last_position());
        self.scrollbar_state = self
            .scrollbar_state
            .content_length(self.last_position().max(1))
            .position(self.position);
    }
}

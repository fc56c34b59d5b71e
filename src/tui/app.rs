use ratatui::widgets::ListState;

use crate::domain::{Cart, Language, Product};

pub const SCROLL_STEP: usize = 10;

pub struct TuiApp {
    pub cart: Cart,
    pub language: Language,
    pub selected: usize,
    pub list_state: ListState,
    /// Product rows that fit in the catalog pane during the last draw.
    pub visible_rows: usize,
    /// Bumped by the refresh key; the catalog feed resets when it changes.
    pub refresh_trigger: u64,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl TuiApp {
    pub fn new(cart: Cart, language: Language) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            cart,
            language,
            selected: 0,
            list_state,
            visible_rows: 0,
            refresh_trigger: 0,
            should_quit: false,
            status_message: None,
        }
    }

    pub fn selected_product<'a>(&self, products: &'a [Product]) -> Option<&'a Product> {
        products.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.select(self.selected.saturating_sub(1));
    }

    pub fn move_down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.select(self.selected + 1);
        }
    }

    pub fn next_page(&mut self, len: usize) {
        let max_index = len.saturating_sub(1);
        self.select((self.selected + SCROLL_STEP).min(max_index));
    }

    pub fn prev_page(&mut self) {
        self.select(self.selected.saturating_sub(SCROLL_STEP));
    }

    /// Keeps the selection inside a list that may have shrunk.
    pub fn clamp_selection(&mut self, len: usize) {
        if self.selected >= len {
            self.select(len.saturating_sub(1));
        }
    }

    pub fn restart(&mut self) {
        self.refresh_trigger += 1;
        self.select(0);
        *self.list_state.offset_mut() = 0;
    }

    /// Whether row `index` was on screen in the last draw.
    pub fn is_row_visible(&self, index: usize) -> bool {
        let offset = self.list_state.offset();
        index >= offset && index < offset + self.visible_rows
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        self.list_state.select(Some(index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> TuiApp {
        TuiApp::new(Cart::new(), Language::English)
    }

    #[test]
    fn test_move_down_stops_at_end() {
        let mut app = app();
        app.move_down(2);
        app.move_down(2);
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_paging_is_clamped() {
        let mut app = app();
        app.next_page(4);
        assert_eq!(app.selected, 3);
        app.prev_page();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_row_visibility_uses_offset() {
        let mut app = app();
        app.visible_rows = 5;
        *app.list_state.offset_mut() = 10;

        assert!(!app.is_row_visible(9));
        assert!(app.is_row_visible(10));
        assert!(app.is_row_visible(14));
        assert!(!app.is_row_visible(15));
    }

    #[test]
    fn test_restart_changes_trigger() {
        let mut app = app();
        app.move_down(5);
        app.restart();
        assert_eq!(app.refresh_trigger, 1);
        assert_eq!(app.selected, 0);
    }
}

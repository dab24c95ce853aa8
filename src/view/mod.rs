//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists)
//! - `layout`: Top bar (search input, sort and genre selectors)
//! - `content`: Movie list
//! - `progress`: Status bar with paging progress
//! - `overlays`: Modal overlays (movie detail, error, help)

mod utils;
mod layout;
mod content;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{BrowseState, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, ui_state: &UiState, browse: &BrowseState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search + sort + genre
                Constraint::Min(0),    // Movie list
                Constraint::Length(3), // Status bar
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state, browse);

        content::render_main_content(frame, chunks[1], ui_state, browse);

        progress::render_progress_bar(frame, chunks[2], browse);

        if browse.is_detail_open() {
            overlays::render_movie_detail(frame, browse.detail());
        }

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::AppView;
    use crate::model::testing::{detail, movie};
    use crate::model::{BrowseState, ResultPage, UiState};

    fn screen(ui_state: &UiState, browse: &BrowseState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| AppView::render(f, ui_state, browse))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn loaded_browse() -> BrowseState {
        let mut browse = BrowseState::new();
        let ticket = browse.refresh().unwrap();
        browse.apply_list_result(&ticket, Ok(ResultPage::new(vec![movie(1), movie(2)], 1, 3)));
        browse
    }

    #[test]
    fn renders_rows_and_paging() {
        let text = screen(&UiState::default(), &loaded_browse());
        assert!(text.contains("Now Playing"));
        assert!(text.contains(&movie(2).title));
        assert!(text.contains("page 1 of 3"));
    }

    #[test]
    fn renders_detail_overlay() {
        let mut browse = loaded_browse();
        let ticket = browse.select_item(1);
        browse.apply_detail_result(&ticket, Ok(detail(1)));

        let text = screen(&UiState::default(), &browse);
        assert!(text.contains("Released"));
        assert!(text.contains("Esc to close"));
    }

    #[test]
    fn renders_loading_detail_placeholder() {
        let mut browse = loaded_browse();
        browse.select_item(1);

        let text = screen(&UiState::default(), &browse);
        assert!(text.contains("Loading movie details..."));
    }
}

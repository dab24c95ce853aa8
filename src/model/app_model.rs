//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, watch};

use super::browse::{BrowseState, DetailOutcome, DetailTicket, FetchTicket};
use super::content::{MovieDetail, ResultPage};
use super::tmdb_client::ApiError;
use super::types::{ActiveSection, UiState, cycle_genre};

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Main application model containing all state
pub struct AppModel {
    pub ui_state: Arc<Mutex<UiState>>,
    pub browse: Arc<Mutex<BrowseState>>,
    pub should_quit: Arc<Mutex<bool>>,
    /// Bumped on every mutation; the render loop subscribes to it
    revision: watch::Sender<u64>,
}

impl AppModel {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            ui_state: Arc::new(Mutex::new(UiState::default())),
            browse: Arc::new(Mutex::new(BrowseState::new())),
            should_quit: Arc::new(Mutex::new(false)),
            revision,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn touch(&self) {
        self.revision.send_modify(|r| *r = r.wrapping_add(1));
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
        self.touch();
    }

    // ========================================================================
    // UI state
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
        self.touch();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
        self.touch();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
        self.touch();
    }

    pub async fn append_to_search(&self, c: char) {
        let mut state = self.ui_state.lock().await;
        state.search_input.push(c);
        self.touch();
    }

    pub async fn backspace_search(&self) {
        let mut state = self.ui_state.lock().await;
        state.search_input.pop();
        self.touch();
    }

    pub async fn clear_search_input(&self) {
        let mut state = self.ui_state.lock().await;
        state.search_input.clear();
        self.touch();
    }

    pub async fn results_move_up(&self) {
        let mut state = self.ui_state.lock().await;
        state.results_selected = state.results_selected.saturating_sub(1);
        self.touch();
    }

    /// Move the cursor down; returns true when it was already on the last row
    pub async fn results_move_down(&self) -> bool {
        let count = self.browse.lock().await.items().len();
        let mut state = self.ui_state.lock().await;
        let at_end = state.results_selected + 1 >= count;
        if !at_end {
            state.results_selected += 1;
        }
        self.touch();
        at_end
    }

    pub async fn selected_movie_id(&self) -> Option<u64> {
        let index = self.ui_state.lock().await.results_selected;
        self.browse.lock().await.items().get(index).map(|m| m.id)
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
        self.touch();
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
        self.touch();
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed() >= ERROR_DISPLAY_TIME {
                state.error_message = None;
                state.error_timestamp = None;
                self.touch();
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
        self.touch();
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
        self.touch();
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    // ========================================================================
    // Browse state
    // ========================================================================

    pub async fn get_browse_state(&self) -> BrowseState {
        self.browse.lock().await.clone()
    }

    /// Any list transition that starts over puts the cursor back on top
    async fn reset_cursor(&self) {
        self.ui_state.lock().await.results_selected = 0;
    }

    pub async fn refresh(&self) -> Option<FetchTicket> {
        let ticket = self.browse.lock().await.refresh();
        self.reset_cursor().await;
        self.touch();
        ticket
    }

    pub async fn submit_query(&self, query: &str) -> Option<FetchTicket> {
        let ticket = self.browse.lock().await.set_query(query);
        self.reset_cursor().await;
        self.touch();
        ticket
    }

    pub async fn cycle_sort(&self, forward: bool) -> Option<FetchTicket> {
        let ticket = {
            let mut browse = self.browse.lock().await;
            let current = browse.descriptor().sort;
            let next = if forward { current.next() } else { current.prev() };
            browse.set_sort(next)
        };
        self.reset_cursor().await;
        self.touch();
        ticket
    }

    pub async fn cycle_genre(&self, forward: bool) -> Option<FetchTicket> {
        let ticket = {
            let mut browse = self.browse.lock().await;
            let next = cycle_genre(browse.descriptor().genre, forward);
            browse.set_genre(next)
        };
        self.reset_cursor().await;
        self.touch();
        ticket
    }

    pub async fn load_more(&self) -> Option<FetchTicket> {
        let ticket = self.browse.lock().await.load_more();
        if ticket.is_some() {
            self.touch();
        }
        ticket
    }

    pub async fn apply_list_result(&self, ticket: &FetchTicket, result: Result<ResultPage, ApiError>) -> bool {
        let applied = self.browse.lock().await.apply_list_result(ticket, result);
        if applied {
            // A shorter list (failed first page) must not leave the cursor dangling
            let count = self.browse.lock().await.items().len();
            let mut state = self.ui_state.lock().await;
            state.results_selected = state.results_selected.min(count.saturating_sub(1));
            drop(state);
            self.touch();
        }
        applied
    }

    pub async fn select_movie(&self, id: u64) -> DetailTicket {
        let ticket = self.browse.lock().await.select_item(id);
        self.touch();
        ticket
    }

    pub async fn close_detail(&self) {
        self.browse.lock().await.close_detail();
        self.touch();
    }

    pub async fn is_detail_open(&self) -> bool {
        self.browse.lock().await.is_detail_open()
    }

    pub async fn apply_detail_result(&self, ticket: &DetailTicket, result: Result<MovieDetail, ApiError>) -> DetailOutcome {
        let outcome = self.browse.lock().await.apply_detail_result(ticket, result);
        if outcome != DetailOutcome::Stale {
            self.touch();
        }
        outcome
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::content::MovieSummary;

    fn page_of(count: u64) -> ResultPage {
        let items = (0..count)
            .map(|id| MovieSummary {
                id,
                title: format!("Movie {id}"),
                poster_path: None,
                vote_average: None,
                release_date: None,
            })
            .collect();
        ResultPage::new(items, 1, 2)
    }

    #[tokio::test]
    async fn mutations_bump_revision() {
        let model = AppModel::new();
        let mut rx = model.subscribe();
        assert!(!rx.has_changed().unwrap());

        model.append_to_search('x').await;
        assert!(rx.has_changed().unwrap());
        let _ = rx.borrow_and_update();

        model.refresh().await;
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn cursor_stops_at_last_row() {
        let model = AppModel::new();
        let ticket = model.refresh().await.unwrap();
        model.apply_list_result(&ticket, Ok(page_of(2))).await;

        assert!(!model.results_move_down().await);
        assert!(model.results_move_down().await);
        assert_eq!(model.selected_movie_id().await, Some(1));

        model.results_move_up().await;
        model.results_move_up().await;
        assert_eq!(model.selected_movie_id().await, Some(0));
    }

    #[tokio::test]
    async fn criteria_change_resets_cursor() {
        let model = AppModel::new();
        let ticket = model.refresh().await.unwrap();
        model.apply_list_result(&ticket, Ok(page_of(5))).await;
        model.results_move_down().await;
        model.results_move_down().await;

        let ticket = model.cycle_sort(true).await.unwrap();
        assert_eq!(model.get_ui_state().await.results_selected, 0);
        assert_eq!(ticket.descriptor.sort.as_param(), "popularity.asc");
    }

    #[tokio::test]
    async fn errors_can_be_cleared() {
        let model = AppModel::new();
        model.set_error("boom".to_string()).await;
        assert!(model.has_error().await);
        model.auto_clear_old_errors().await;
        assert!(model.has_error().await);
        model.clear_error().await;
        assert!(!model.has_error().await);
    }
}

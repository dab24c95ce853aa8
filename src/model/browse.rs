//! Browse/search view state and its reconciliation into fetch requests
//!
//! Every transition that affects the list returns a [`FetchTicket`] tagged
//! with a fresh generation. Results are handed back together with their
//! ticket and only the ticket matching the pending generation is applied,
//! so a slow response for an abandoned request can never overwrite newer
//! state. Detail lookups follow the same scheme with [`DetailTicket`].

use super::content::{MovieDetail, MovieSummary, ResultPage};
use super::tmdb_client::ApiError;
use super::types::{Mode, SortKey};

/// Everything needed to issue one list request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub mode: Mode,
    /// Only meaningful while searching
    pub query: String,
    /// Only meaningful while browsing
    pub sort: SortKey,
    /// Only meaningful while browsing
    pub genre: Option<u32>,
    pub page: u32,
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self {
            mode: Mode::Browsing,
            query: String::new(),
            sort: SortKey::default(),
            genre: None,
            page: 1,
        }
    }
}

/// A list request issued for a specific generation of the view state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub descriptor: RequestDescriptor,
}

/// A detail request issued for a specific selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetailTicket {
    pub generation: u64,
    pub id: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ListStatus {
    Idle,
    Loading,
    Loaded,
    Empty,
    Failed(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DetailState {
    #[default]
    Closed,
    Loading {
        ticket: DetailTicket,
    },
    Open(MovieDetail),
}

/// What happened to a detail response handed back to the state
#[derive(Debug, PartialEq)]
pub enum DetailOutcome {
    Shown,
    /// The lookup failed; the overlay was closed and the message should be
    /// surfaced to the user
    Failed(String),
    /// The overlay was closed or moved on before the response arrived
    Stale,
}

#[derive(Clone, Debug)]
pub struct BrowseState {
    descriptor: RequestDescriptor,
    items: Vec<MovieSummary>,
    has_more: bool,
    loaded_page: u32,
    total_pages: u32,
    status: ListStatus,
    generation: u64,
    pending: Option<FetchTicket>,
    detail: DetailState,
    detail_generation: u64,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowseState {
    pub fn new() -> Self {
        Self {
            descriptor: RequestDescriptor::default(),
            items: Vec::new(),
            has_more: false,
            loaded_page: 0,
            total_pages: 0,
            status: ListStatus::Idle,
            generation: 0,
            pending: None,
            detail: DetailState::Closed,
            detail_generation: 0,
        }
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    pub fn items(&self) -> &[MovieSummary] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&FetchTicket> {
        self.pending.as_ref()
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn loaded_page(&self) -> u32 {
        self.loaded_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    pub fn is_detail_open(&self) -> bool {
        !matches!(self.detail, DetailState::Closed)
    }

    // ========================================================================
    // List transitions
    // ========================================================================

    /// Re-issue the current criteria from page 1
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        self.restart()
    }

    /// Submit a search; an empty (or blank) query returns to the default feed
    pub fn set_query(&mut self, query: &str) -> Option<FetchTicket> {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("Search cleared, back to default browse feed");
            self.descriptor = RequestDescriptor::default();
        } else {
            tracing::debug!(query, "Switching to search mode");
            self.descriptor.mode = Mode::Searching;
            self.descriptor.query = query.to_string();
        }
        self.restart()
    }

    pub fn set_sort(&mut self, sort: SortKey) -> Option<FetchTicket> {
        tracing::debug!(sort = sort.as_param(), "Sort changed");
        self.abandon_search();
        self.descriptor.sort = sort;
        self.restart()
    }

    pub fn set_genre(&mut self, genre: Option<u32>) -> Option<FetchTicket> {
        tracing::debug!(genre = ?genre, "Genre changed");
        self.abandon_search();
        self.descriptor.genre = genre;
        self.restart()
    }

    /// Ask for the next page of the browse feed.
    ///
    /// Does nothing while a list request is pending, once the feed reported
    /// no further pages, or in search mode.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.pending.is_some() || !self.has_more || self.descriptor.mode == Mode::Searching {
            tracing::trace!(
                pending = self.pending.is_some(),
                has_more = self.has_more,
                "Load more ignored"
            );
            return None;
        }
        self.descriptor.page += 1;
        tracing::debug!(page = self.descriptor.page, "Loading next page");
        self.issue()
    }

    /// Hand a list response back. Returns false if the ticket was stale and
    /// the response was dropped.
    pub fn apply_list_result(&mut self, ticket: &FetchTicket, result: Result<ResultPage, ApiError>) -> bool {
        match &self.pending {
            Some(pending) if pending.generation == ticket.generation => {}
            _ => {
                tracing::debug!(
                    generation = ticket.generation,
                    current = self.generation,
                    "Dropping stale list response"
                );
                return false;
            }
        }
        self.pending = None;

        let descriptor = &ticket.descriptor;
        match result {
            Ok(page) => {
                let browsing = descriptor.mode == Mode::Browsing;
                let received = page.items.len();
                self.has_more = browsing && page.has_more();
                self.loaded_page = descriptor.page;
                self.total_pages = page.total_pages;
                if browsing && descriptor.page > 1 {
                    self.items.extend(page.items);
                } else {
                    self.items = page.items;
                }
                self.status = if self.items.is_empty() {
                    ListStatus::Empty
                } else {
                    ListStatus::Loaded
                };
                tracing::info!(
                    page = descriptor.page,
                    received,
                    total = self.items.len(),
                    has_more = self.has_more,
                    "List updated"
                );
            }
            Err(e) => {
                tracing::error!(page = descriptor.page, error = %e, "List request failed");
                self.has_more = false;
                if descriptor.page <= 1 {
                    self.items.clear();
                    self.loaded_page = 0;
                    self.total_pages = 0;
                }
                self.status = ListStatus::Failed(format!("Failed to load movies: {}", e.user_message()));
            }
        }
        true
    }

    fn abandon_search(&mut self) {
        if self.descriptor.mode == Mode::Searching {
            tracing::debug!(query = %self.descriptor.query, "Abandoning search");
        }
        self.descriptor.mode = Mode::Browsing;
        self.descriptor.query.clear();
    }

    /// Criteria changed: back to page 1 with nothing accumulated
    fn restart(&mut self) -> Option<FetchTicket> {
        self.descriptor.page = 1;
        self.items.clear();
        self.has_more = false;
        self.loaded_page = 0;
        self.total_pages = 0;
        self.issue()
    }

    fn issue(&mut self) -> Option<FetchTicket> {
        self.status = ListStatus::Loading;
        if let Some(pending) = &self.pending {
            if pending.descriptor == self.descriptor {
                // Same intent already on the wire
                return None;
            }
        }
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            descriptor: self.descriptor.clone(),
        };
        self.pending = Some(ticket.clone());
        Some(ticket)
    }

    // ========================================================================
    // Detail overlay
    // ========================================================================

    pub fn select_item(&mut self, id: u64) -> DetailTicket {
        self.detail_generation += 1;
        let ticket = DetailTicket {
            generation: self.detail_generation,
            id,
        };
        tracing::debug!(id, "Opening movie detail");
        self.detail = DetailState::Loading { ticket };
        ticket
    }

    pub fn close_detail(&mut self) {
        if self.is_detail_open() {
            tracing::debug!("Closing movie detail");
        }
        self.detail = DetailState::Closed;
    }

    pub fn apply_detail_result(&mut self, ticket: &DetailTicket, result: Result<MovieDetail, ApiError>) -> DetailOutcome {
        match &self.detail {
            DetailState::Loading { ticket: current } if current == ticket => {}
            _ => {
                tracing::debug!(id = ticket.id, "Dropping stale detail response");
                return DetailOutcome::Stale;
            }
        }

        match result {
            Ok(detail) => {
                self.detail = DetailState::Open(detail);
                DetailOutcome::Shown
            }
            Err(e) => {
                tracing::error!(id = ticket.id, error = %e, "Detail request failed");
                self.detail = DetailState::Closed;
                DetailOutcome::Failed(format!("Could not load movie details: {}", e.user_message()))
            }
        }
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Browsing with the default sort and no genre
    pub fn is_default_feed(&self) -> bool {
        let defaults = RequestDescriptor::default();
        self.descriptor.mode == Mode::Browsing
            && self.descriptor.sort == defaults.sort
            && self.descriptor.genre == defaults.genre
    }

    /// Inline status text for the results area
    pub fn status_line(&self) -> String {
        let searching = self.descriptor.mode == Mode::Searching;
        match &self.status {
            ListStatus::Idle => String::new(),
            ListStatus::Loading if !self.items.is_empty() => "Loading more...".to_string(),
            ListStatus::Loading if searching => "Searching...".to_string(),
            ListStatus::Loading if self.is_default_feed() => "Loading now playing movies...".to_string(),
            ListStatus::Loading => "Loading movies...".to_string(),
            ListStatus::Empty if searching => {
                "No search results found. Try a different search term.".to_string()
            }
            ListStatus::Empty => "No movies match the current filters.".to_string(),
            ListStatus::Failed(message) => message.clone(),
            ListStatus::Loaded if searching => format!(
                "{} results for \"{}\"",
                self.items.len(),
                self.descriptor.query
            ),
            ListStatus::Loaded if self.has_more => "Press m to load more".to_string(),
            ListStatus::Loaded => "No more movies to show.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {id}"),
            poster_path: None,
            vote_average: Some(6.5),
            release_date: None,
        }
    }

    fn page(ids: std::ops::Range<u64>, page: u32, total_pages: u32) -> ResultPage {
        ResultPage::new(ids.map(movie).collect(), page, total_pages)
    }

    fn ids(state: &BrowseState) -> Vec<u64> {
        state.items().iter().map(|m| m.id).collect()
    }

    /// Default feed with the first of three pages loaded
    fn loaded_browse() -> BrowseState {
        let mut state = BrowseState::new();
        let ticket = state.refresh().unwrap();
        assert!(state.apply_list_result(&ticket, Ok(page(0..3, 1, 3))));
        state
    }

    #[test]
    fn initial_refresh_requests_default_feed() {
        let mut state = BrowseState::new();
        let ticket = state.refresh().unwrap();
        assert_eq!(ticket.descriptor, RequestDescriptor::default());
        assert_eq!(ticket.descriptor.sort.as_param(), "popularity.desc");
        assert!(state.is_loading());
        assert_eq!(state.status_line(), "Loading now playing movies...");
    }

    #[test]
    fn empty_default_feed_reports_no_matches() {
        let mut state = BrowseState::new();
        let ticket = state.refresh().unwrap();
        state.apply_list_result(&ticket, Ok(page(0..0, 1, 0)));
        assert!(state.is_default_feed());
        assert_eq!(state.status_line(), "No movies match the current filters.");

        state.set_genre(Some(28));
        assert!(!state.is_default_feed());
        assert_eq!(state.status_line(), "Loading movies...");
    }

    #[test]
    fn sort_and_genre_changes_reset_page_and_items() {
        let mut state = loaded_browse();
        let more = state.load_more().unwrap();
        state.apply_list_result(&more, Ok(page(3..6, 2, 3)));
        assert_eq!(state.descriptor().page, 2);

        let steps: [fn(&mut BrowseState) -> Option<FetchTicket>; 4] = [
            |s| s.set_sort(SortKey::VoteAverageDesc),
            |s| s.set_genre(Some(28)),
            |s| s.set_genre(None),
            |s| s.set_sort(SortKey::TitleAsc),
        ];
        for step in steps {
            let ticket = step(&mut state).unwrap();
            assert_eq!(ticket.descriptor.page, 1);
            assert!(state.items().is_empty());
            assert!(!state.has_more());
            state.apply_list_result(&ticket, Ok(page(10..12, 1, 2)));
        }
        assert_eq!(state.descriptor().sort, SortKey::TitleAsc);
        assert_eq!(state.descriptor().genre, None);
    }

    #[test]
    fn clearing_search_restores_defaults() {
        let mut state = BrowseState::new();
        state.set_sort(SortKey::ReleaseDateAsc);
        state.set_genre(Some(35));
        state.set_query("alien");

        let ticket = state.set_query("   ").unwrap();
        assert_eq!(state.descriptor().mode, Mode::Browsing);
        assert_eq!(state.descriptor().sort, SortKey::PopularityDesc);
        assert_eq!(state.descriptor().genre, None);
        assert_eq!(ticket.descriptor, RequestDescriptor::default());
    }

    #[test]
    fn load_more_is_noop_while_pending() {
        let mut state = BrowseState::new();
        let _first = state.refresh().unwrap();
        assert!(state.load_more().is_none());
        assert_eq!(state.descriptor().page, 1);

        let mut state = loaded_browse();
        let second = state.load_more().unwrap();
        assert_eq!(second.descriptor.page, 2);
        assert!(state.load_more().is_none());
        assert_eq!(state.descriptor().page, 2);
    }

    #[test]
    fn load_more_is_noop_without_continuation() {
        let mut state = BrowseState::new();
        let ticket = state.refresh().unwrap();
        state.apply_list_result(&ticket, Ok(page(0..2, 1, 1)));
        assert!(!state.has_more());
        assert!(state.load_more().is_none());
        assert_eq!(state.descriptor().page, 1);
        assert_eq!(state.status_line(), "No more movies to show.");
    }

    #[test]
    fn search_is_single_page_without_continuation() {
        let mut state = loaded_browse();
        let ticket = state.set_query("batman").unwrap();
        assert_eq!(ticket.descriptor.mode, Mode::Searching);
        assert_eq!(ticket.descriptor.query, "batman");
        assert_eq!(ticket.descriptor.page, 1);

        // the provider says there are more pages, search ignores that
        state.apply_list_result(&ticket, Ok(page(100..120, 1, 7)));
        assert_eq!(state.items().len(), 20);
        assert!(!state.has_more());
        assert!(state.load_more().is_none());
        assert_eq!(state.status_line(), "20 results for \"batman\"");
    }

    #[test]
    fn load_more_appends_with_same_criteria() {
        let mut state = BrowseState::new();
        state.set_sort(SortKey::VoteAverageDesc);
        let first = state.set_genre(Some(28)).unwrap();
        assert_eq!(first.descriptor.sort.as_param(), "vote_average.desc");
        assert_eq!(first.descriptor.genre, Some(28));
        state.apply_list_result(&first, Ok(page(0..3, 1, 5)));

        let second = state.load_more().unwrap();
        assert_eq!(second.descriptor.page, 2);
        assert_eq!(second.descriptor.sort, SortKey::VoteAverageDesc);
        assert_eq!(second.descriptor.genre, Some(28));

        state.apply_list_result(&second, Ok(page(3..6, 2, 5)));
        assert_eq!(ids(&state), vec![0, 1, 2, 3, 4, 5]);
        assert!(state.has_more());
        assert_eq!(state.loaded_page(), 2);
    }

    #[test]
    fn empty_first_page_reports_no_matches() {
        let mut state = BrowseState::new();
        let ticket = state.set_genre(Some(99)).unwrap();
        state.apply_list_result(&ticket, Ok(ResultPage::new(vec![], 1, 0)));

        assert!(state.items().is_empty());
        assert!(!state.has_more());
        assert_eq!(state.status(), &ListStatus::Empty);
        assert_eq!(state.status_line(), "No movies match the current filters.");
    }

    #[test]
    fn stale_list_response_is_dropped() {
        let mut state = BrowseState::new();
        let old = state.set_sort(SortKey::PopularityAsc).unwrap();
        let new = state.set_sort(SortKey::TitleDesc).unwrap();

        state.apply_list_result(&new, Ok(page(50..52, 1, 1)));
        assert!(!state.apply_list_result(&old, Ok(page(0..10, 1, 9))));
        assert_eq!(ids(&state), vec![50, 51]);
        assert!(!state.has_more());
    }

    #[test]
    fn late_response_does_not_clear_newer_pending() {
        let mut state = BrowseState::new();
        let old = state.set_query("heat").unwrap();
        let new = state.set_query("ronin").unwrap();

        assert!(!state.apply_list_result(&old, Err(ApiError::Network("reset".into()))));
        assert_eq!(state.pending(), Some(&new));
        assert_eq!(state.status(), &ListStatus::Loading);
    }

    #[test]
    fn identical_intent_is_not_issued_twice() {
        let mut state = BrowseState::new();
        let first = state.set_query("dune").unwrap();
        assert!(state.set_query("dune").is_none());

        // the pending request still applies
        assert!(state.apply_list_result(&first, Ok(page(0..1, 1, 1))));
        // once settled, resubmitting retries
        assert!(state.set_query("dune").is_some());
    }

    #[test]
    fn first_page_failure_clears_items() {
        let mut state = loaded_browse();
        let ticket = state.refresh().unwrap();
        state.apply_list_result(&ticket, Err(ApiError::Upstream { status: 500 }));

        assert!(state.items().is_empty());
        assert!(!state.has_more());
        assert!(matches!(state.status(), ListStatus::Failed(_)));
        assert!(state.status_line().starts_with("Failed to load movies"));
    }

    #[test]
    fn later_page_failure_keeps_items() {
        let mut state = loaded_browse();
        let ticket = state.load_more().unwrap();
        state.apply_list_result(&ticket, Err(ApiError::Network("timed out".into())));

        assert_eq!(ids(&state), vec![0, 1, 2]);
        assert!(!state.has_more());
        assert!(state.load_more().is_none());
    }

    #[test]
    fn sort_change_abandons_search() {
        let mut state = BrowseState::new();
        state.set_query("up");
        let ticket = state.set_sort(SortKey::ReleaseDateDesc).unwrap();
        assert_eq!(ticket.descriptor.mode, Mode::Browsing);
        assert!(ticket.descriptor.query.is_empty());
    }

    #[test]
    fn detail_arriving_after_close_is_ignored() {
        let mut state = BrowseState::new();
        let ticket = state.select_item(603);
        assert!(state.is_detail_open());
        state.close_detail();

        let detail = MovieDetail {
            id: 603,
            title: "The Matrix".to_string(),
            poster_path: None,
            vote_average: None,
            vote_count: 0,
            release_date: None,
            overview: String::new(),
            runtime: None,
            genres: vec![],
            trailer_url: None,
        };
        assert_eq!(state.apply_detail_result(&ticket, Ok(detail)), DetailOutcome::Stale);
        assert_eq!(state.detail(), &DetailState::Closed);
    }

    #[test]
    fn only_latest_selection_is_shown() {
        let mut state = BrowseState::new();
        let first = state.select_item(1);
        let second = state.select_item(2);

        let outcome = state.apply_detail_result(&first, Err(ApiError::NotFound { id: 1 }));
        assert_eq!(outcome, DetailOutcome::Stale);
        assert_eq!(state.detail(), &DetailState::Loading { ticket: second });
    }

    #[test]
    fn detail_failure_closes_overlay() {
        let mut state = BrowseState::new();
        let ticket = state.select_item(42);
        let outcome = state.apply_detail_result(&ticket, Err(ApiError::NotFound { id: 42 }));

        assert!(matches!(outcome, DetailOutcome::Failed(_)));
        assert!(!state.is_detail_open());
    }
}

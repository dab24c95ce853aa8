//! Core type definitions for the application

use std::time::Instant;

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Sort,
    Genre,
    Results,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Sort,
            ActiveSection::Sort => ActiveSection::Genre,
            ActiveSection::Genre => ActiveSection::Results,
            ActiveSection::Results => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Results,
            ActiveSection::Sort => ActiveSection::Search,
            ActiveSection::Genre => ActiveSection::Sort,
            ActiveSection::Results => ActiveSection::Genre,
        }
    }
}

/// Whether the list shows the discovery feed or free-text search results
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Browsing,
    Searching,
}

/// Discovery ordering, rendered to the provider's `sort_by` token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    PopularityDesc,
    PopularityAsc,
    VoteAverageDesc,
    VoteAverageAsc,
    ReleaseDateDesc,
    ReleaseDateAsc,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::PopularityDesc,
        SortKey::PopularityAsc,
        SortKey::VoteAverageDesc,
        SortKey::VoteAverageAsc,
        SortKey::ReleaseDateDesc,
        SortKey::ReleaseDateAsc,
        SortKey::TitleAsc,
        SortKey::TitleDesc,
    ];

    pub fn as_param(self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "popularity.desc",
            SortKey::PopularityAsc => "popularity.asc",
            SortKey::VoteAverageDesc => "vote_average.desc",
            SortKey::VoteAverageAsc => "vote_average.asc",
            SortKey::ReleaseDateDesc => "primary_release_date.desc",
            SortKey::ReleaseDateAsc => "primary_release_date.asc",
            SortKey::TitleAsc => "title.asc",
            SortKey::TitleDesc => "title.desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "Most popular",
            SortKey::PopularityAsc => "Least popular",
            SortKey::VoteAverageDesc => "Highest rated",
            SortKey::VoteAverageAsc => "Lowest rated",
            SortKey::ReleaseDateDesc => "Newest",
            SortKey::ReleaseDateAsc => "Oldest",
            SortKey::TitleAsc => "Title A-Z",
            SortKey::TitleDesc => "Title Z-A",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A provider genre (for the genre selector)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: &'static str,
}

/// The provider's movie genre table
pub const GENRES: [Genre; 19] = [
    Genre { id: 28, name: "Action" },
    Genre { id: 12, name: "Adventure" },
    Genre { id: 16, name: "Animation" },
    Genre { id: 35, name: "Comedy" },
    Genre { id: 80, name: "Crime" },
    Genre { id: 99, name: "Documentary" },
    Genre { id: 18, name: "Drama" },
    Genre { id: 10751, name: "Family" },
    Genre { id: 14, name: "Fantasy" },
    Genre { id: 36, name: "History" },
    Genre { id: 27, name: "Horror" },
    Genre { id: 10402, name: "Music" },
    Genre { id: 9648, name: "Mystery" },
    Genre { id: 10749, name: "Romance" },
    Genre { id: 878, name: "Science Fiction" },
    Genre { id: 10770, name: "TV Movie" },
    Genre { id: 53, name: "Thriller" },
    Genre { id: 10752, name: "War" },
    Genre { id: 37, name: "Western" },
];

pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRES.iter().find(|g| g.id == id).map(|g| g.name)
}

/// Step through "all genres" followed by the genre table, wrapping around
pub fn cycle_genre(current: Option<u32>, forward: bool) -> Option<u32> {
    // Slot 0 is "all genres"
    let slots = GENRES.len() + 1;
    let index = current
        .and_then(|id| GENRES.iter().position(|g| g.id == id))
        .map(|i| i + 1)
        .unwrap_or(0);
    let next = if forward {
        (index + 1) % slots
    } else {
        (index + slots - 1) % slots
    };
    if next == 0 { None } else { Some(GENRES[next - 1].id) }
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_input: String,
    pub results_selected: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Search,
            search_input: String::new(),
            results_selected: 0,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_cycles_through_all_keys() {
        let mut key = SortKey::default();
        for _ in 0..SortKey::ALL.len() {
            key = key.next();
        }
        assert_eq!(key, SortKey::PopularityDesc);
        assert_eq!(SortKey::PopularityDesc.prev(), SortKey::TitleDesc);
    }

    #[test]
    fn sort_key_params() {
        assert_eq!(SortKey::VoteAverageDesc.as_param(), "vote_average.desc");
        assert_eq!(SortKey::ReleaseDateAsc.as_param(), "primary_release_date.asc");
        assert_eq!(SortKey::default().as_param(), "popularity.desc");
    }

    #[test]
    fn genre_cycle_wraps_through_all_genres() {
        assert_eq!(cycle_genre(None, true), Some(28));
        assert_eq!(cycle_genre(None, false), Some(37));
        assert_eq!(cycle_genre(Some(37), true), None);
        assert_eq!(cycle_genre(Some(28), false), None);
        assert_eq!(cycle_genre(Some(28), true), Some(12));
    }

    #[test]
    fn genre_names_resolve() {
        assert_eq!(genre_name(878), Some("Science Fiction"));
        assert_eq!(genre_name(1), None);
    }

    #[test]
    fn section_cycle_is_symmetric() {
        let start = ActiveSection::Search;
        assert_eq!(start.next().prev(), start);
        assert_eq!(start.prev(), ActiveSection::Results);
    }
}

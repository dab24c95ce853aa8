//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (enums, sort keys, genres, UI state)
//! - `content`: Movie data (list rows, result pages, detail, trailer selection)
//! - `browse`: Browse/search view state and request reconciliation
//! - `tmdb_client`: TMDB API client and the `MovieApi` seam
//! - `fetcher`: List and detail fetchers built on `MovieApi`
//! - `app_model`: Main application model with state management methods

mod types;
mod content;
mod browse;
mod tmdb_client;
mod fetcher;
mod app_model;

// Re-export all public types for convenient access
pub use types::{ActiveSection, Mode, SortKey, UiState, genre_name};

pub use content::{MovieDetail, MovieSummary, ResultPage};

pub use browse::{BrowseState, DetailOutcome, DetailState, DetailTicket, FetchTicket, ListStatus};

pub use tmdb_client::{ApiError, MovieApi, TmdbClient};

pub use fetcher::{DetailFetcher, ListFetcher};

#[cfg(test)]
pub(crate) use fetcher::testing;

pub use app_model::AppModel;

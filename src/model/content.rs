//! Movie data structures shown in the results list and the detail overlay

use chrono::{Datelike, NaiveDate};

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const TRAILER_SITE: &str = "YouTube";
const TRAILER_BASE_URL: &str = "https://www.youtube.com/watch?v=";

/// A movie row in the results list
#[derive(Clone, Debug, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
}

impl MovieSummary {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(parse_release_date)
            .map(|d| d.year())
    }
}

/// One page of list results
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultPage {
    pub items: Vec<MovieSummary>,
    pub page: u32,
    pub total_pages: u32,
}

impl ResultPage {
    /// The provider refuses discovery pages beyond this one
    pub const MAX_PAGE: u32 = 500;

    pub fn new(items: Vec<MovieSummary>, page: u32, total_pages: u32) -> Self {
        let total_pages = if items.is_empty() {
            total_pages
        } else {
            total_pages.max(page)
        };
        Self { items, page, total_pages }
    }

    /// Whether a further page exists after this one
    pub fn has_more(&self) -> bool {
        !self.items.is_empty() && self.page < self.total_pages.min(Self::MAX_PAGE)
    }
}

/// Full movie information for the detail overlay
#[derive(Clone, Debug, PartialEq)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: u64,
    pub release_date: Option<String>,
    pub overview: String,
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub trailer_url: Option<String>,
}

impl MovieDetail {
    pub fn genres_display(&self) -> String {
        if self.genres.is_empty() {
            "N/A".to_string()
        } else {
            self.genres.join(", ")
        }
    }

    pub fn poster_url(&self) -> Option<String> {
        self.poster_path.as_deref().map(poster_url)
    }

    pub fn release_display(&self) -> String {
        match self.release_date.as_deref() {
            Some(raw) => parse_release_date(raw)
                .map(|d| d.format("%B %-d, %Y").to_string())
                .unwrap_or_else(|| raw.to_string()),
            None => "Unknown".to_string(),
        }
    }
}

/// A video attached to a movie (trailers, teasers, clips...)
#[derive(Clone, Debug, PartialEq)]
pub struct Video {
    pub key: String,
    pub site: String,
    pub kind: String,
    pub official: bool,
}

/// Pick the trailer to link from the detail overlay.
///
/// Prefers the first official trailer on the expected platform, then the
/// first trailer on that platform regardless of flag.
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    let on_platform = |v: &&Video| v.kind == "Trailer" && v.site == TRAILER_SITE;
    videos
        .iter()
        .filter(on_platform)
        .find(|v| v.official)
        .or_else(|| videos.iter().find(on_platform))
}

pub fn trailer_url(video: &Video) -> String {
    format!("{}{}", TRAILER_BASE_URL, video.key)
}

pub fn poster_url(path: &str) -> String {
    format!("{}{}", POSTER_BASE_URL, path)
}

fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

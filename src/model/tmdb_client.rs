//! TMDB API client wrapper with the four endpoints the browser needs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::{Config, Credential};
use crate::{log_api_request, log_api_result};
use super::content::{MovieDetail, MovieSummary, ResultPage, Video};
use super::types::SortKey;

const LANGUAGE: &str = "en-US";
const DISCOVER_PATH: &str = "/discover/movie";
const SEARCH_PATH: &str = "/search/movie";

/// Failures talking to the metadata provider
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned HTTP {status}")]
    Upstream { status: u16 },

    #[error("movie {id} not found")]
    NotFound { id: u64 },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Short text for the status line and error notification
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "network unavailable, try again".to_string(),
            ApiError::Upstream { status: 401 } => "the API token was rejected".to_string(),
            ApiError::Upstream { status: 429 } => "rate limited, please wait a moment".to_string(),
            ApiError::Upstream { status } if *status >= 500 => {
                format!("the movie service is having trouble (HTTP {status})")
            }
            ApiError::Upstream { status } => format!("request refused (HTTP {status})"),
            ApiError::NotFound { .. } => "movie not found".to_string(),
            ApiError::Decode(_) => "unexpected response from the movie service".to_string(),
        }
    }
}

impl ApiError {
    /// HTTP status behind the failure, if the provider answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Upstream { status } => Some(*status),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // The URL may carry the api_key query parameter
        let err = err.without_url();
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Outbound seam to the metadata provider.
///
/// The fetchers only talk to this trait so tests can swap in a fake.
#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn discover(&self, sort: SortKey, genre: Option<u32>, page: u32) -> ApiResult<ResultPage>;

    async fn search(&self, query: &str) -> ApiResult<ResultPage>;

    /// Detail without the trailer; `DetailFetcher` merges in the videos
    async fn movie_detail(&self, id: u64) -> ApiResult<MovieDetail>;

    async fn movie_videos(&self, id: u64) -> ApiResult<Vec<Video>>;
}

#[derive(Deserialize)]
struct PagePayload {
    page: u32,
    #[serde(default)]
    results: Vec<MoviePayload>,
    #[serde(default)]
    total_pages: u32,
}

#[derive(Deserialize)]
struct MoviePayload {
    id: u64,
    #[serde(default)]
    title: String,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    release_date: Option<String>,
}

#[derive(Deserialize)]
struct GenrePayload {
    name: String,
}

#[derive(Deserialize)]
struct DetailPayload {
    id: u64,
    #[serde(default)]
    title: String,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    #[serde(default)]
    vote_count: u64,
    release_date: Option<String>,
    overview: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<GenrePayload>,
}

#[derive(Deserialize)]
struct VideosPayload {
    #[serde(default)]
    results: Vec<VideoPayload>,
}

#[derive(Deserialize)]
struct VideoPayload {
    key: String,
    site: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    official: bool,
}

impl From<MoviePayload> for MovieSummary {
    fn from(m: MoviePayload) -> Self {
        Self {
            id: m.id,
            title: m.title,
            poster_path: m.poster_path.filter(|p| !p.is_empty()),
            // The provider reports 0 for unrated movies
            vote_average: m.vote_average.filter(|v| *v > 0.0),
            release_date: m.release_date.filter(|d| !d.is_empty()),
        }
    }
}

impl From<PagePayload> for ResultPage {
    fn from(p: PagePayload) -> Self {
        let items = p.results.into_iter().map(MovieSummary::from).collect();
        ResultPage::new(items, p.page.max(1), p.total_pages)
    }
}

impl From<DetailPayload> for MovieDetail {
    fn from(d: DetailPayload) -> Self {
        Self {
            id: d.id,
            title: d.title,
            poster_path: d.poster_path.filter(|p| !p.is_empty()),
            vote_average: d.vote_average.filter(|v| *v > 0.0),
            vote_count: d.vote_count,
            release_date: d.release_date.filter(|r| !r.is_empty()),
            overview: d.overview.unwrap_or_default(),
            runtime: d.runtime.filter(|r| *r > 0),
            genres: d.genres.into_iter().map(|g| g.name).collect(),
            trailer_url: None,
        }
    }
}

impl From<VideoPayload> for Video {
    fn from(v: VideoPayload) -> Self {
        Self {
            key: v.key,
            site: v.site,
            kind: v.kind,
            official: v.official,
        }
    }
}

/// reqwest-backed TMDB v3 client
#[derive(Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    credential: Credential,
}

impl TmdbClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("flixter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!(base_url = %config.base_url, "TMDB client initialized");

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credential: config.credential.clone(),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(&[("language", LANGUAGE)]);

        match &self.credential {
            Credential::ApiKey(key) => builder.query(&[("api_key", key.as_str())]),
            Credential::BearerToken(token) => builder.bearer_auth(token),
        }
    }

    fn discover_request(&self, sort: SortKey, genre: Option<u32>, page: u32) -> RequestBuilder {
        let mut builder = self.get(DISCOVER_PATH).query(&[
            ("sort_by", sort.as_param()),
            ("include_adult", "false"),
        ]);
        if let Some(genre) = genre {
            builder = builder.query(&[("with_genres", genre)]);
        }
        builder.query(&[("page", page)])
    }

    fn search_request(&self, query: &str) -> RequestBuilder {
        self.get(SEARCH_PATH).query(&[
            ("query", query),
            ("include_adult", "false"),
            ("page", "1"),
        ])
    }

    /// Send the request and decode a 2xx body; `not_found` names the movie
    /// a 404 refers to, if any.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        not_found: Option<u64>,
    ) -> ApiResult<T> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(match (status, not_found) {
                (StatusCode::NOT_FOUND, Some(id)) => ApiError::NotFound { id },
                _ => ApiError::Upstream { status: status.as_u16() },
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MovieApi for TmdbClient {
    async fn discover(&self, sort: SortKey, genre: Option<u32>, page: u32) -> ApiResult<ResultPage> {
        let started = log_api_request!("discover", DISCOVER_PATH, sort = sort.as_param(), genre = ?genre, page);
        let result = self
            .send::<PagePayload>(self.discover_request(sort, genre, page), None)
            .await
            .map(ResultPage::from);
        log_api_result!("discover", DISCOVER_PATH, started, result);
        result
    }

    async fn search(&self, query: &str) -> ApiResult<ResultPage> {
        let started = log_api_request!("search", SEARCH_PATH, query);
        let result = self
            .send::<PagePayload>(self.search_request(query), None)
            .await
            .map(ResultPage::from);
        log_api_result!("search", SEARCH_PATH, started, result);
        result
    }

    async fn movie_detail(&self, id: u64) -> ApiResult<MovieDetail> {
        let path = format!("/movie/{id}");
        let started = log_api_request!("movie_detail", path);
        let result = self
            .send::<DetailPayload>(self.get(&path), Some(id))
            .await
            .map(MovieDetail::from);
        log_api_result!("movie_detail", path, started, result);
        result
    }

    async fn movie_videos(&self, id: u64) -> ApiResult<Vec<Video>> {
        let path = format!("/movie/{id}/videos");
        let started = log_api_request!("movie_videos", path);
        let result = self
            .send::<VideosPayload>(self.get(&path), Some(id))
            .await
            .map(|v| v.results.into_iter().map(Video::from).collect());
        log_api_result!("movie_videos", path, started, result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(credential: Credential) -> TmdbClient {
        let config = Config {
            credential,
            base_url: "https://api.example.test/3/".to_string(),
            timeout_secs: 5,
        };
        TmdbClient::new(&config).unwrap()
    }

    fn query_pairs(builder: RequestBuilder) -> (String, Vec<(String, String)>, Option<String>) {
        let request = builder.build().unwrap();
        let auth = request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .map(|v| v.to_str().unwrap().to_string());
        let pairs = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        (request.url().path().to_string(), pairs, auth)
    }

    /// Serve one canned HTTP response on a local port and return its base URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}/3")
    }

    fn local_client(base_url: String) -> TmdbClient {
        let config = Config {
            credential: Credential::ApiKey("k3y".to_string()),
            base_url,
            timeout_secs: 5,
        };
        TmdbClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn search_decodes_page_from_server() {
        let base = serve_once(
            "200 OK",
            r#"{"page":1,"results":[{"id":268,"title":"Batman"}],"total_pages":1}"#,
        )
        .await;
        let page = local_client(base).search("batman").await.unwrap();
        assert_eq!(page.items[0].id, 268);
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let base = serve_once("200 OK", "<html>not json</html>").await;
        let result = local_client(base).search("batman").await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn missing_movie_is_not_found() {
        let base = serve_once("404 Not Found", r#"{"status_code":34}"#).await;
        let result = local_client(base).movie_detail(42).await;
        assert!(matches!(result, Err(ApiError::NotFound { id: 42 })));
    }

    #[tokio::test]
    async fn server_error_is_upstream() {
        let base = serve_once("503 Service Unavailable", "{}").await;
        let result = local_client(base).discover(SortKey::default(), None, 1).await;
        assert!(matches!(result, Err(ApiError::Upstream { status: 503 })));
        assert_eq!(result.unwrap_err().status(), Some(503));
    }

    #[tokio::test]
    async fn network_errors_do_not_leak_the_api_key() {
        // Nothing listens on this port once the listener is dropped
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = local_client(format!("http://{addr}/3")).search("heat").await;
        match result {
            Err(e @ ApiError::Network(_)) => {
                assert!(!e.to_string().contains("k3y"));
                assert_eq!(e.status(), None);
            }
            other => panic!("expected a network error, got {other:?}"),
        }
    }

    fn has(pairs: &[(String, String)], key: &str, value: &str) -> bool {
        pairs.iter().any(|(k, v)| k == key && v == value)
    }

    #[test]
    fn discover_request_encodes_sort_genre_and_page() {
        let tmdb = client(Credential::ApiKey("k3y".to_string()));
        let (path, pairs, auth) =
            query_pairs(tmdb.discover_request(SortKey::VoteAverageDesc, Some(28), 2));

        assert_eq!(path, "/3/discover/movie");
        assert!(has(&pairs, "sort_by", "vote_average.desc"));
        assert!(has(&pairs, "with_genres", "28"));
        assert!(has(&pairs, "page", "2"));
        assert!(has(&pairs, "api_key", "k3y"));
        assert!(has(&pairs, "language", "en-US"));
        assert!(auth.is_none());
    }

    #[test]
    fn discover_request_omits_genre_when_unset() {
        let tmdb = client(Credential::ApiKey("k3y".to_string()));
        let (_, pairs, _) = query_pairs(tmdb.discover_request(SortKey::default(), None, 1));
        assert!(!pairs.iter().any(|(k, _)| k == "with_genres"));
    }

    #[test]
    fn search_request_uses_bearer_token_and_first_page() {
        let tmdb = client(Credential::BearerToken("t0ken".to_string()));
        let (path, pairs, auth) = query_pairs(tmdb.search_request("the dark knight"));

        assert_eq!(path, "/3/search/movie");
        assert!(has(&pairs, "query", "the dark knight"));
        assert!(has(&pairs, "page", "1"));
        assert!(!pairs.iter().any(|(k, _)| k == "api_key"));
        assert_eq!(auth.as_deref(), Some("Bearer t0ken"));
    }

    #[test]
    fn page_payload_decodes_into_result_page() {
        let body = r#"{
            "page": 1,
            "results": [
                {"id": 268, "title": "Batman", "poster_path": "/b.jpg", "vote_average": 7.2, "release_date": "1989-06-23"},
                {"id": 999, "title": "Unrated", "poster_path": null, "vote_average": 0, "release_date": ""}
            ],
            "total_pages": 4,
            "total_results": 70
        }"#;
        let page: ResultPage = serde_json::from_str::<PagePayload>(body).unwrap().into();

        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.items[0].title, "Batman");
        assert_eq!(page.items[0].release_year(), Some(1989));
        assert_eq!(page.items[1].vote_average, None);
        assert_eq!(page.items[1].release_date, None);
    }

    #[test]
    fn detail_and_videos_payloads_decode() {
        let detail = r#"{
            "id": 603, "title": "The Matrix", "poster_path": "/m.jpg",
            "vote_average": 8.2, "vote_count": 25000, "release_date": "1999-03-31",
            "overview": "A hacker learns the truth.", "runtime": 136,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]
        }"#;
        let detail: MovieDetail = serde_json::from_str::<DetailPayload>(detail).unwrap().into();
        assert_eq!(detail.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(detail.runtime, Some(136));
        assert!(detail.trailer_url.is_none());

        let videos = r#"{"id": 603, "results": [
            {"key": "abc", "site": "YouTube", "type": "Trailer", "official": true, "name": "Official Trailer"}
        ]}"#;
        let videos = serde_json::from_str::<VideosPayload>(videos).unwrap();
        assert_eq!(videos.results[0].kind, "Trailer");
    }
}

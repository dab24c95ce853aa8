//! List and detail fetchers built on top of [`MovieApi`]

use std::sync::Arc;

use super::browse::RequestDescriptor;
use super::content::{MovieDetail, ResultPage, select_trailer, trailer_url};
use super::tmdb_client::{ApiResult, MovieApi};
use super::types::Mode;

/// Turns a request descriptor into one page of results
#[derive(Clone)]
pub struct ListFetcher {
    api: Arc<dyn MovieApi>,
}

impl ListFetcher {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self { api }
    }

    pub async fn fetch(&self, descriptor: &RequestDescriptor) -> ApiResult<ResultPage> {
        match descriptor.mode {
            Mode::Browsing => {
                self.api
                    .discover(descriptor.sort, descriptor.genre, descriptor.page)
                    .await
            }
            Mode::Searching => {
                // Search results are a single page; never report a continuation
                let mut page = self.api.search(&descriptor.query).await?;
                page.page = 1;
                page.total_pages = 1;
                Ok(page)
            }
        }
    }
}

/// Loads the detail overlay: core detail plus the trailer link.
///
/// Both lookups must succeed; there is no partial detail.
#[derive(Clone)]
pub struct DetailFetcher {
    api: Arc<dyn MovieApi>,
}

impl DetailFetcher {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self { api }
    }

    pub async fn fetch(&self, id: u64) -> ApiResult<MovieDetail> {
        let (detail, videos) = futures::join!(self.api.movie_detail(id), self.api.movie_videos(id));

        let mut detail = detail?;
        let videos = videos.inspect_err(|e| {
            tracing::warn!(id, error = %e, "Video lookup failed, dropping detail");
        })?;
        detail.trailer_url = select_trailer(&videos).map(trailer_url);
        Ok(detail)
    }
}

//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! turns it into view-state transitions and runs the resulting fetches.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `navigation`: Search, sort/genre, paging and detail actions

mod input;
mod navigation;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{ApiError, AppModel, DetailFetcher, ListFetcher, MovieApi};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    list_fetcher: ListFetcher,
    detail_fetcher: DetailFetcher,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, api: Arc<dyn MovieApi>) -> Self {
        Self {
            model,
            list_fetcher: ListFetcher::new(api.clone()),
            detail_fetcher: DetailFetcher::new(api),
        }
    }

    /// Surface an error from the event loop in the error popup
    pub async fn report_error(&self, error: &anyhow::Error) {
        tracing::warn!(error = %error, "Key handling failed");
        let message = Self::format_error(error);
        self.model.lock().await.set_error(message).await;
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        match error.downcast_ref::<ApiError>() {
            Some(api_error) => format!("Error: {}", api_error.user_message()),
            None => format!("Error: {}", error),
        }
    }
}

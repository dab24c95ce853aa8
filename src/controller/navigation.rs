//! Navigation-related controller methods (search, filters, paging, detail)
//!
//! Each action applies a transition to the model and, when the transition
//! yields a ticket, spawns the matching fetch. The spawned task hands the
//! result back with its ticket so the model can drop stale responses.

use tokio::task::JoinHandle;

use crate::model::{ActiveSection, DetailOutcome, DetailTicket, FetchTicket};
use super::AppController;

impl AppController {
    /// Load the default feed at start-up
    pub async fn initial_load(&self) -> Option<JoinHandle<()>> {
        let ticket = self.model.lock().await.refresh().await;
        ticket.map(|t| self.spawn_list_fetch(t))
    }

    pub async fn refresh(&self) -> Option<JoinHandle<()>> {
        tracing::debug!("Refreshing current list");
        let ticket = self.model.lock().await.refresh().await;
        ticket.map(|t| self.spawn_list_fetch(t))
    }

    /// Submit whatever is in the search box
    pub async fn submit_search(&self) -> Option<JoinHandle<()>> {
        let model = self.model.lock().await;
        let query = model.get_ui_state().await.search_input;
        let ticket = model.submit_query(&query).await;
        if !query.trim().is_empty() {
            model.set_active_section(ActiveSection::Results).await;
        }
        drop(model);
        ticket.map(|t| self.spawn_list_fetch(t))
    }

    /// Empty the search box and go back to the default feed
    pub async fn clear_search(&self) -> Option<JoinHandle<()>> {
        let model = self.model.lock().await;
        model.clear_search_input().await;
        let ticket = model.submit_query("").await;
        drop(model);
        ticket.map(|t| self.spawn_list_fetch(t))
    }

    pub async fn cycle_sort(&self, forward: bool) -> Option<JoinHandle<()>> {
        let model = self.model.lock().await;
        // Sorting leaves search mode, so the box no longer describes the list
        model.clear_search_input().await;
        let ticket = model.cycle_sort(forward).await;
        drop(model);
        ticket.map(|t| self.spawn_list_fetch(t))
    }

    pub async fn cycle_genre(&self, forward: bool) -> Option<JoinHandle<()>> {
        let model = self.model.lock().await;
        model.clear_search_input().await;
        let ticket = model.cycle_genre(forward).await;
        drop(model);
        ticket.map(|t| self.spawn_list_fetch(t))
    }

    pub async fn load_more(&self) -> Option<JoinHandle<()>> {
        let ticket = self.model.lock().await.load_more().await;
        ticket.map(|t| self.spawn_list_fetch(t))
    }

    /// Open the detail overlay for the highlighted row
    pub async fn open_selected_movie(&self) -> Option<JoinHandle<()>> {
        let model = self.model.lock().await;
        let id = model.selected_movie_id().await?;
        let ticket = model.select_movie(id).await;
        drop(model);
        Some(self.spawn_detail_fetch(ticket))
    }

    pub async fn close_detail(&self) {
        self.model.lock().await.close_detail().await;
    }

    fn spawn_list_fetch(&self, ticket: FetchTicket) -> JoinHandle<()> {
        tracing::debug!(
            generation = ticket.generation,
            mode = ?ticket.descriptor.mode,
            page = ticket.descriptor.page,
            "Issuing list request"
        );
        let controller = self.clone();
        tokio::spawn(async move {
            let result = controller.list_fetcher.fetch(&ticket.descriptor).await;
            let model = controller.model.lock().await;
            model.apply_list_result(&ticket, result).await;
        })
    }

    fn spawn_detail_fetch(&self, ticket: DetailTicket) -> JoinHandle<()> {
        tracing::debug!(id = ticket.id, "Issuing detail request");
        let controller = self.clone();
        tokio::spawn(async move {
            let result = controller.detail_fetcher.fetch(ticket.id).await;
            let model = controller.model.lock().await;
            if let DetailOutcome::Failed(message) = model.apply_detail_result(&ticket, result).await {
                model.set_error(message).await;
            }
        })
    }
}

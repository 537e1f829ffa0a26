//! Query pipeline
//!
//! Owns the shared `QueryState`. Every keyword or page change issues one
//! request as a tokio task; its completion is committed back into the state
//! under the configured `StalePolicy`. Requests are never deduplicated.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

use crate::config::{ArchiveConfig, StalePolicy};
use super::client::SearchSource;
use super::parser::parse_search_response;
use super::types::{Commit, QueryState, RequestTicket};

/// Handle to one in-flight request
#[derive(Debug)]
pub struct SearchTask {
    id: u64,
    handle: JoinHandle<Commit>,
}

impl SearchTask {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the completion to be committed. `None` if the task was aborted.
    pub async fn wait(self) -> Option<Commit> {
        self.handle.await.ok()
    }
}

#[derive(Clone)]
pub struct QueryPipeline {
    source: Arc<dyn SearchSource>,
    state: Arc<RwLock<QueryState>>,
    /// Bumped after every state change the screen should reflect
    changes: Arc<watch::Sender<u64>>,
    policy: StalePolicy,
    total_pages: u32,
}

impl QueryPipeline {
    pub fn new(source: Arc<dyn SearchSource>, config: &ArchiveConfig) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            source,
            state: Arc::new(RwLock::new(QueryState::new(config.default_keyword.clone()))),
            changes: Arc::new(changes),
            policy: config.stale_policy,
            total_pages: config.total_pages,
        }
    }

    pub async fn snapshot(&self) -> QueryState {
        self.state.read().await.clone()
    }

    /// Receiver that changes whenever the state does
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Keyword edit or preset selection: clear results, restart at page 1, fetch.
    pub async fn set_keyword(&self, keyword: impl Into<String>) -> SearchTask {
        let mut state = self.state.write().await;
        state.set_keyword(keyword);
        let ticket = state.begin();
        drop(state);
        self.spawn(ticket)
    }

    /// Fresh search on the current keyword.
    pub async fn search(&self) -> SearchTask {
        let mut state = self.state.write().await;
        state.reset_results();
        let ticket = state.begin();
        drop(state);
        self.spawn(ticket)
    }

    /// Returns `None` when already on the last known page.
    pub async fn next_page(&self) -> Option<SearchTask> {
        self.change_page(QueryState::go_next).await
    }

    /// Returns `None` when already on page 1.
    pub async fn prev_page(&self) -> Option<SearchTask> {
        self.change_page(QueryState::go_prev).await
    }

    pub async fn go_to_page(&self, page: u32) -> Option<SearchTask> {
        self.change_page(|state| state.go_to_page(page)).await
    }

    async fn change_page(&self, step: impl FnOnce(&mut QueryState) -> bool) -> Option<SearchTask> {
        let mut state = self.state.write().await;
        if !step(&mut *state) {
            return None;
        }
        let ticket = state.begin();
        drop(state);
        Some(self.spawn(ticket))
    }

    /// Abort a request. Returns false if it had already completed.
    pub async fn cancel(&self, task: SearchTask) -> bool {
        task.handle.abort();
        match task.handle.await {
            Err(e) if e.is_cancelled() => {
                let released = self.state.write().await.abandon(task.id);
                if released {
                    tracing::info!("Search request {} cancelled", task.id);
                    self.notify();
                }
                released
            }
            _ => false,
        }
    }

    fn spawn(&self, ticket: RequestTicket) -> SearchTask {
        self.notify();
        let id = ticket.id;
        let pipeline = self.clone();
        let handle = tokio::spawn(async move { pipeline.run(ticket).await });
        SearchTask { id, handle }
    }

    /// Fetch → parse → commit one request.
    async fn run(self, ticket: RequestTicket) -> Commit {
        tracing::info!(
            "Search request {}: keyword '{}', page {}",
            ticket.id,
            ticket.query.keyword,
            ticket.query.page
        );

        let outcome = self
            .source
            .fetch(&ticket.query)
            .await
            .map(|body| parse_search_response(&body));

        match &outcome {
            Ok(page) => tracing::debug!(
                "Search request {}: {} docs, {} complete records",
                ticket.id,
                page.docs_seen,
                page.records.len()
            ),
            Err(e) => tracing::error!("Search request {} failed: {}", ticket.id, e),
        }

        let commit = {
            let mut state = self.state.write().await;
            match outcome {
                Ok(page) => state.complete(&ticket, Ok(page), self.policy, self.total_pages),
                Err(ref e) => state.complete(&ticket, Err(e), self.policy, self.total_pages),
            }
        };

        if commit == Commit::Stale {
            tracing::debug!("Search request {} superseded, completion ignored", ticket.id);
        }
        self.notify();
        commit
    }

    fn notify(&self) {
        self.changes.send_modify(|rev| *rev += 1);
    }
}

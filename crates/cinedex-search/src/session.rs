//! Async driver around [`SearchController`].
//!
//! The session owns the directory client and performs the fetches the
//! controller asks for. The controller lock is never held across an
//! `.await`, so operations from several tasks may interleave freely; the
//! controller's generation checks decide which results are committed.
#![allow(clippy::future_not_send)]

use std::sync::{Arc, Mutex, PoisonError};

use cinedex_api::omdb::{DirectoryApi, LookupOutcome, TypeFilter};
use futures::future::join_all;
use tracing::instrument;

use crate::controller::{EnrichRequest, EnrichmentBatch, SearchController, SearchRequest};
use crate::model::{EnrichedRecord, NavigationSnapshot, SearchView};

/// Shared search state plus the directory it fetches from.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchSession<A> {
    /// Directory client.
    api: Arc<A>,
    /// Controller shared with the fetch tasks.
    controller: Arc<Mutex<SearchController>>,
}

impl<A> Clone for SearchSession<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            controller: Arc::clone(&self.controller),
        }
    }
}

/// Clears the loading flag when a fetch ends by any path.
struct LoadingGuard<'a> {
    controller: &'a Mutex<SearchController>,
    generation: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .settle(self.generation);
    }
}

impl<A> SearchSession<A>
where
    A: DirectoryApi + Send + Sync,
{
    /// Creates an empty session.
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            controller: Arc::new(Mutex::new(SearchController::new())),
        }
    }

    /// Creates a session holding a previously captured snapshot.
    #[must_use]
    pub fn from_snapshot(api: Arc<A>, snapshot: NavigationSnapshot) -> Self {
        Self {
            api,
            controller: Arc::new(Mutex::new(SearchController::from_snapshot(snapshot))),
        }
    }

    /// Returns the directory client.
    #[must_use]
    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Submits query text and fetches page 1.
    #[instrument(skip_all)]
    pub async fn submit_query(&self, text: &str) {
        let request = self.with(|c| c.submit_query(text));
        self.run(request).await;
    }

    /// Submits query text and goes straight to `page`.
    ///
    /// Page 1 is fetched first to learn the page count, but its plots are
    /// looked up only when it is also the page that ends up displayed.
    #[instrument(skip_all)]
    pub async fn open_page(&self, text: &str, page: u32) {
        let Some(request) = self.with(|c| c.submit_query(text)) else {
            return;
        };
        let _guard = LoadingGuard {
            controller: &self.controller,
            generation: request.generation,
        };

        let result = self.api.search(&request.params).await;
        let Some(enrich) = self.with(|c| c.apply_search(&request, result)) else {
            return;
        };
        match self.with(|c| c.change_page(page)) {
            Some(next) => self.run(Some(next)).await,
            None => self.hydrate(enrich).await,
        }
    }

    /// Moves to `page` and fetches it.
    #[instrument(skip_all)]
    pub async fn change_page(&self, page: u32) {
        let request = self.with(|c| c.change_page(page));
        self.run(request).await;
    }

    /// Moves one page forward.
    pub async fn next_page(&self) {
        let request = self.with(SearchController::next_page);
        self.run(request).await;
    }

    /// Moves one page back.
    pub async fn previous_page(&self) {
        let request = self.with(SearchController::previous_page);
        self.run(request).await;
    }

    /// Changes the media type filter and refetches page 1.
    #[instrument(skip_all)]
    pub async fn change_filter(&self, type_filter: TypeFilter) {
        let request = self.with(|c| c.change_filter(type_filter));
        self.run(request).await;
    }

    /// Resets to the initial empty state.
    pub fn clear(&self) {
        self.with(SearchController::clear);
    }

    /// Reinstates a snapshot without fetching.
    pub fn restore(&self, snapshot: NavigationSnapshot) {
        self.with(|c| c.restore(snapshot));
    }

    /// Captures the current state.
    #[must_use]
    pub fn snapshot(&self) -> NavigationSnapshot {
        self.with(|c| c.snapshot())
    }

    /// Captures the current state if no fetch or batch is outstanding.
    #[must_use]
    pub fn settled_snapshot(&self) -> Option<NavigationSnapshot> {
        self.with(|c| c.settled_snapshot())
    }

    /// Returns a read-only copy of the current state.
    #[must_use]
    pub fn view(&self) -> SearchView {
        self.with(|c| c.view())
    }

    /// Performs a primary fetch and, if committed, its enrichment batch.
    async fn run(&self, request: Option<SearchRequest>) {
        let Some(request) = request else {
            return;
        };
        let _guard = LoadingGuard {
            controller: &self.controller,
            generation: request.generation,
        };

        let result = self.api.search(&request.params).await;
        let Some(enrich) = self.with(|c| c.apply_search(&request, result)) else {
            return;
        };
        self.hydrate(enrich).await;
    }

    /// Runs an enrichment batch and commits it if still current.
    async fn hydrate(&self, enrich: EnrichRequest) {
        let batch = enrich_records(self.api.as_ref(), enrich).await;
        self.with(|c| c.apply_enrichment(batch));
    }

    fn with<R>(&self, f: impl FnOnce(&mut SearchController) -> R) -> R {
        let mut controller = self
            .controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut controller)
    }
}

/// Looks up every record of `request` concurrently and attaches its plot.
///
/// A failed or negative lookup leaves that record's plot empty without
/// affecting the others. Output order matches request order.
#[instrument(skip_all, fields(count = request.records.len()))]
pub async fn enrich_records<A>(api: &A, request: EnrichRequest) -> EnrichmentBatch
where
    A: DirectoryApi + Sync,
{
    let outcomes = join_all(request.records.iter().map(|r| api.lookup(&r.id))).await;

    let records = request
        .records
        .into_iter()
        .zip(outcomes)
        .map(|(summary, outcome)| {
            let plot = match outcome {
                Ok(LookupOutcome::Found(details)) => details.plot,
                Ok(LookupOutcome::NotFound { message }) => {
                    tracing::debug!(id = %summary.id, reason = %message, "enrichment lookup negative");
                    String::new()
                }
                Err(e) => {
                    tracing::debug!(id = %summary.id, "enrichment lookup failed: {e:#}");
                    String::new()
                }
            };
            EnrichedRecord { summary, plot }
        })
        .collect();

    EnrichmentBatch {
        generation: request.generation,
        records,
    }
}

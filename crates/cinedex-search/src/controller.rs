//! Search state machine.
//!
//! Operations mutate the query and hand back a [`SearchRequest`] when the
//! directory has to be asked. The caller performs the fetch and feeds the
//! result to [`SearchController::apply_search`]. Each request carries the
//! search generation at the time it was issued; any later operation bumps
//! the generation, so an older response arriving late is dropped instead
//! of overwriting newer state. Enrichment batches use a second generation
//! that moves whenever the result collection is replaced.

use anyhow::Result;
use cinedex_api::omdb::{SearchOutcome, SearchParams, SummaryRecord, TypeFilter};

use crate::model::{EnrichedRecord, NavigationSnapshot, PageMeta, SearchQuery, SearchView};
use crate::pagination::{clamp_page, total_pages};

/// Message shown when a search fails in transport or parsing.
pub const SEARCH_FAILED_MESSAGE: &str = "An error occurred while searching for movies.";

/// Message shown when a positive response carries zero matches.
pub const NO_RESULTS_MESSAGE: &str = "Movie not found!";

/// A primary fetch the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search generation at issue time.
    pub generation: u64,
    /// Directory parameters.
    pub params: SearchParams,
}

/// An enrichment batch the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichRequest {
    /// Enrichment generation at issue time.
    pub generation: u64,
    /// Summaries of the committed page, in display order.
    pub records: Vec<SummaryRecord>,
}

/// Resolved enrichment batch, one record per requested summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentBatch {
    /// Generation copied from the originating [`EnrichRequest`].
    pub generation: u64,
    /// Enriched records in request order.
    pub records: Vec<EnrichedRecord>,
}

/// Search/pagination/hydration controller.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchController {
    /// Search inputs.
    query: SearchQuery,
    /// Pagination of the committed page.
    meta: PageMeta,
    /// Committed summaries.
    summaries: Vec<SummaryRecord>,
    /// Displayed records, one per summary.
    enriched: Vec<EnrichedRecord>,
    /// A primary fetch is in flight.
    loading: bool,
    /// The committed page still waits for its enrichment batch.
    hydrating: bool,
    /// Message to show instead of results.
    error: Option<String>,
    /// Bumped on every input change; guards primary fetches.
    search_generation: u64,
    /// Bumped on every result replacement; guards enrichment batches.
    enrich_generation: u64,
}

impl SearchController {
    /// Creates an empty controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a controller already holding a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: NavigationSnapshot) -> Self {
        let mut controller = Self::default();
        controller.restore(snapshot);
        controller
    }

    /// Returns the search inputs.
    #[must_use]
    pub const fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Returns the pagination of the committed page.
    #[must_use]
    pub const fn meta(&self) -> PageMeta {
        self.meta
    }

    /// Returns the displayed records.
    #[must_use]
    pub fn results(&self) -> &[EnrichedRecord] {
        &self.enriched
    }

    /// Returns the committed summaries.
    #[must_use]
    pub fn summaries(&self) -> &[SummaryRecord] {
        &self.summaries
    }

    /// Whether a primary fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the committed page still waits for its enrichment batch.
    #[must_use]
    pub const fn is_hydrating(&self) -> bool {
        self.hydrating
    }

    /// Returns the current error message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns a read-only copy of the state.
    #[must_use]
    pub fn view(&self) -> SearchView {
        SearchView {
            query: self.query.clone(),
            meta: self.meta,
            results: self.enriched.clone(),
            loading: self.loading,
            hydrating: self.hydrating,
            error: self.error.clone(),
        }
    }

    /// Captures the state for a later [`Self::restore`].
    #[must_use]
    pub fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            query: self.query.clone(),
            results: self.enriched.clone(),
            current_page: self.meta.current_page,
            total_pages: self.meta.total_pages,
        }
    }

    /// Captures the state only when no fetch or batch is outstanding.
    ///
    /// A snapshot taken mid-fetch would mix the new inputs with the old
    /// results, and restoring it discards the work that would complete it.
    #[must_use]
    pub fn settled_snapshot(&self) -> Option<NavigationSnapshot> {
        (!self.loading && !self.hydrating).then(|| self.snapshot())
    }

    /// Submits new query text.
    ///
    /// Blank text (after trimming) is ignored. Otherwise the page resets to 1.
    pub fn submit_query(&mut self, text: &str) -> Option<SearchRequest> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.query.text = String::from(text);
        self.query.page = 1;
        Some(self.issue())
    }

    /// Moves to page `page`, clamped into `[1, total_pages]`.
    ///
    /// Does nothing without query text or when the clamped page is current.
    pub fn change_page(&mut self, page: u32) -> Option<SearchRequest> {
        if self.query.text.is_empty() {
            return None;
        }
        let page = clamp_page(page, self.meta.total_pages);
        if page == self.query.page {
            return None;
        }
        self.query.page = page;
        Some(self.issue())
    }

    /// Moves one page forward, if there is one.
    pub fn next_page(&mut self) -> Option<SearchRequest> {
        self.change_page(self.query.page.saturating_add(1))
    }

    /// Moves one page back, if there is one.
    pub fn previous_page(&mut self) -> Option<SearchRequest> {
        self.change_page(self.query.page.saturating_sub(1))
    }

    /// Changes the media type filter and resets the page to 1.
    ///
    /// Fetches only when query text exists and the inputs actually changed.
    pub fn change_filter(&mut self, type_filter: TypeFilter) -> Option<SearchRequest> {
        let changed = self.query.type_filter != type_filter || self.query.page != 1;
        self.query.type_filter = type_filter;
        self.query.page = 1;
        if self.query.text.is_empty() || !changed {
            return None;
        }
        Some(self.issue())
    }

    /// Resets everything to the initial empty state.
    ///
    /// Outstanding requests and batches become stale.
    pub fn clear(&mut self) {
        self.query = SearchQuery::default();
        self.meta = PageMeta::default();
        self.summaries.clear();
        self.enriched.clear();
        self.loading = false;
        self.hydrating = false;
        self.error = None;
        self.bump_search();
        self.bump_enrich();
    }

    /// Reinstates a snapshot without fetching.
    ///
    /// Outstanding requests and batches become stale.
    pub fn restore(&mut self, snapshot: NavigationSnapshot) {
        self.summaries = snapshot
            .results
            .iter()
            .map(|r| r.summary.clone())
            .collect();
        self.enriched = snapshot.results;
        self.query = snapshot.query;
        self.meta = PageMeta {
            current_page: snapshot.current_page,
            total_pages: snapshot.total_pages,
        };
        self.loading = false;
        self.hydrating = false;
        self.error = None;
        self.bump_search();
        self.bump_enrich();
    }

    /// Commits the result of a primary fetch.
    ///
    /// Returns the enrichment batch to run when a new page was committed.
    /// Stale responses are dropped and return `None`.
    pub fn apply_search(
        &mut self,
        request: &SearchRequest,
        result: Result<SearchOutcome>,
    ) -> Option<EnrichRequest> {
        if request.generation != self.search_generation {
            tracing::debug!(
                generation = request.generation,
                current = self.search_generation,
                "dropping stale search response"
            );
            return None;
        }
        self.loading = false;

        match result {
            Ok(SearchOutcome::Found {
                items,
                total_results,
            }) if total_results > 0 => {
                tracing::debug!(
                    query = %request.params.query,
                    page = request.params.page,
                    total_results,
                    "search page committed"
                );
                self.meta = PageMeta {
                    current_page: request.params.page,
                    total_pages: total_pages(total_results),
                };
                self.error = None;
                self.enriched = items.iter().cloned().map(EnrichedRecord::pending).collect();
                self.summaries = items;
                self.hydrating = true;
                self.bump_enrich();
                Some(EnrichRequest {
                    generation: self.enrich_generation,
                    records: self.summaries.clone(),
                })
            }
            Ok(SearchOutcome::Found { .. }) => {
                self.fail(String::from(NO_RESULTS_MESSAGE));
                None
            }
            Ok(SearchOutcome::NotFound { message }) => {
                self.fail(message);
                None
            }
            Err(e) => {
                tracing::warn!("search request failed: {e:#}");
                self.fail(String::from(SEARCH_FAILED_MESSAGE));
                None
            }
        }
    }

    /// Commits an enrichment batch.
    ///
    /// Returns `false` when the batch is stale and was dropped.
    pub fn apply_enrichment(&mut self, batch: EnrichmentBatch) -> bool {
        if batch.generation != self.enrich_generation {
            tracing::debug!(
                generation = batch.generation,
                current = self.enrich_generation,
                "dropping stale enrichment batch"
            );
            return false;
        }
        self.enriched = batch.records;
        self.hydrating = false;
        true
    }

    /// Ends the fetch cycle of `generation` if it is still current.
    ///
    /// Clears the loading and hydrating flags, so a cycle abandoned before
    /// its batch was applied does not stay busy. Idempotent.
    pub fn settle(&mut self, generation: u64) {
        if generation == self.search_generation {
            self.loading = false;
            self.hydrating = false;
        }
    }

    /// Starts a primary fetch for the current inputs.
    fn issue(&mut self) -> SearchRequest {
        self.bump_search();
        self.loading = true;
        self.error = None;
        SearchRequest {
            generation: self.search_generation,
            params: SearchParams::new(self.query.text.clone())
                .page(self.query.page)
                .type_filter(self.query.type_filter),
        }
    }

    /// Empties results and records an error.
    fn fail(&mut self, message: String) {
        self.summaries.clear();
        self.enriched.clear();
        self.meta.total_pages = 0;
        self.hydrating = false;
        self.error = Some(message);
        self.bump_enrich();
    }

    const fn bump_search(&mut self) {
        self.search_generation = self.search_generation.wrapping_add(1);
    }

    const fn bump_enrich(&mut self) {
        self.enrich_generation = self.enrich_generation.wrapping_add(1);
    }
}

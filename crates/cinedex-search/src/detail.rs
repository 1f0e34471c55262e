//! Detail view state.

use cinedex_api::omdb::{DirectoryApi, LookupOutcome, MovieDetails};
use cinedex_api::probe::ImageProbe;
use tracing::instrument;

use crate::model::NavigationContext;
use crate::poster::resolve_poster;

/// Message shown when a detail lookup fails in transport or parsing.
pub const DETAILS_FAILED_MESSAGE: &str = "An error occurred while fetching movie details.";

/// Load state of a detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    /// Lookup in flight.
    Loading,
    /// Lookup ended without a record.
    Failed(String),
    /// Record and the poster URL to display.
    Loaded {
        /// The looked-up record.
        details: Box<MovieDetails>,
        /// Reachable poster URL or the placeholder.
        poster: String,
    },
}

impl DetailState {
    /// Whether the state is final.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// Detail view for a single identifier.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct DetailController {
    /// Identifier being shown.
    id: String,
    /// Where "back" leads.
    context: NavigationContext,
    /// Current load state.
    state: DetailState,
}

impl DetailController {
    /// Opens a detail view in the `Loading` state.
    #[must_use]
    pub fn mount(id: impl Into<String>, context: NavigationContext) -> Self {
        Self {
            id: id.into(),
            context,
            state: DetailState::Loading,
        }
    }

    /// Returns the identifier being shown.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the current load state.
    #[must_use]
    pub const fn state(&self) -> &DetailState {
        &self.state
    }

    /// Returns the navigation context handed in at mount.
    #[must_use]
    pub const fn context(&self) -> &NavigationContext {
        &self.context
    }

    /// Commits a load result for `id`.
    ///
    /// Results for another identifier, a second terminal result, and
    /// `Loading` itself are ignored. Returns whether the state changed.
    pub fn apply(&mut self, id: &str, state: DetailState) -> bool {
        if id != self.id || self.state.is_terminal() || !state.is_terminal() {
            tracing::debug!(id, current = %self.id, "ignoring detail result");
            return false;
        }
        self.state = state;
        true
    }

    /// Leaves the view, returning the caller's context.
    #[must_use]
    pub fn go_back(self) -> NavigationContext {
        self.context
    }
}

/// Looks up `id` and resolves its poster.
#[instrument(skip(api, probe))]
pub async fn load_details<A, P>(api: &A, probe: &P, id: &str) -> DetailState
where
    A: DirectoryApi + Sync,
    P: ImageProbe + Sync,
{
    match api.lookup(id).await {
        Ok(LookupOutcome::Found(details)) => {
            let poster = resolve_poster(probe, &details.poster_url).await;
            DetailState::Loaded { details, poster }
        }
        Ok(LookupOutcome::NotFound { message }) => DetailState::Failed(message),
        Err(e) => {
            tracing::warn!("detail lookup failed: {e:#}");
            DetailState::Failed(String::from(DETAILS_FAILED_MESSAGE))
        }
    }
}

/// Public IMDb page for an identifier.
#[must_use]
pub fn imdb_url(id: &str) -> String {
    format!("https://www.imdb.com/title/{id}/")
}

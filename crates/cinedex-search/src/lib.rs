//! Search/pagination/hydration controller for cinedex.
//!
//! [`SearchController`] is a synchronous state machine: every operation
//! that needs the directory returns a request ticket stamped with a
//! generation token, and results are committed through `apply_*` only
//! while that token is still current. [`SearchSession`] drives the
//! controller against a [`cinedex_api::omdb::DirectoryApi`].

mod controller;
mod detail;
mod model;
mod pagination;
mod poster;
mod session;

pub use controller::{
    EnrichRequest, EnrichmentBatch, NO_RESULTS_MESSAGE, SEARCH_FAILED_MESSAGE, SearchController,
    SearchRequest,
};
pub use detail::{DETAILS_FAILED_MESSAGE, DetailController, DetailState, imdb_url, load_details};
pub use model::{
    EnrichedRecord, NavigationContext, NavigationSnapshot, PageMeta, SEARCH_PATH, SearchQuery,
    SearchView,
};
pub use pagination::{RESULTS_PER_PAGE, clamp_page, total_pages};
pub use poster::{PLACEHOLDER_POSTER, poster_candidate, resolve_poster};
pub use session::{SearchSession, enrich_records};

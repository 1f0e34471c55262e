//! OMDb movie directory client module.
//!
//! Handles keyword searches and identifier lookups against OMDb, either
//! directly (API key held by the client) or through the cinedex proxy.

mod api;
mod client;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{DirectoryApi, LocalDirectoryApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{OmdbClient, OmdbClientBuilder};
pub use params::{DirectoryQuery, SearchParams};
pub use types::{
    LookupOutcome, MovieDetails, POSTER_NOT_AVAILABLE, ParseTypeFilterError, Rating,
    SearchOutcome, SummaryRecord, TypeFilter,
};

//! `DirectoryApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::params::SearchParams;
use super::types::{LookupOutcome, SearchOutcome};

/// Movie directory trait.
///
/// Abstracts the two directory operations for mock substitution in tests.
/// `Err` means a transport or parse failure; a directory-level "no match"
/// is reported through the `NotFound` variants instead.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(DirectoryApi: Send)]
pub trait LocalDirectoryApi {
    /// Searches the directory by keyword (one page of summaries).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search(&self, params: &SearchParams) -> Result<SearchOutcome>;

    /// Looks up a single record by its stable identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn lookup(&self, id: &str) -> Result<LookupOutcome>;
}

//! Inbound query parameters.

use cinedex_api::omdb::DirectoryQuery;
use serde::Deserialize;

/// Query string accepted by the movies endpoint.
///
/// Nothing is validated; missing values are defaulted downstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyQuery {
    /// Search text.
    pub query: Option<String>,
    /// Page number as sent by the caller.
    pub page: Option<String>,
    /// Media type filter.
    pub r#type: Option<String>,
    /// IMDb identifier; selects the lookup branch when present.
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
}

impl ProxyQuery {
    /// Picks the upstream branch.
    ///
    /// A non-empty `imdbID` wins over `query`.
    #[must_use]
    pub fn into_directory_query(self) -> DirectoryQuery {
        match self.imdb_id.filter(|id| !id.is_empty()) {
            Some(imdb_id) => DirectoryQuery::Lookup { imdb_id },
            None => DirectoryQuery::Search {
                query: self.query,
                page: self.page.filter(|p| !p.is_empty()),
                r#type: self.r#type,
            },
        }
    }
}

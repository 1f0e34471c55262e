//! Request parameters for the movie directory.

use super::types::TypeFilter;

/// Parameters for a keyword search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search text (required).
    pub query: String,
    /// Result page (1-based, default: 1).
    pub page: u32,
    /// Media type filter (default: all).
    pub type_filter: TypeFilter,
}

impl SearchParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            type_filter: TypeFilter::All,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the media type filter.
    #[must_use]
    pub const fn type_filter(mut self, type_filter: TypeFilter) -> Self {
        self.type_filter = type_filter;
        self
    }
}

/// Unvalidated query forwarded verbatim by the proxy.
///
/// Values are passed through as received; missing search parameters
/// are left for the upstream to judge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryQuery {
    /// Keyword search (`s`, `page`, `type`).
    Search {
        /// Search text.
        query: Option<String>,
        /// Page (default: "1").
        page: Option<String>,
        /// Type filter (default: empty).
        r#type: Option<String>,
    },
    /// Identifier lookup (`i`).
    Lookup {
        /// IMDb identifier.
        imdb_id: String,
    },
}

impl DirectoryQuery {
    /// Builds upstream query pairs in OMDb's own parameter names.
    pub(crate) fn upstream_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Search {
                query,
                page,
                r#type,
            } => vec![
                ("s", query.clone().unwrap_or_default()),
                ("page", page.clone().unwrap_or_else(|| String::from("1"))),
                ("type", r#type.clone().unwrap_or_default()),
            ],
            Self::Lookup { imdb_id } => vec![("i", imdb_id.clone())],
        }
    }
}

impl From<&SearchParams> for DirectoryQuery {
    fn from(params: &SearchParams) -> Self {
        Self::Search {
            query: Some(params.query.clone()),
            page: Some(params.page.to_string()),
            r#type: Some(String::from(params.type_filter.as_param())),
        }
    }
}

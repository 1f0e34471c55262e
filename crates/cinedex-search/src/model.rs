//! Search state values shared between the controllers and presentation.

use cinedex_api::omdb::{SummaryRecord, TypeFilter};
use serde::{Deserialize, Serialize};

/// Route of the search view, used as the default `go_back` target.
pub const SEARCH_PATH: &str = "/";

/// User-controlled search inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Trimmed query text (empty when nothing was submitted).
    pub text: String,
    /// Requested page (1-based).
    pub page: u32,
    /// Media type filter.
    pub type_filter: TypeFilter,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            page: 1,
            type_filter: TypeFilter::All,
        }
    }
}

/// A summary augmented with its plot.
///
/// `plot` is empty while enrichment is pending or after it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// The search summary.
    pub summary: SummaryRecord,
    /// Plot text from the detail lookup.
    pub plot: String,
}

impl EnrichedRecord {
    /// Wraps a summary with an empty plot.
    #[must_use]
    pub const fn pending(summary: SummaryRecord) -> Self {
        Self {
            summary,
            plot: String::new(),
        }
    }
}

/// Pagination of the committed result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page the committed results belong to.
    pub current_page: u32,
    /// Derived page count (0 when there is nothing to page through).
    pub total_pages: u32,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
        }
    }
}

impl PageMeta {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.total_pages > 0 && self.current_page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Search state captured when leaving for a detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    /// Search inputs.
    pub query: SearchQuery,
    /// Displayed results.
    pub results: Vec<EnrichedRecord>,
    /// Page of the displayed results.
    pub current_page: u32,
    /// Page count of the displayed results.
    pub total_pages: u32,
}

/// State handed to a detail view so its back action can restore the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationContext {
    /// Route to return to.
    pub go_back: String,
    /// Search state to reattach on return.
    pub search_state: NavigationSnapshot,
}

impl NavigationContext {
    /// Creates a context returning to the search view.
    #[must_use]
    pub fn back_to_search(search_state: NavigationSnapshot) -> Self {
        Self {
            go_back: String::from(SEARCH_PATH),
            search_state,
        }
    }
}

/// Read-only copy of the controller state for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    /// Search inputs.
    pub query: SearchQuery,
    /// Pagination of the displayed results.
    pub meta: PageMeta,
    /// Displayed results.
    pub results: Vec<EnrichedRecord>,
    /// A primary fetch is in flight.
    pub loading: bool,
    /// Plots of the displayed page are still being fetched.
    pub hydrating: bool,
    /// Message to show instead of results.
    pub error: Option<String>,
}

impl SearchView {
    /// Whether pagination controls should be shown.
    #[must_use]
    pub const fn shows_pagination(&self) -> bool {
        self.error.is_none() && self.meta.total_pages > 0
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_page_meta_neighbours() {
        // Arrange
        let first = PageMeta {
            current_page: 1,
            total_pages: 3,
        };
        let last = PageMeta {
            current_page: 3,
            total_pages: 3,
        };

        // Act & Assert
        assert!(!first.has_previous());
        assert!(first.has_next());
        assert!(last.has_previous());
        assert!(!last.has_next());
        assert!(!PageMeta::default().has_next());
        assert!(!PageMeta::default().has_previous());
    }

    #[test]
    fn test_navigation_context_json_shape() {
        // Arrange
        let context = NavigationContext::back_to_search(NavigationSnapshot {
            query: SearchQuery {
                text: String::from("batman"),
                page: 2,
                type_filter: TypeFilter::Movie,
            },
            results: Vec::new(),
            current_page: 2,
            total_pages: 3,
        });

        // Act
        let json = serde_json::to_value(&context).unwrap();

        // Assert
        assert_eq!(json["go_back"], "/");
        assert_eq!(json["search_state"]["query"]["text"], "batman");
        assert_eq!(json["search_state"]["query"]["type_filter"], "movie");
        assert_eq!(json["search_state"]["total_pages"], 3);
    }
}

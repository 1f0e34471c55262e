//! OMDb response types and the domain records built from them.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Poster sentinel the upstream uses when no image exists.
pub const POSTER_NOT_AVAILABLE: &str = "N/A";

/// Fallback message when a negative response carries no `Error` field.
const UNKNOWN_ERROR: &str = "Unknown error";

// --- Type filter ---

/// Media type filter applied to keyword searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    /// No filter.
    #[default]
    All,
    /// Movies only.
    Movie,
    /// Series only.
    Series,
    /// Episodes only.
    Episode,
}

impl TypeFilter {
    /// All filters in display order.
    pub const ALL: [Self; 4] = [Self::All, Self::Movie, Self::Series, Self::Episode];

    /// Value sent as the upstream `type` parameter (empty for `All`).
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
        }
    }

    /// Returns the next filter, wrapping around after `Episode`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Movie,
            Self::Movie => Self::Series,
            Self::Series => Self::Episode,
            Self::Episode => Self::All,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            other => f.write_str(other.as_param()),
        }
    }
}

/// Error returned when a string is not a known type filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTypeFilterError(String);

impl fmt::Display for ParseTypeFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown type filter '{}' (expected all, movie, series or episode)",
            self.0
        )
    }
}

impl std::error::Error for ParseTypeFilterError {}

impl FromStr for TypeFilter {
    type Err = ParseTypeFilterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            "episode" => Ok(Self::Episode),
            _ => Err(ParseTypeFilterError(String::from(s))),
        }
    }
}

// --- Domain records ---

/// Compact record returned by a keyword search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Stable external identifier (IMDb ID).
    pub id: String,
    /// Title.
    pub title: String,
    /// Release year or year range.
    pub year: String,
    /// Poster URL or `"N/A"`.
    pub poster_url: String,
    /// Media type (`movie`, `series`, `episode`, ...).
    pub media_type: String,
}

/// A single rating entry of a detail record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Rating source (e.g. "Internet Movie Database").
    pub source: String,
    /// Rating value as displayed by the source.
    pub value: String,
}

/// Full record returned by an identifier lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    /// Stable external identifier (IMDb ID).
    pub id: String,
    /// Title.
    pub title: String,
    /// Release year.
    pub year: String,
    /// Comma-separated genres.
    pub genre: String,
    /// Plot summary.
    pub plot: String,
    /// Comma-separated lead actors.
    pub actors: String,
    /// Poster URL or `"N/A"`.
    pub poster_url: String,
    /// Ratings by source.
    pub ratings: Vec<Rating>,
    /// Media type.
    pub media_type: String,
    /// Director(s).
    pub director: Option<String>,
    /// Runtime (e.g. "117 min").
    pub runtime: Option<String>,
    /// Content rating (e.g. "PG-13").
    pub rated: Option<String>,
    /// Release date.
    pub released: Option<String>,
}

/// Result of a keyword search that reached the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The directory returned matches.
    Found {
        /// Summaries of the requested page.
        items: Vec<SummaryRecord>,
        /// Total number of matches across all pages.
        total_results: u32,
    },
    /// The directory reported no match (e.g. "Movie not found!").
    NotFound {
        /// Message supplied by the directory.
        message: String,
    },
}

/// Result of an identifier lookup that reached the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The record exists.
    Found(Box<MovieDetails>),
    /// The directory rejected the identifier.
    NotFound {
        /// Message supplied by the directory.
        message: String,
    },
}

// --- Wire format ---

/// Raw search envelope (`?s=` mode).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct OmdbSearchEnvelope {
    /// `"True"` or `"False"`.
    pub response: Option<String>,
    /// Matches on this page.
    #[serde(default)]
    pub search: Vec<OmdbSearchItem>,
    /// Total matches as a decimal string.
    #[serde(rename = "totalResults")]
    pub total_results: Option<String>,
    /// Error message on negative responses.
    pub error: Option<String>,
}

/// Raw search item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct OmdbSearchItem {
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(default)]
    pub r#type: String,
    #[serde(default)]
    pub poster: Option<String>,
}

/// Raw lookup record (`?i=` mode).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct OmdbDetails {
    pub response: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
    pub genre: Option<String>,
    pub plot: Option<String>,
    pub actors: Option<String>,
    pub poster: Option<String>,
    #[serde(default)]
    pub ratings: Vec<OmdbRating>,
    pub r#type: Option<String>,
    pub director: Option<String>,
    pub runtime: Option<String>,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub error: Option<String>,
}

/// Raw rating entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct OmdbRating {
    pub source: String,
    pub value: String,
}

/// Returns `true` for the upstream's positive `Response` flag.
fn is_positive(response: Option<&str>) -> Result<bool> {
    match response {
        Some(flag) => Ok(flag.eq_ignore_ascii_case("true")),
        None => bail!("OMDb response is missing the Response field"),
    }
}

impl OmdbSearchEnvelope {
    /// Converts the envelope into a domain outcome.
    ///
    /// A missing `totalResults` falls back to the number of items on the page.
    pub(crate) fn into_outcome(self) -> Result<SearchOutcome> {
        if !is_positive(self.response.as_deref())? {
            return Ok(SearchOutcome::NotFound {
                message: self.error.unwrap_or_else(|| String::from(UNKNOWN_ERROR)),
            });
        }

        let total_results = match self.total_results.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid totalResults value: {raw}"))?,
            None => u32::try_from(self.search.len()).context("too many search items")?,
        };

        let items = self
            .search
            .into_iter()
            .map(|item| SummaryRecord {
                id: item.imdb_id,
                title: item.title,
                year: item.year,
                poster_url: item
                    .poster
                    .unwrap_or_else(|| String::from(POSTER_NOT_AVAILABLE)),
                media_type: item.r#type,
            })
            .collect();

        Ok(SearchOutcome::Found {
            items,
            total_results,
        })
    }
}

impl OmdbDetails {
    /// Converts the raw record into a domain outcome.
    pub(crate) fn into_outcome(self) -> Result<LookupOutcome> {
        if !is_positive(self.response.as_deref())? {
            return Ok(LookupOutcome::NotFound {
                message: self.error.unwrap_or_else(|| String::from(UNKNOWN_ERROR)),
            });
        }

        Ok(LookupOutcome::Found(Box::new(MovieDetails {
            id: self.imdb_id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
            plot: self.plot.unwrap_or_default(),
            actors: self.actors.unwrap_or_default(),
            poster_url: self
                .poster
                .unwrap_or_else(|| String::from(POSTER_NOT_AVAILABLE)),
            ratings: self
                .ratings
                .into_iter()
                .map(|r| Rating {
                    source: r.source,
                    value: r.value,
                })
                .collect(),
            media_type: self.r#type.unwrap_or_default(),
            director: self.director,
            runtime: self.runtime,
            rated: self.rated,
            released: self.released,
        })))
    }
}

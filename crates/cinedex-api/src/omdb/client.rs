//! `OmdbClient` - OMDb movie directory client implementation.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::DirectoryApi;
use super::params::{DirectoryQuery, SearchParams};
use super::types::{LookupOutcome, OmdbDetails, OmdbSearchEnvelope, SearchOutcome};

/// Default base URL for the OMDb API.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Query parameter carrying the API key.
const API_KEY_PARAM: &str = "apikey";

/// OMDb movie directory client.
///
/// With an API key the client talks to OMDb directly using its own
/// parameter names. Without one it talks to the cinedex proxy, which
/// holds the key server-side and expects `query`/`page`/`type`/`imdbID`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key (direct mode only).
    api_key: Option<String>,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (proxy endpoint, or wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the OMDb API key, switching the client to direct mode.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `api_key` is set but blank.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        if self.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            bail!("api_key must not be blank");
        }

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key: self.api_key,
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Returns `true` when the client talks to OMDb directly.
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetches an upstream JSON body without interpreting it.
    ///
    /// Always speaks OMDb's parameter names and is what the proxy relays.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the body is not JSON.
    #[instrument(skip_all)]
    pub async fn fetch_raw(&self, query: &DirectoryQuery) -> Result<serde_json::Value> {
        let mut pairs = query.upstream_pairs();
        if let Some(ref key) = self.api_key {
            pairs.insert(0, (API_KEY_PARAM, key.clone()));
        }
        self.get_json(&pairs).await
    }

    /// Builds search query pairs for the active mode.
    fn search_pairs(&self, params: &SearchParams) -> Vec<(&'static str, String)> {
        let page = params.page.to_string();
        let kind = String::from(params.type_filter.as_param());
        match self.api_key {
            Some(ref key) => vec![
                (API_KEY_PARAM, key.clone()),
                ("s", params.query.clone()),
                ("page", page),
                ("type", kind),
            ],
            None => vec![
                ("query", params.query.clone()),
                ("page", page),
                ("type", kind),
            ],
        }
    }

    /// Builds lookup query pairs for the active mode.
    fn lookup_pairs(&self, id: &str) -> Vec<(&'static str, String)> {
        match self.api_key {
            Some(ref key) => vec![(API_KEY_PARAM, key.clone()), ("i", String::from(id))],
            None => vec![("imdbID", String::from(id))],
        }
    }

    /// Sends a GET request with the given query and decodes the JSON body.
    ///
    /// The body is decoded regardless of status: OMDb reports domain errors
    /// (e.g. an invalid key) as JSON with a non-2xx status.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self
            .http_client
            .get(self.base_url.clone())
            .query(query)
            .build()
            .context("failed to build request")?;

        tracing::debug!(url = %redact_api_key(request.url()), "OMDb API request");

        let result = self.http_client.execute(request).await;
        let response = result.context("request failed")?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "OMDb API returned a non-success status");
        }

        let body = response
            .text()
            .await
            .context("failed to read response body")?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed = raw_result
            .with_context(|| format!("failed to decode JSON response (HTTP {status})"))?;
        Ok(parsed)
    }
}

/// Renders a URL with the API key value masked, for logging.
fn redact_api_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == API_KEY_PARAM {
                String::from("***")
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

impl DirectoryApi for OmdbClient {
    #[instrument(skip_all)]
    async fn search(&self, params: &SearchParams) -> Result<SearchOutcome> {
        let query = self.search_pairs(params);
        let envelope: OmdbSearchEnvelope = self.get_json(&query).await?;
        envelope.into_outcome()
    }

    #[instrument(skip_all)]
    async fn lookup(&self, id: &str) -> Result<LookupOutcome> {
        let query = self.lookup_pairs(id);
        let details: OmdbDetails = self.get_json(&query).await?;
        details.into_outcome()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::omdb::types::TypeFilter;

    fn direct_client(server: &MockServer) -> OmdbClient {
        OmdbClient::builder()
            .base_url(format!("{}/", server.uri()).parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    fn proxy_client(server: &MockServer) -> OmdbClient {
        OmdbClient::builder()
            .base_url(format!("{}/api/movies", server.uri()).parse().unwrap())
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = OmdbClient::builder().api_key("test-key").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_rejects_blank_api_key() {
        // Arrange & Act
        let result = OmdbClient::builder()
            .api_key("  ")
            .user_agent("test/0.0.0")
            .build();

        // Assert
        assert!(result.unwrap_err().to_string().contains("blank"));
    }

    #[test]
    fn test_builder_without_key_is_proxy_mode() {
        // Arrange & Act
        let client = OmdbClient::builder()
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert!(!client.is_direct());
        assert_eq!(client.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_redact_api_key() {
        // Arrange
        let url = Url::parse("https://www.omdbapi.com/?apikey=secret&s=batman").unwrap();

        // Act
        let redacted = redact_api_key(&url);

        // Assert
        assert!(!redacted.contains("secret"));
        assert!(redacted.contains("s=batman"));
    }

    #[tokio::test]
    async fn test_search_direct_mode_via_http() {
        // Arrange
        let server = MockServer::start().await;
        let body = include_str!("../../../../fixtures/omdb/search_batman.json");

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("apikey", "test-key"))
            .and(query_param("s", "batman"))
            .and(query_param("page", "2"))
            .and(query_param("type", "movie"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = direct_client(&server);
        let params = SearchParams::new("batman")
            .page(2)
            .type_filter(TypeFilter::Movie);

        // Act
        let outcome = client.search(&params).await.unwrap();

        // Assert
        let SearchOutcome::Found { items, .. } = outcome else {
            panic!("expected a positive search outcome");
        };
        assert_eq!(items.len(), 4);
    }

    #[tokio::test]
    async fn test_search_proxy_mode_via_http() {
        // Arrange
        let server = MockServer::start().await;
        let body = include_str!("../../../../fixtures/omdb/search_batman.json");

        Mock::given(method("GET"))
            .and(path("/api/movies"))
            .and(query_param("query", "batman"))
            .and(query_param("page", "1"))
            .and(query_param_is_missing("apikey"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = proxy_client(&server);

        // Act
        let outcome = client.search(&SearchParams::new("batman")).await.unwrap();

        // Assert
        assert!(matches!(
            outcome,
            SearchOutcome::Found {
                total_results: 25,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_search_not_found_is_not_an_error() {
        // Arrange
        let server = MockServer::start().await;
        let body = include_str!("../../../../fixtures/omdb/search_not_found.json");

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let client = direct_client(&server);

        // Act
        let outcome = client
            .search(&SearchParams::new("zzzzzzzz"))
            .await
            .unwrap();

        // Assert
        assert_eq!(
            outcome,
            SearchOutcome::NotFound {
                message: String::from("Movie not found!")
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_key_json_with_401_is_domain_negative() {
        // Arrange
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"Response":"False","Error":"Invalid API key!"}"#),
            )
            .mount(&server)
            .await;

        let client = direct_client(&server);

        // Act
        let outcome = client.search(&SearchParams::new("batman")).await.unwrap();

        // Assert
        assert_eq!(
            outcome,
            SearchOutcome::NotFound {
                message: String::from("Invalid API key!")
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_transport_error() {
        // Arrange
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let client = direct_client(&server);

        // Act
        let result = client.search(&SearchParams::new("batman")).await;

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("failed to decode JSON response"));
    }

    #[tokio::test]
    async fn test_proxy_failure_body_is_transport_error() {
        // Arrange
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string(r#"{"error":"Failed to fetch data"}"#),
            )
            .mount(&server)
            .await;

        let client = proxy_client(&server);

        // Act
        let result = client.search(&SearchParams::new("batman")).await;

        // Assert
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_lookup_direct_mode_via_http() {
        // Arrange
        let server = MockServer::start().await;
        let body = include_str!("../../../../fixtures/omdb/details_tt0372784.json");

        Mock::given(method("GET"))
            .and(query_param("apikey", "test-key"))
            .and(query_param("i", "tt0372784"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = direct_client(&server);

        // Act
        let outcome = client.lookup("tt0372784").await.unwrap();

        // Assert
        let LookupOutcome::Found(details) = outcome else {
            panic!("expected a positive lookup outcome");
        };
        assert_eq!(details.title, "Batman Begins");
    }

    #[tokio::test]
    async fn test_lookup_proxy_mode_via_http() {
        // Arrange
        let server = MockServer::start().await;
        let body = include_str!("../../../../fixtures/omdb/details_not_found.json");

        Mock::given(method("GET"))
            .and(path("/api/movies"))
            .and(query_param("imdbID", "tt0000000"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = proxy_client(&server);

        // Act
        let outcome = client.lookup("tt0000000").await.unwrap();

        // Assert
        assert_eq!(
            outcome,
            LookupOutcome::NotFound {
                message: String::from("Incorrect IMDb ID.")
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_raw_returns_body_unchanged() {
        // Arrange
        let server = MockServer::start().await;
        let body = include_str!("../../../../fixtures/omdb/search_batman.json");

        Mock::given(method("GET"))
            .and(query_param("apikey", "test-key"))
            .and(query_param("s", "batman"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let client = direct_client(&server);
        let query = DirectoryQuery::Search {
            query: Some(String::from("batman")),
            page: None,
            r#type: None,
        };

        // Act
        let value = client.fetch_raw(&query).await.unwrap();

        // Assert
        let expected: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(value, expected);
    }
}

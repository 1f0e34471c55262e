//! Poster image reachability probe.
#![allow(clippy::future_not_send)]

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::instrument;

/// Image reachability trait.
///
/// `check` never fails: any error resolves to `false`.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(ImageProbe: Send)]
pub trait LocalImageProbe {
    /// Returns `true` if `url` resolves to a retrievable resource.
    async fn check(&self, url: &str) -> bool;
}

/// Probe that issues an HTTP `HEAD` and accepts any 2xx status.
#[derive(Debug, Clone)]
pub struct HttpImageProbe {
    /// HTTP client.
    http_client: Client,
}

impl HttpImageProbe {
    /// Creates a probe with the given User-Agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the `reqwest::Client` build fails.
    pub fn new(user_agent: &str) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http_client })
    }
}

impl ImageProbe for HttpImageProbe {
    #[instrument(skip_all)]
    async fn check(&self, url: &str) -> bool {
        match self.http_client.head(url).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                tracing::debug!(url, status = %response.status(), ok, "poster probe");
                ok
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "poster probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{HttpImageProbe, ImageProbe};

    #[tokio::test]
    async fn test_check_reachable_image() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/poster.jpg"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        let probe = HttpImageProbe::new("test/0.0.0").unwrap();

        // Act
        let ok = probe.check(&format!("{}/poster.jpg", server.uri())).await;

        // Assert
        assert!(ok);
    }

    #[tokio::test]
    async fn test_check_missing_image() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let probe = HttpImageProbe::new("test/0.0.0").unwrap();

        // Act
        let ok = probe.check(&format!("{}/gone.jpg", server.uri())).await;

        // Assert
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_check_invalid_url_is_false() {
        // Arrange
        let probe = HttpImageProbe::new("test/0.0.0").unwrap();

        // Act
        let ok = probe.check("not a url").await;

        // Assert
        assert!(!ok);
    }
}

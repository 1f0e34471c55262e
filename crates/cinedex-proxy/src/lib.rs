//! HTTP relay in front of OMDb.
//!
//! Clients that must not hold the OMDb API key call this server instead.
//! It forwards search and lookup queries with the key attached and relays
//! the upstream JSON body unchanged.

mod query;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cinedex_api::omdb::OmdbClient;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::instrument;

pub use query::ProxyQuery;

/// Movies endpoint.
pub const MOVIES_PATH: &str = "/api/movies";

/// Alias of [`MOVIES_PATH`] kept for clients built against the old
/// serverless deployment.
pub const LEGACY_MOVIES_PATH: &str = "/.netlify/functions/omdb";

/// Liveness endpoint.
pub const HEALTH_PATH: &str = "/healthz";

/// Error body message for any upstream failure.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct ProxyState {
    /// Upstream client holding the API key.
    client: Arc<OmdbClient>,
}

impl ProxyState {
    /// Wraps a client for use by the handlers.
    ///
    /// # Errors
    ///
    /// Returns an error if the client has no API key.
    pub fn new(client: OmdbClient) -> Result<Self> {
        if !client.is_direct() {
            bail!("the proxy requires an OMDb API key (set OMDB_API_KEY)");
        }
        Ok(Self {
            client: Arc::new(client),
        })
    }
}

/// Builds the proxy routes.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(healthz))
        .route(MOVIES_PATH, get(movies))
        .route(LEGACY_MOVIES_PATH, get(movies))
        .with_state(state)
}

/// Serves the proxy on `listener` until the server stops.
///
/// # Errors
///
/// Returns an error if the server fails.
pub async fn serve(listener: TcpListener, state: ProxyState) -> Result<()> {
    let addr = listener
        .local_addr()
        .context("failed to read listener address")?;
    tracing::info!("cinedex proxy listening on http://{addr}");
    axum::serve(listener, router(state))
        .await
        .context("server shutdown")?;
    Ok(())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[instrument(skip_all)]
async fn movies(State(state): State<ProxyState>, Query(params): Query<ProxyQuery>) -> Response {
    let upstream = params.into_directory_query();
    tracing::debug!(?upstream, "relaying query");

    match state.client.fetch_raw(&upstream).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            tracing::error!("Error fetching data: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": FETCH_FAILED_MESSAGE })),
            )
                .into_response()
        }
    }
}

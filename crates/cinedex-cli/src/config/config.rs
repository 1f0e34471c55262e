//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default proxy listen address.
pub const DEFAULT_PROXY_BIND: &str = "127.0.0.1:8888";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory endpoint settings.
    #[serde(default)]
    pub directory: DirectoryConfig,
    /// Proxy server settings.
    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// Directory endpoint configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Endpoint override. OMDb itself when a key is set, otherwise the
    /// local proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Proxy server configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Listen address (`host:port`).
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    String::from(DEFAULT_PROXY_BIND)
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Resolves the endpoint the directory client should talk to.
    ///
    /// `None` means the client's built-in OMDb URL. Without an API key and
    /// without an override, the local proxy's movies endpoint is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL or bind address is invalid.
    pub fn directory_url(&self, has_api_key: bool) -> Result<Option<Url>> {
        if let Some(ref base) = self.directory.base_url {
            let url = Url::parse(base)
                .with_context(|| format!("invalid directory.base_url: {base}"))?;
            return Ok(Some(url));
        }
        if has_api_key {
            return Ok(None);
        }
        let proxy = format!("http://{}{}", self.proxy.bind, cinedex_proxy::MOVIES_PATH);
        let url = Url::parse(&proxy)
            .with_context(|| format!("invalid proxy.bind: {}", self.proxy.bind))?;
        Ok(Some(url))
    }
}

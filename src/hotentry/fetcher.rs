//! Hot entry fetcher.
//!
//! Tries the structured JSON endpoint first and falls back to the RDF feed
//! when it fails for any reason. Each attempt is made once, with its own
//! timeout and a randomly chosen User-Agent.

use std::time::Duration;

use rand::seq::IndexedRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::SourceConfig;
use crate::error::{HotentryError, Result};
use crate::hotentry::parser::{parse_api_json, parse_rdf_feed};
use crate::hotentry::types::Entry;

/// User agent sent when the configured pool is empty.
const FALLBACK_USER_AGENT: &str = "hotentry-rss/0.1";

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Which upstream endpoint an attempt targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// JSON API.
    Primary,
    /// RDF/RSS 1.0 feed.
    Fallback,
}

/// Client for the bookmarking site's hot entries.
#[derive(Debug, Clone)]
pub struct HatenaClient {
    client: Client,
    primary_url: String,
    fallback_url: String,
    user_agents: Vec<String>,
}

impl HatenaClient {
    /// Create a client from the source configuration.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/xml"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ja,en-US;q=0.7,en;q=0.3"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .default_headers(headers)
            .build()
            .map_err(|e| HotentryError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            primary_url: config.primary_url.clone(),
            fallback_url: config.fallback_url.clone(),
            user_agents: config.user_agents.clone(),
        })
    }

    /// Fetch the current hot entries.
    ///
    /// Returns the primary endpoint's entries, or the fallback feed's when
    /// the primary attempt fails. When both fail the error carries both
    /// causes.
    pub async fn fetch(&self) -> Result<Vec<Entry>> {
        match self.fetch_from(Endpoint::Primary).await {
            Ok(entries) => Ok(entries),
            Err(primary) => {
                warn!(error = %primary, "Primary hot entry endpoint failed, trying RSS feed");
                self.fetch_from(Endpoint::Fallback)
                    .await
                    .map_err(|fallback| HotentryError::fallback(primary, fallback))
            }
        }
    }

    /// Fetch from a single endpoint, without falling back.
    pub async fn fetch_from(&self, endpoint: Endpoint) -> Result<Vec<Entry>> {
        let url = match endpoint {
            Endpoint::Primary => &self.primary_url,
            Endpoint::Fallback => &self.fallback_url,
        };
        let bytes = self.get_bytes(url).await?;

        let entries = match endpoint {
            Endpoint::Primary => parse_api_json(&bytes)?,
            Endpoint::Fallback => parse_rdf_feed(&bytes)?,
        };
        debug!(?endpoint, count = entries.len(), "Fetched hot entries");
        Ok(entries)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let user_agent = self.pick_user_agent();
        debug!(url, user_agent, "Requesting hot entries");

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HotentryError::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// One User-Agent from the pool, chosen uniformly at random.
    fn pick_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::rng())
            .map(String::as_str)
            .unwrap_or(FALLBACK_USER_AGENT)
    }
}

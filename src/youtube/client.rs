//! Async YouTube client.
//!
//! Every operation suspends only at the network round trip, so several
//! independent calls can be awaited concurrently on one runtime.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::youtube::models::{ChannelInfo, SearchResult, VideoInfo};
use crate::youtube::parser;
use crate::youtube::request::{Endpoints, RequestTarget, check_status};
use reqwest::Client;

/// Non-blocking client for autocomplete, watch, search and channel pages.
///
/// Cloning is cheap and shares the underlying connection pool, which is
/// released when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    /// HTTP client for upstream requests
    client: Client,
    /// Upstream endpoints and locale
    endpoints: Endpoints,
    /// Limit used by `search_videos`
    max_results: usize,
}

impl YouTubeClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    /// Fails with `Error::Client` if the HTTP client cannot be built
    /// (for instance when no TLS backend is available).
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(Error::Client)?;
        Ok(Self::with_http_client(client, config))
    }

    /// Create a client around an existing `reqwest::Client`.
    ///
    /// The caller's timeout and headers apply; only the endpoints and the
    /// search limit are taken from `config`.
    pub fn with_http_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            endpoints: Endpoints::new(config),
            max_results: config.max_results,
        }
    }

    /// Fetch ranked search suggestions for a partial query.
    ///
    /// Blank input yields an empty list without contacting upstream.
    pub async fn autocomplete(&self, partial_text: &str) -> Result<Vec<String>> {
        if partial_text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let target = self.endpoints.autocomplete(partial_text)?;
        let body = self.fetch(&target).await?;
        let suggestions = parser::parse_suggestions(&target.input, &body)?;
        tracing::info!(query = %target.input, count = suggestions.len(), "fetched suggestions");
        Ok(suggestions)
    }

    /// Fetch metadata for a single video.
    pub async fn get_video_info(&self, video_id: &str) -> Result<VideoInfo> {
        let target = self.endpoints.video_info(video_id)?;
        let body = self.fetch(&target).await?;
        let video = parser::parse_video_info(&target.input, &body)?;
        tracing::info!(video_id = %video.id, title = %video.title, "fetched video info");
        Ok(video)
    }

    /// Search for videos and channels, up to the configured limit.
    pub async fn search_videos(&self, query_text: &str) -> Result<Vec<SearchResult>> {
        self.search_videos_limited(query_text, self.max_results).await
    }

    /// Search for videos and channels, returning at most `max_results`
    /// entries in upstream ranking order.
    pub async fn search_videos_limited(
        &self,
        query_text: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>> {
        let target = self.endpoints.search(query_text)?;
        let body = self.fetch(&target).await?;
        let results = parser::parse_search_results(&target.input, &body, max_results)?;
        tracing::info!(query = %target.input, count = results.len(), "fetched search results");
        Ok(results)
    }

    /// Fetch metadata for a channel by `UC...` id or `@handle`.
    pub async fn get_channel_info(&self, channel_id: &str) -> Result<ChannelInfo> {
        let target = self.endpoints.channel(channel_id)?;
        let body = self.fetch(&target).await?;
        let channel = parser::parse_channel_info(&target.input, &body)?;
        tracing::info!(channel_id = %channel.id, name = %channel.name, "fetched channel info");
        Ok(channel)
    }

    /// Perform the round trip and return the body of a successful response.
    async fn fetch(&self, target: &RequestTarget) -> Result<String> {
        tracing::debug!(operation = %target.operation, url = %target.url, "sending request");

        let response = self
            .client
            .get(target.url.clone())
            .send()
            .await
            .map_err(|e| Error::transport(target.operation, &target.input, e))?;

        check_status(target, response.status())?;

        response
            .text()
            .await
            .map_err(|e| Error::transport(target.operation, &target.input, e))
    }
}

//! Blocking YouTube client.
//!
//! Mirrors [`YouTubeClient`](crate::youtube::YouTubeClient) call for call;
//! both variants build requests through the same endpoints and shape
//! responses through the same parser.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::youtube::models::{ChannelInfo, SearchResult, VideoInfo};
use crate::youtube::parser;
use crate::youtube::request::{Endpoints, RequestTarget, check_status};
use reqwest::blocking::Client;

/// Blocking client. Each call holds the calling thread until the round
/// trip completes.
///
/// Must not be created or dropped from within an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingYouTubeClient {
    client: Client,
    endpoints: Endpoints,
    max_results: usize,
}

impl BlockingYouTubeClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    /// Fails with `Error::Client` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(Error::Client)?;
        Ok(Self::with_http_client(client, config))
    }

    /// Create a client around an existing `reqwest::blocking::Client`.
    pub fn with_http_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            endpoints: Endpoints::new(config),
            max_results: config.max_results,
        }
    }

    /// See [`YouTubeClient::autocomplete`](crate::youtube::YouTubeClient::autocomplete).
    pub fn autocomplete(&self, partial_text: &str) -> Result<Vec<String>> {
        if partial_text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let target = self.endpoints.autocomplete(partial_text)?;
        let body = self.fetch(&target)?;
        let suggestions = parser::parse_suggestions(&target.input, &body)?;
        tracing::info!(query = %target.input, count = suggestions.len(), "fetched suggestions");
        Ok(suggestions)
    }

    /// Fetch metadata for a single video.
    pub fn get_video_info(&self, video_id: &str) -> Result<VideoInfo> {
        let target = self.endpoints.video_info(video_id)?;
        let body = self.fetch(&target)?;
        let video = parser::parse_video_info(&target.input, &body)?;
        tracing::info!(video_id = %video.id, title = %video.title, "fetched video info");
        Ok(video)
    }

    /// Search for videos and channels, up to the configured limit.
    pub fn search_videos(&self, query_text: &str) -> Result<Vec<SearchResult>> {
        self.search_videos_limited(query_text, self.max_results)
    }

    /// Search returning at most `max_results` entries in upstream order.
    pub fn search_videos_limited(
        &self,
        query_text: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>> {
        let target = self.endpoints.search(query_text)?;
        let body = self.fetch(&target)?;
        let results = parser::parse_search_results(&target.input, &body, max_results)?;
        tracing::info!(query = %target.input, count = results.len(), "fetched search results");
        Ok(results)
    }

    /// Fetch metadata for a channel by `UC...` id or `@handle`.
    pub fn get_channel_info(&self, channel_id: &str) -> Result<ChannelInfo> {
        let target = self.endpoints.channel(channel_id)?;
        let body = self.fetch(&target)?;
        let channel = parser::parse_channel_info(&target.input, &body)?;
        tracing::info!(channel_id = %channel.id, name = %channel.name, "fetched channel info");
        Ok(channel)
    }

    fn fetch(&self, target: &RequestTarget) -> Result<String> {
        tracing::debug!(operation = %target.operation, url = %target.url, "sending request");

        let response = self
            .client
            .get(target.url.clone())
            .send()
            .map_err(|e| Error::transport(target.operation, &target.input, e))?;

        check_status(target, response.status())?;

        response
            .text()
            .map_err(|e| Error::transport(target.operation, &target.input, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::YouTubeClient;
    use crate::youtube::testing::{MockUpstream, fixtures, unreachable_config};

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_autocomplete() {
        let upstream = MockUpstream::spawn(200, fixtures::SUGGESTIONS);
        let client = BlockingYouTubeClient::new(&upstream.config()).unwrap();

        let suggestions = client.autocomplete("rust").unwrap();
        assert_eq!(
            suggestions,
            vec!["rust", "rust game", "rust programming", "rust console"]
        );
    }

    #[test]
    fn test_autocomplete_blank_input_is_consistent() {
        let client = BlockingYouTubeClient::new(&unreachable_config()).unwrap();
        for _ in 0..3 {
            assert!(client.autocomplete("").unwrap().is_empty());
        }
    }

    #[test]
    fn test_get_video_info_not_found() {
        let upstream = MockUpstream::spawn(200, fixtures::WATCH_PAGE_UNAVAILABLE);
        let client = BlockingYouTubeClient::new(&upstream.config()).unwrap();

        let err = client.get_video_info("aaaaaaaaaaa").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_get_channel_info_by_handle() {
        let upstream = MockUpstream::spawn(200, fixtures::CHANNEL_PAGE);
        let client = BlockingYouTubeClient::new(&upstream.config()).unwrap();

        let channel = client.get_channel_info("@RickAstleyYT").unwrap();
        assert_eq!(channel.id, "UCuAXFkgsw1L7xaCfnd5JJOw");
        assert_eq!(upstream.requests()[0], "/@RickAstleyYT?hl=en&gl=US");
    }

    #[test]
    fn test_blank_lookup_is_rejected_without_request() {
        let client = BlockingYouTubeClient::new(&unreachable_config()).unwrap();
        assert!(matches!(
            client.get_video_info(""),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            client.search_videos(" "),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_malformed_and_unreachable() {
        let upstream = MockUpstream::spawn(200, "{}");
        let client = BlockingYouTubeClient::new(&upstream.config()).unwrap();
        assert!(client.autocomplete("rust").unwrap_err().is_parse());
        assert!(client.get_video_info("abc").unwrap_err().is_parse());
        assert!(client.search_videos("rust").unwrap_err().is_parse());
        assert!(client.get_channel_info("UCabc").unwrap_err().is_parse());

        let client = BlockingYouTubeClient::new(&unreachable_config()).unwrap();
        assert!(client.autocomplete("rust").unwrap_err().is_request());
        assert!(client.get_video_info("abc").unwrap_err().is_request());
        assert!(client.search_videos("rust").unwrap_err().is_request());
        assert!(client.get_channel_info("UCabc").unwrap_err().is_request());
    }

    #[test]
    fn test_unreachable_error_names_connection_failure() {
        let client = BlockingYouTubeClient::new(&unreachable_config()).unwrap();

        let err = client.search_videos("rust").unwrap_err();
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().to_lowercase().contains("connect"));
    }

    #[test]
    fn test_blocking_and_async_outputs_match() {
        let rt = runtime();

        let upstream = MockUpstream::spawn(200, fixtures::SUGGESTIONS);
        let blocking = BlockingYouTubeClient::new(&upstream.config()).unwrap();
        let client = YouTubeClient::new(&upstream.config()).unwrap();
        assert_eq!(
            serde_json::to_string(&blocking.autocomplete("rust").unwrap()).unwrap(),
            serde_json::to_string(&rt.block_on(client.autocomplete("rust")).unwrap()).unwrap()
        );

        let upstream = MockUpstream::spawn(200, fixtures::WATCH_PAGE);
        let blocking = BlockingYouTubeClient::new(&upstream.config()).unwrap();
        let client = YouTubeClient::new(&upstream.config()).unwrap();
        assert_eq!(
            serde_json::to_string(&blocking.get_video_info("dQw4w9WgXcQ").unwrap()).unwrap(),
            serde_json::to_string(&rt.block_on(client.get_video_info("dQw4w9WgXcQ")).unwrap())
                .unwrap()
        );

        let upstream = MockUpstream::spawn(200, fixtures::RESULTS_PAGE);
        let blocking = BlockingYouTubeClient::new(&upstream.config()).unwrap();
        let client = YouTubeClient::new(&upstream.config()).unwrap();
        assert_eq!(
            serde_json::to_string(&blocking.search_videos("rust").unwrap()).unwrap(),
            serde_json::to_string(&rt.block_on(client.search_videos("rust")).unwrap()).unwrap()
        );

        let upstream = MockUpstream::spawn(200, fixtures::CHANNEL_PAGE);
        let blocking = BlockingYouTubeClient::new(&upstream.config()).unwrap();
        let client = YouTubeClient::new(&upstream.config()).unwrap();
        assert_eq!(
            serde_json::to_string(&blocking.get_channel_info("UCuAXFkgsw1L7xaCfnd5JJOw").unwrap())
                .unwrap(),
            serde_json::to_string(
                &rt.block_on(client.get_channel_info("UCuAXFkgsw1L7xaCfnd5JJOw"))
                    .unwrap()
            )
            .unwrap()
        );
    }
}

//! Request construction shared by both clients.

use crate::config::ClientConfig;
use crate::error::{Error, Operation, Result};
use reqwest::{StatusCode, Url};

/// A fully built request for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub operation: Operation,
    /// Trimmed caller input, kept for error context
    pub input: String,
    pub url: Url,
}

/// Upstream endpoints and locale parameters.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
    suggest_url: String,
    language: String,
    region: String,
}

impl Endpoints {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            suggest_url: config.suggest_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            region: config.region.clone(),
        }
    }

    /// `GET {suggest}/complete/search` returning JSONP.
    pub fn autocomplete(&self, partial_text: &str) -> Result<RequestTarget> {
        let input = partial_text.trim();
        self.target(
            Operation::Autocomplete,
            input,
            format!("{}/complete/search", self.suggest_url),
            &[
                ("q", input),
                ("client", "youtube"),
                ("hl", &self.language),
                ("gl", &self.region),
                ("ds", "yt"),
            ],
        )
    }

    /// `GET {base}/watch?v=...`
    pub fn video_info(&self, video_id: &str) -> Result<RequestTarget> {
        let input = non_blank(Operation::VideoInfo, video_id)?;
        self.target(
            Operation::VideoInfo,
            input,
            format!("{}/watch", self.base_url),
            &[("v", input), ("hl", &self.language), ("gl", &self.region)],
        )
    }

    /// `GET {base}/results?search_query=...`
    pub fn search(&self, query_text: &str) -> Result<RequestTarget> {
        let input = non_blank(Operation::Search, query_text)?;
        self.target(
            Operation::Search,
            input,
            format!("{}/results", self.base_url),
            &[
                ("search_query", input),
                ("hl", &self.language),
                ("gl", &self.region),
            ],
        )
    }

    /// `GET {base}/channel/{id}`, or `GET {base}/@handle` for handles.
    pub fn channel(&self, channel_id: &str) -> Result<RequestTarget> {
        let input = non_blank(Operation::ChannelInfo, channel_id)?;
        if input.contains(['/', '?', '#']) {
            return Err(Error::InvalidInput {
                operation: Operation::ChannelInfo,
                reason: "channel id must not contain URL separators",
            });
        }
        let path = if input.starts_with('@') {
            format!("{}/{}", self.base_url, input)
        } else {
            format!("{}/channel/{}", self.base_url, input)
        };
        self.target(
            Operation::ChannelInfo,
            input,
            path,
            &[("hl", &self.language), ("gl", &self.region)],
        )
    }

    fn target(
        &self,
        operation: Operation,
        input: &str,
        url: String,
        params: &[(&str, &str)],
    ) -> Result<RequestTarget> {
        let url = Url::parse_with_params(&url, params)
            .map_err(|e| Error::request(operation, input, format!("invalid URL {url}: {e}")))?;
        Ok(RequestTarget {
            operation,
            input: input.to_string(),
            url,
        })
    }
}

fn non_blank(operation: Operation, input: &str) -> Result<&str> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::InvalidInput {
            operation,
            reason: "input must not be empty",
        });
    }
    Ok(input)
}

/// Map a response status to the error taxonomy.
///
/// 404 on a lookup means the entity does not exist; every other
/// non-success status is a request failure.
pub fn check_status(target: &RequestTarget, status: StatusCode) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    tracing::warn!(operation = %target.operation, %status, "upstream returned non-success status");
    if status == StatusCode::NOT_FOUND && target.operation.is_lookup() {
        return Err(Error::not_found(
            target.operation,
            &target.input,
            format!("HTTP {status}"),
        ));
    }
    Err(Error::request(
        target.operation,
        &target.input,
        format!("HTTP {status}"),
    ))
}

//! Error taxonomy shared by the blocking and async clients.

use std::fmt;
use thiserror::Error;

/// Operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Autocomplete,
    VideoInfo,
    Search,
    ChannelInfo,
}

impl Operation {
    /// Name of the public method this operation backs.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Autocomplete => "autocomplete",
            Operation::VideoInfo => "get_video_info",
            Operation::Search => "search_videos",
            Operation::ChannelInfo => "get_channel_info",
        }
    }

    /// Whether the operation looks up a single entity by identifier.
    pub fn is_lookup(self) -> bool {
        matches!(self, Operation::VideoInfo | Operation::ChannelInfo)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every failure a client operation can surface.
///
/// Each variant carries the operation and the caller's input so a failure
/// can be diagnosed without the surrounding call site.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure, timeout, or a non-success status.
    ///
    /// `source` holds the transport error; it is `None` for status failures.
    #[error("{operation}({input:?}) request failed: {reason}")]
    Request {
        operation: Operation,
        input: String,
        reason: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    /// Upstream confirmed the requested entity does not exist.
    #[error("{operation}({input:?}) not found: {reason}")]
    NotFound {
        operation: Operation,
        input: String,
        reason: String,
    },
    /// Response body did not have the expected structure.
    #[error("{operation}({input:?}) returned an unexpected response: {reason}")]
    Parse {
        operation: Operation,
        input: String,
        reason: String,
    },
    /// The HTTP client itself could not be built.
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// Input rejected before any request was made.
    #[error("{operation} rejected input: {reason}")]
    InvalidInput {
        operation: Operation,
        reason: &'static str,
    },
}

impl Error {
    pub(crate) fn request(operation: Operation, input: &str, reason: impl fmt::Display) -> Self {
        Error::Request {
            operation,
            input: input.to_string(),
            reason: reason.to_string(),
            source: None,
        }
    }

    /// Wrap a reqwest failure, folding its cause chain into `reason`.
    ///
    /// reqwest's own message omits the cause (refused connection, DNS,
    /// timeout, TLS), which lives further down `source()`.
    pub(crate) fn transport(operation: Operation, input: &str, err: reqwest::Error) -> Self {
        let mut reason = err.to_string();
        let mut cause = std::error::Error::source(&err);
        while let Some(inner) = cause {
            reason.push_str(": ");
            reason.push_str(&inner.to_string());
            cause = inner.source();
        }
        Error::Request {
            operation,
            input: input.to_string(),
            reason,
            source: Some(err),
        }
    }

    pub(crate) fn not_found(operation: Operation, input: &str, reason: impl fmt::Display) -> Self {
        Error::NotFound {
            operation,
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn parse(operation: Operation, input: &str, reason: impl fmt::Display) -> Self {
        Error::Parse {
            operation,
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Operation that failed, if the failure belongs to one.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Error::Request { operation, .. }
            | Error::NotFound { operation, .. }
            | Error::Parse { operation, .. }
            | Error::InvalidInput { operation, .. } => Some(*operation),
            Error::Client(_) => None,
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(self, Error::Request { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! YouTube page and endpoint integration.
//!
//! Provides the blocking and async clients plus the request building and
//! response shaping they share.

pub mod blocking;
pub mod client;
pub mod models;
pub mod parser;
pub mod request;

#[cfg(test)]
pub(crate) mod testing;

pub use blocking::BlockingYouTubeClient;
pub use client::YouTubeClient;
pub use models::{ChannelInfo, ChannelSummary, SearchResult, VideoInfo, VideoSummary};

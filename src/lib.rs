//! Blocking and async clients for YouTube's autocomplete, watch, search and
//! channel pages.
//!
//! ```no_run
//! use yt_api_wrapper::{ClientConfig, YouTubeClient};
//!
//! # async fn run() -> yt_api_wrapper::Result<()> {
//! let client = YouTubeClient::new(&ClientConfig::default())?;
//! let suggestions = client.autocomplete("rust prog").await?;
//! let video = client.get_video_info("dQw4w9WgXcQ").await?;
//! println!("{suggestions:?} {} ({})", video.title, video.format_duration());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod youtube;

pub use config::ClientConfig;
pub use error::{Error, Operation, Result};
pub use youtube::{
    BlockingYouTubeClient, ChannelInfo, ChannelSummary, SearchResult, VideoInfo, VideoSummary,
    YouTubeClient,
};

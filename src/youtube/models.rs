//! Records returned by the clients.
//!
//! Contains video, search result and channel structures plus helpers for
//! the human-readable counts and durations YouTube renders into its pages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Full metadata for a single video, taken from the watch page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoInfo {
    /// YouTube video ID
    pub id: String,
    /// Video title
    pub title: String,
    /// Channel display name
    pub author: String,
    /// Channel ID
    pub channel_id: String,
    /// Full description
    pub description: String,
    /// Uploader-supplied keywords
    pub keywords: Vec<String>,
    /// Largest available thumbnail
    pub thumbnail_url: Option<String>,
    /// Duration in seconds (0 for live streams in progress)
    pub duration: u64,
    /// View count, absent for premieres
    pub view_count: Option<u64>,
    /// Upload date as reported upstream (`YYYY-MM-DD` or RFC 3339)
    pub upload_date: Option<String>,
    /// Category name, e.g. "Music"
    pub category: Option<String>,
    /// Like count, when the page still exposes it
    pub like_count: Option<u64>,
    /// Whether the video is or was a live broadcast
    pub is_live: bool,
    /// Watch URL
    pub url: String,
}

impl VideoInfo {
    /// Format duration as HH:MM:SS or MM:SS.
    pub fn format_duration(&self) -> String {
        format_duration(self.duration)
    }

    /// Format view count with K/M suffixes.
    pub fn format_views(&self) -> String {
        self.view_count.map(format_count).unwrap_or_default()
    }

    /// Upload day parsed from the leading `YYYY-MM-DD` of `upload_date`.
    pub fn upload_day(&self) -> Option<NaiveDate> {
        let date = self.upload_date.as_deref()?;
        NaiveDate::parse_from_str(date.get(..10)?, "%Y-%m-%d").ok()
    }
}

/// One entry of a search result page, in upstream ranking order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchResult {
    Video(VideoSummary),
    Channel(ChannelSummary),
}

impl SearchResult {
    /// ID of the video or channel.
    pub fn id(&self) -> &str {
        match self {
            SearchResult::Video(v) => &v.id,
            SearchResult::Channel(c) => &c.id,
        }
    }

    pub fn as_video(&self) -> Option<&VideoSummary> {
        match self {
            SearchResult::Video(v) => Some(v),
            SearchResult::Channel(_) => None,
        }
    }
}

/// Lightweight video entry from a search page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub channel_name: String,
    pub channel_id: String,
    pub thumbnail_url: Option<String>,
    /// Duration in seconds, absent for live streams
    pub duration: Option<u64>,
    pub view_count: Option<u64>,
    /// Relative publish time, e.g. "3 years ago"
    pub published: Option<String>,
    pub url: String,
}

impl VideoSummary {
    pub fn format_duration(&self) -> String {
        self.duration.map(format_duration).unwrap_or_else(|| "LIVE".to_string())
    }
}

/// Lightweight channel entry from a search page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelSummary {
    pub id: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
    /// Subscriber text as rendered, e.g. "1.2M subscribers"
    pub subscriber_count_text: Option<String>,
    pub url: String,
}

/// Channel metadata from the channel page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Channel ID (`UC...`)
    pub id: String,
    /// Display name
    pub name: String,
    pub description: String,
    /// Profile picture
    pub avatar_url: Option<String>,
    /// Widest banner image, absent when the channel has none
    pub banner_url: Option<String>,
    /// Custom `@handle` URL
    pub vanity_url: Option<String>,
    /// Space-separated channel keywords
    pub keywords: String,
    /// Approximate subscriber count, absent when hidden
    pub subscriber_count: Option<u64>,
    /// Canonical channel URL
    pub url: String,
}

pub(crate) fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

pub(crate) fn channel_url(channel_id: &str) -> String {
    format!("https://www.youtube.com/channel/{}", channel_id)
}

/// Format seconds as HH:MM:SS or MM:SS.
pub fn format_duration(duration: u64) -> String {
    let hours = duration / 3600;
    let minutes = (duration % 3600) / 60;
    let seconds = duration % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Format a count with K/M suffixes.
pub fn format_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Parse a rendered count such as "1,234,567 views" or "1.2M subscribers".
///
/// Suffixed counts are approximate. "No views" parses as zero.
pub fn parse_count(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.starts_with("No ") {
        return Some(0);
    }

    let token = text.split_whitespace().next()?;
    let (number, multiplier) = match token.chars().last()? {
        'K' | 'k' => (&token[..token.len() - 1], 1_000f64),
        'M' => (&token[..token.len() - 1], 1_000_000f64),
        'B' => (&token[..token.len() - 1], 1_000_000_000f64),
        _ => (token, 1f64),
    };

    let number = number.replace(',', "");
    if multiplier == 1f64 {
        return number.parse().ok();
    }
    let value: f64 = number.parse().ok()?;
    Some((value * multiplier).round() as u64)
}

/// Parse a clock duration such as "4:13" or "1:02:03" to seconds.
pub fn parse_clock(text: &str) -> Option<u64> {
    let mut seconds = 0u64;
    let mut parts = 0;
    for part in text.trim().split(':') {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        seconds = seconds.checked_mul(60)?.checked_add(part.parse::<u64>().ok()?)?;
        parts += 1;
    }
    (parts <= 3).then_some(seconds)
}

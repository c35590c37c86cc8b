//! Response shaping shared by both clients.
//!
//! Every function here is pure: it takes a response body and the caller's
//! input and either returns a complete record or an [`Error::Parse`]. Only
//! fields modelled as `Option` may be missing upstream.

use crate::error::{Error, Operation, Result};
use crate::youtube::models::{
    ChannelInfo, ChannelSummary, SearchResult, VideoInfo, VideoSummary, channel_url, parse_clock,
    parse_count, watch_url,
};
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;

const JSONP_PREFIX: &str = "window.google.ac.h(";

/// Parse the suggest endpoint's JSONP body into ranked suggestions.
///
/// The payload is `window.google.ac.h([query, [[suggestion, ...], ...], {...}])`.
pub fn parse_suggestions(input: &str, body: &str) -> Result<Vec<String>> {
    let fail = |reason: String| Error::parse(Operation::Autocomplete, input, reason);

    let payload = body
        .trim()
        .strip_prefix(JSONP_PREFIX)
        .and_then(|rest| rest.trim_end_matches(';').strip_suffix(')'))
        .ok_or_else(|| fail(format!("not a JSONP callback: {}", preview(body))))?;

    let data: Value =
        serde_json::from_str(payload).map_err(|e| fail(format!("invalid JSON: {e}")))?;

    let entries = data
        .get(1)
        .and_then(Value::as_array)
        .ok_or_else(|| fail("missing suggestion array".to_string()))?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            entry
                .get(0)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| fail(format!("suggestion {i} has no text")))
        })
        .collect()
}

/// JavaScript globals YouTube embeds its page state in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVar {
    /// Search results and channel pages
    InitialData,
    /// Watch page player state
    InitialPlayerResponse,
}

impl PageVar {
    pub fn name(self) -> &'static str {
        match self {
            PageVar::InitialData => "ytInitialData",
            PageVar::InitialPlayerResponse => "ytInitialPlayerResponse",
        }
    }

    fn pattern(self) -> std::result::Result<&'static Regex, String> {
        static INITIAL_DATA: LazyLock<std::result::Result<Regex, regex::Error>> =
            LazyLock::new(|| assignment_regex(PageVar::InitialData));
        static INITIAL_PLAYER_RESPONSE: LazyLock<std::result::Result<Regex, regex::Error>> =
            LazyLock::new(|| assignment_regex(PageVar::InitialPlayerResponse));

        let compiled = match self {
            PageVar::InitialData => &*INITIAL_DATA,
            PageVar::InitialPlayerResponse => &*INITIAL_PLAYER_RESPONSE,
        };
        compiled.as_ref().map_err(|e| e.to_string())
    }
}

/// Matches `var = `, `window["var"] = ` and `"var": ` up to the value.
fn assignment_regex(var: PageVar) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(
        r#"{}(?:["']?\]?\s*=|"\s*:)\s*"#,
        regex::escape(var.name())
    ))
}

/// Locate an assignment of `var` in a page and decode exactly one JSON
/// value after it.
///
/// `var ytInitialData = {...};`, `window["ytInitialData"] = {...};` and the
/// object property form `"ytInitialData": {...}` are accepted. Occurrences
/// that do not decode as `T` are skipped.
pub fn extract_json_assignment<T: DeserializeOwned>(
    html: &str,
    var: PageVar,
) -> std::result::Result<T, String> {
    let name = var.name();
    let re = var.pattern()?;

    let mut last_error = format!("{name} not found in page");
    for m in re.find_iter(html) {
        let rest = &html[m.end()..];
        if !rest.starts_with('{') {
            continue;
        }
        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<T>();
        match stream.next() {
            Some(Ok(value)) => return Ok(value),
            Some(Err(e)) => last_error = format!("{name} could not be decoded: {e}"),
            None => {}
        }
    }
    Err(last_error)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    video_details: Option<PlayerVideoDetails>,
    microformat: Option<PlayerMicroformat>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerVideoDetails {
    video_id: String,
    title: String,
    author: String,
    channel_id: String,
    length_seconds: String,
    view_count: Option<String>,
    #[serde(default)]
    short_description: String,
    #[serde(default)]
    keywords: Vec<String>,
    thumbnail: Option<ApiThumbnails>,
    #[serde(default)]
    is_live_content: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerMicroformat {
    player_microformat_renderer: Option<PlayerMicroformatRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerMicroformatRenderer {
    upload_date: Option<String>,
    publish_date: Option<String>,
    category: Option<String>,
    like_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiThumbnails {
    #[serde(default)]
    thumbnails: Vec<ApiThumbnail>,
}

#[derive(Debug, Deserialize)]
struct ApiThumbnail {
    url: String,
}

/// Shape a watch page into a [`VideoInfo`].
///
/// Fails with `NotFound` when the player reports an error or carries no
/// video details, and with `Parse` when the details describe another video.
pub fn parse_video_info(input: &str, html: &str) -> Result<VideoInfo> {
    let op = Operation::VideoInfo;
    let player: PlayerResponse = extract_json_assignment(html, PageVar::InitialPlayerResponse)
        .map_err(|reason| Error::parse(op, input, reason))?;

    if let Some(status) = &player.playability_status
        && status.status == "ERROR"
    {
        let reason = status.reason.as_deref().unwrap_or("video unavailable");
        return Err(Error::not_found(op, input, reason));
    }

    let details = player.video_details.ok_or_else(|| {
        Error::not_found(
            op,
            input,
            "no video details (video may be private, deleted, or restricted)",
        )
    })?;

    if details.video_id != input {
        return Err(Error::parse(
            op,
            input,
            format!("page describes video {}", details.video_id),
        ));
    }

    let duration = details.length_seconds.parse::<u64>().map_err(|e| {
        Error::parse(
            op,
            input,
            format!("invalid lengthSeconds {:?}: {e}", details.length_seconds),
        )
    })?;

    let view_count = details
        .view_count
        .map(|v| {
            v.parse::<u64>()
                .map_err(|e| Error::parse(op, input, format!("invalid viewCount {v:?}: {e}")))
        })
        .transpose()?;

    let microformat = player
        .microformat
        .and_then(|m| m.player_microformat_renderer);
    let (upload_date, category, like_count) = match microformat {
        Some(m) => (
            m.upload_date.or(m.publish_date),
            m.category,
            m.like_count.and_then(|c| c.parse().ok()),
        ),
        None => (None, None, None),
    };

    let thumbnail_url = details
        .thumbnail
        .and_then(|t| t.thumbnails.into_iter().last())
        .map(|t| t.url);

    Ok(VideoInfo {
        url: watch_url(&details.video_id),
        id: details.video_id,
        title: details.title,
        author: details.author,
        channel_id: details.channel_id,
        description: details.short_description,
        keywords: details.keywords,
        thumbnail_url,
        duration,
        view_count,
        upload_date,
        category,
        like_count,
        is_live: details.is_live_content,
    })
}

/// Shape a results page into at most `limit` search results.
///
/// Ads, shelves and other renderers are skipped; an empty list is a valid
/// outcome.
pub fn parse_search_results(input: &str, html: &str, limit: usize) -> Result<Vec<SearchResult>> {
    let op = Operation::Search;
    let data: Value = extract_json_assignment(html, PageVar::InitialData)
        .map_err(|reason| Error::parse(op, input, reason))?;

    let sections = data
        .pointer("/contents/twoColumnSearchResultsRenderer/primaryContents/sectionListRenderer/contents")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::parse(op, input, "missing search section list"))?;

    let mut results = Vec::new();
    let items = sections
        .iter()
        .filter_map(|section| section.pointer("/itemSectionRenderer/contents"))
        .filter_map(Value::as_array)
        .flatten();

    for item in items {
        if results.len() >= limit {
            break;
        }
        if let Some(video) = item.get("videoRenderer") {
            let summary = video_summary(video)
                .map_err(|reason| Error::parse(op, input, format!("video result: {reason}")))?;
            results.push(SearchResult::Video(summary));
        } else if let Some(channel) = item.get("channelRenderer") {
            let summary = channel_summary(channel)
                .map_err(|reason| Error::parse(op, input, format!("channel result: {reason}")))?;
            results.push(SearchResult::Channel(summary));
        } else {
            tracing::debug!(
                renderer = ?item.as_object().and_then(|o| o.keys().next()),
                "skipping search renderer"
            );
        }
    }

    Ok(results)
}

fn video_summary(video: &Value) -> std::result::Result<VideoSummary, String> {
    let id = str_at(video, "/videoId").ok_or("missing videoId")?;
    let title = video
        .get("title")
        .and_then(text_of)
        .ok_or_else(|| format!("{id}: missing title"))?;
    let owner = video
        .pointer("/ownerText/runs/0")
        .or_else(|| video.pointer("/longBylineText/runs/0"))
        .ok_or_else(|| format!("{id}: missing owner"))?;
    let channel_name = str_at(owner, "/text").ok_or_else(|| format!("{id}: missing owner name"))?;
    let channel_id = str_at(owner, "/navigationEndpoint/browseEndpoint/browseId")
        .ok_or_else(|| format!("{id}: missing owner channel id"))?;

    Ok(VideoSummary {
        url: watch_url(id),
        id: id.to_string(),
        title,
        channel_name: channel_name.to_string(),
        channel_id: channel_id.to_string(),
        thumbnail_url: last_url(video.pointer("/thumbnail/thumbnails")),
        duration: video
            .get("lengthText")
            .and_then(text_of)
            .and_then(|t| parse_clock(&t)),
        view_count: video
            .get("viewCountText")
            .and_then(text_of)
            .and_then(|t| parse_count(&t)),
        published: video.get("publishedTimeText").and_then(text_of),
    })
}

fn channel_summary(channel: &Value) -> std::result::Result<ChannelSummary, String> {
    let id = str_at(channel, "/channelId").ok_or("missing channelId")?;
    let name = channel
        .get("title")
        .and_then(text_of)
        .ok_or_else(|| format!("{id}: missing title"))?;

    Ok(ChannelSummary {
        url: channel_url(id),
        id: id.to_string(),
        name,
        thumbnail_url: last_url(channel.pointer("/thumbnail/thumbnails")),
        subscriber_count_text: channel.get("subscriberCountText").and_then(text_of),
    })
}

/// Shape a channel page into a [`ChannelInfo`].
pub fn parse_channel_info(input: &str, html: &str) -> Result<ChannelInfo> {
    let op = Operation::ChannelInfo;
    let data: Value = extract_json_assignment(html, PageVar::InitialData)
        .map_err(|reason| Error::parse(op, input, reason))?;

    let Some(metadata) = data.pointer("/metadata/channelMetadataRenderer") else {
        if let Some(alert) = data
            .pointer("/alerts/0/alertRenderer/text")
            .and_then(text_of)
        {
            return Err(Error::not_found(op, input, alert));
        }
        return Err(Error::parse(op, input, "missing channel metadata"));
    };

    let id = str_at(metadata, "/externalId")
        .ok_or_else(|| Error::parse(op, input, "missing externalId"))?;
    if !input.starts_with('@') && id != input {
        return Err(Error::parse(op, input, format!("page describes channel {id}")));
    }
    let name =
        str_at(metadata, "/title").ok_or_else(|| Error::parse(op, input, "missing title"))?;

    let header = data.get("header");
    let banner_url = header.and_then(|h| {
        last_url(h.pointer(
            "/pageHeaderRenderer/content/pageHeaderViewModel/banner/imageBannerViewModel/image/sources",
        ))
        .or_else(|| last_url(h.pointer("/c4TabbedHeaderRenderer/banner/thumbnails")))
    });
    let subscriber_count = header.and_then(subscriber_text).and_then(|t| parse_count(&t));

    Ok(ChannelInfo {
        url: channel_url(id),
        id: id.to_string(),
        name: name.to_string(),
        description: str_at(metadata, "/description").unwrap_or_default().to_string(),
        avatar_url: last_url(metadata.pointer("/avatar/thumbnails")),
        banner_url,
        vanity_url: str_at(metadata, "/vanityChannelUrl").map(str::to_string),
        keywords: str_at(metadata, "/keywords").unwrap_or_default().to_string(),
        subscriber_count,
    })
}

/// Subscriber text from either the view-model or the legacy channel header.
fn subscriber_text(header: &Value) -> Option<String> {
    let rows = header
        .pointer("/pageHeaderRenderer/content/pageHeaderViewModel/metadata/contentMetadataViewModel/metadataRows")
        .and_then(Value::as_array);
    if let Some(rows) = rows {
        let found = rows
            .iter()
            .filter_map(|row| row.get("metadataParts").and_then(Value::as_array))
            .flatten()
            .filter_map(|part| str_at(part, "/text/content"))
            .find(|text| text.contains("subscriber"));
        if let Some(text) = found {
            return Some(text.to_string());
        }
    }
    header
        .pointer("/c4TabbedHeaderRenderer/subscriberCountText")
        .and_then(text_of)
}

fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

/// Flatten a YouTube text object (`simpleText` or `runs`).
fn text_of(value: &Value) -> Option<String> {
    if let Some(text) = value.get("simpleText").and_then(Value::as_str) {
        return Some(text.to_string());
    }
    let runs = value.get("runs")?.as_array()?;
    let text: String = runs
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}

fn last_url(list: Option<&Value>) -> Option<String> {
    let url = list?.as_array()?.last()?.get("url")?.as_str()?;
    Some(absolute_url(url))
}

/// Channel avatars in search results are protocol-relative.
fn absolute_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(100)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    &body[..end]
}

//! Test support: canned upstream pages and an in-process mock upstream.

use crate::config::ClientConfig;
use axum::Router;
use axum::http::{StatusCode, Uri};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;
use tokio::sync::oneshot;

pub(crate) mod fixtures {
    pub const SUGGESTIONS: &str = r#"window.google.ac.h(["rust",[["rust",0,[512,433]],["rust game",0,[512]],["rust programming",0,[512]],["rust console",0,[512,433]]],{"k":1,"q":"x1Yd"}])"#;

    pub const WATCH_PAGE: &str = r#"<!DOCTYPE html><html><head><title>Never Gonna Give You Up - YouTube</title></head><body>
<script nonce="abc">var ytInitialPlayerResponse = {"responseContext":{"serviceTrackingParams":[]},"playabilityStatus":{"status":"OK","playableInEmbed":true},"videoDetails":{"videoId":"dQw4w9WgXcQ","title":"Never Gonna Give You Up","lengthSeconds":"213","keywords":["rick astley","never gonna give you up"],"channelId":"UCuAXFkgsw1L7xaCfnd5JJOw","isOwnerViewing":false,"shortDescription":"The official video for \"Never Gonna Give You Up\" by Rick Astley };","isCrawlable":true,"thumbnail":{"thumbnails":[{"url":"https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg","width":120,"height":90},{"url":"https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg","width":1920,"height":1080}]},"allowRatings":true,"viewCount":"1500000000","author":"Rick Astley","isPrivate":false,"isLiveContent":false},"microformat":{"playerMicroformatRenderer":{"category":"Music","publishDate":"2009-10-24T23:57:33-07:00","uploadDate":"2009-10-24T23:57:33-07:00","isFamilySafe":true}}};var meta = document.createElement('meta');</script>
</body></html>"#;

    pub const WATCH_PAGE_UNAVAILABLE: &str = r#"<html><script>var ytInitialPlayerResponse = {"responseContext":{},"playabilityStatus":{"status":"ERROR","reason":"Video unavailable"}};</script></html>"#;

    pub const RESULTS_PAGE: &str = r#"<html><body><script nonce="n">var ytInitialData = {"estimatedResults":"1000","contents":{"twoColumnSearchResultsRenderer":{"primaryContents":{"sectionListRenderer":{"contents":[{"itemSectionRenderer":{"contents":[
{"adSlotRenderer":{"slotId":"ad-1"}},
{"channelRenderer":{"channelId":"UCaYhcUwRBNscFNUKTjgPFiA","title":{"simpleText":"Rust"},"thumbnail":{"thumbnails":[{"url":"//yt3.ggpht.com/rust-avatar","width":88,"height":88}]},"subscriberCountText":{"simpleText":"152K subscribers"}}},
{"videoRenderer":{"videoId":"vid00000001","thumbnail":{"thumbnails":[{"url":"https://i.ytimg.com/vi/vid00000001/hq720.jpg"}]},"title":{"runs":[{"text":"Rust in 100 Seconds"}]},"ownerText":{"runs":[{"text":"Fireship","navigationEndpoint":{"browseEndpoint":{"browseId":"UCsBjURrPoezykLs9EqgamOA"}}}]},"publishedTimeText":{"simpleText":"3 years ago"},"lengthText":{"simpleText":"2:29"},"viewCountText":{"simpleText":"2,345,678 views"}}},
{"videoRenderer":{"videoId":"vid00000002","thumbnail":{"thumbnails":[{"url":"https://i.ytimg.com/vi/vid00000002/hq720_live.jpg"}]},"title":{"runs":[{"text":"Live: "},{"text":"coding a TUI in Rust"}]},"longBylineText":{"runs":[{"text":"Streamer","navigationEndpoint":{"browseEndpoint":{"browseId":"UCstreamer00000000000000"}}}]},"viewCountText":{"runs":[{"text":"1,234"},{"text":" watching"}]}}}
]}},{"continuationItemRenderer":{"trigger":"CONTINUATION_TRIGGER_ON_ITEM_SHOWN"}}]}}}}};</script></body></html>"#;

    pub const CHANNEL_PAGE: &str = r#"<html><script>var ytInitialData = {"header":{"pageHeaderRenderer":{"pageTitle":"Rick Astley","content":{"pageHeaderViewModel":{"banner":{"imageBannerViewModel":{"image":{"sources":[{"url":"https://yt3.ggpht.com/banner=w1060","width":1060},{"url":"https://yt3.ggpht.com/banner=w2560","width":2560}]}}},"metadata":{"contentMetadataViewModel":{"metadataRows":[{"metadataParts":[{"text":{"content":"@RickAstleyYT"}}]},{"metadataParts":[{"text":{"content":"4.21M subscribers"}},{"text":{"content":"321 videos"}}]}]}}}}}},"metadata":{"channelMetadataRenderer":{"title":"Rick Astley","description":"Official channel","externalId":"UCuAXFkgsw1L7xaCfnd5JJOw","keywords":"\"rick astley\" music","avatar":{"thumbnails":[{"url":"https://yt3.ggpht.com/avatar=s900","width":900,"height":900}]},"channelUrl":"https://www.youtube.com/channel/UCuAXFkgsw1L7xaCfnd5JJOw","vanityChannelUrl":"http://www.youtube.com/@RickAstleyYT"}}};</script></html>"#;
}

/// A local HTTP server that answers every path with the same response.
///
/// Runs on its own thread and runtime so both the blocking and the async
/// client can talk to it.
pub(crate) struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    pub fn spawn(status: u16, body: &'static str) -> Self {
        Self::spawn_delayed(status, body, Duration::ZERO)
    }

    /// Like `spawn`, but each response is held back for `delay`.
    pub fn spawn_delayed(status: u16, body: &'static str, delay: Duration) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();
        let (addr_tx, addr_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                addr_tx.send(listener.local_addr().unwrap()).unwrap();

                let app = Router::new().fallback(move |uri: Uri| {
                    let seen = seen.clone();
                    async move {
                        seen.lock().unwrap().push(uri.to_string());
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        (StatusCode::from_u16(status).unwrap(), body)
                    }
                });

                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .unwrap();
            });
        });

        Self {
            addr: addr_rx.recv().unwrap(),
            requests,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Client configuration pointing every endpoint at this server.
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            base_url: format!("http://{}", self.addr),
            suggest_url: format!("http://{}", self.addr),
            timeout_secs: 5,
            ..ClientConfig::default()
        }
    }

    /// Paths and queries received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Configuration for an address nothing listens on.
pub(crate) fn unreachable_config() -> ClientConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ClientConfig {
        base_url: format!("http://{addr}"),
        suggest_url: format!("http://{addr}"),
        timeout_secs: 2,
        ..ClientConfig::default()
    }
}

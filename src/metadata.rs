use std::time::Duration;

use reqwest::{redirect, StatusCode};
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::debug;

use crate::config::FetchConfig;

/// Title used when the page carries no `og:title`.
pub const DEFAULT_TITLE: &str = "Трек в Яндекс Музыке";

const MAX_REDIRECTS: usize = 10;

/// The og: tags live in `<head>`; anything past this is dropped unread.
const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

/// Preview fields taken from a track/album page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub image: Option<String>,
    pub url: String,
}

#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection failure, timeout or unreadable body
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
}

pub struct MetadataFetcher {
    client: reqwest::Client,
}

impl MetadataFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client })
    }

    /// Download `url` once and read its og: properties. No retries.
    pub async fn fetch(&self, url: &str) -> Result<TrackMetadata, FetchError> {
        debug!("Fetching page metadata: {}", url);

        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = MAX_PAGE_BYTES - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                debug!("Page {} exceeds {} bytes, truncating", url, MAX_PAGE_BYTES);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        let html = String::from_utf8_lossy(&body);
        Ok(parse_track_metadata(&html, url))
    }
}

/// Extract title, image and canonical URL from an HTML document,
/// applying the fallbacks for missing properties.
pub fn parse_track_metadata(html: &str, source_url: &str) -> TrackMetadata {
    let document = Html::parse_document(html);

    TrackMetadata {
        title: meta_property(&document, "og:title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        image: meta_property(&document, "og:image"),
        url: meta_property(&document, "og:url").unwrap_or_else(|| source_url.to_string()),
    }
}

fn meta_property(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{}"]"#, property)).ok()?;
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

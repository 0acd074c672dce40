use tracing::{debug, info, warn};

use crate::link::find_music_link;
use crate::metadata::MetadataFetcher;
use crate::platform::{Attachment, ChatEvent};
use crate::reply::{
    audio_reply, track_reply, OutgoingReply, FALLBACK_TEXT, FETCH_FAILED_TEXT, START_TEXT,
};

const START_COMMAND: &str = "/start";

/// Which handler an event goes to. Checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Start,
    Link(String),
    Attachment(Attachment),
    Fallback,
}

/// Platform-agnostic message handler. Built once at startup and shared
/// between concurrently handled events; holds no per-event state.
pub struct Router {
    fetcher: MetadataFetcher,
    /// Our own username; `/start@name` only counts when it names us.
    bot_username: Option<String>,
}

impl Router {
    pub fn new(fetcher: MetadataFetcher) -> Self {
        Self {
            fetcher,
            bot_username: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    pub fn route(&self, event: &ChatEvent) -> Route {
        let text = event.text.as_deref();

        if text.is_some_and(|text| is_start_command(text, self.bot_username.as_deref())) {
            return Route::Start;
        }

        if let Some(url) = find_music_link(text) {
            return Route::Link(url.to_string());
        }

        // Any upload goes to the attachment flow, so a non-audio document
        // gets the resend-as-audio hint rather than the generic fallback.
        if let Some(attachment) = event.attachment() {
            return Route::Attachment(attachment.clone());
        }

        Route::Fallback
    }

    /// Produce exactly one reply for an incoming event
    pub async fn handle(&self, event: &ChatEvent) -> OutgoingReply {
        let route = self.route(event);
        debug!("Routed event to {:?}", route);

        match route {
            Route::Start => OutgoingReply::text(START_TEXT),
            Route::Link(url) => self.link_reply(&url).await,
            Route::Attachment(attachment) => audio_reply(Some(&attachment)),
            Route::Fallback => OutgoingReply::text(FALLBACK_TEXT),
        }
    }

    /// Fetch the linked page and build its card. Fetch failures become
    /// the apology text instead of an error.
    pub async fn link_reply(&self, url: &str) -> OutgoingReply {
        match self.fetcher.fetch(url).await {
            Ok(metadata) => {
                info!("Resolved {} as \"{}\"", url, metadata.title);
                track_reply(&metadata)
            }
            Err(e) => {
                warn!("Failed to fetch metadata for {}: {}", url, e);
                OutgoingReply::text(FETCH_FAILED_TEXT)
            }
        }
    }
}

/// `/start`, `/start payload` and `/start@OurBot` count. A mention of
/// another bot does not; with no known username any mention is accepted.
fn is_start_command(text: &str, bot_username: Option<&str>) -> bool {
    let Some(rest) = text.trim_start().strip_prefix(START_COMMAND) else {
        return false;
    };

    match rest.strip_prefix('@') {
        Some(mention) => {
            let name = mention.split(char::is_whitespace).next().unwrap_or_default();
            !name.is_empty()
                && bot_username.map_or(true, |ours| name.eq_ignore_ascii_case(ours))
        }
        None => rest.is_empty() || rest.starts_with(char::is_whitespace),
    }
}

use teloxide::utils::html;

use crate::metadata::TrackMetadata;
use crate::platform::Attachment;

pub const START_TEXT: &str = "Привет! Я tg-Music 🎧\n\
    Пришли ссылку на трек или альбом из Яндекс Музыки, и я покажу карточку с обложкой.\n\
    Ещё можно прислать MP3 (как аудио или как файл), я верну его с подсказкой.";

pub const FALLBACK_TEXT: &str = "Пришли ссылку на Яндекс Музыку или MP3-файл.\n\
    Подробнее: /start";

pub const FETCH_FAILED_TEXT: &str =
    "Не получилось открыть ссылку 😔 Проверь её и пришли ещё раз.";

pub const RESEND_AS_AUDIO_TEXT: &str =
    "Это не похоже на аудио. Пришли трек как аудио или как файл с типом audio/*.";

pub const AUDIO_CAPTION: &str = "Держи свой трек 🎶\n\
    Чтобы добавить его в Яндекс Музыку, сохрани файл и загрузи в раздел «Мои треки».";

pub const SOURCE_LABEL: &str = "Источник: Яндекс Музыка";

pub const OPEN_BUTTON_LABEL: &str = "Открыть в Яндекс Музыке";

/// Inline URL button attached under a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

/// A reply ready to be delivered by the chat transport.
/// Text and captions use HTML markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingReply {
    Text {
        text: String,
        button: Option<LinkButton>,
    },
    Photo {
        image_url: String,
        caption: String,
        button: Option<LinkButton>,
    },
    Audio {
        file_id: String,
        caption: String,
    },
}

impl OutgoingReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            button: None,
        }
    }

    /// Text card with the same caption and button, for when a photo cannot
    /// be delivered. Other replies are returned as they are.
    pub fn without_photo(self) -> Self {
        match self {
            Self::Photo {
                caption, button, ..
            } => Self::Text {
                text: caption,
                button,
            },
            other => other,
        }
    }
}

/// Card for a resolved track page: a cover photo when one is known,
/// otherwise a text card. Both carry the "open" button.
pub fn track_reply(metadata: &TrackMetadata) -> OutgoingReply {
    let heading = format!("🎵 <b>{}</b>", html::escape(&metadata.title));
    let button = Some(LinkButton {
        label: OPEN_BUTTON_LABEL.to_string(),
        url: metadata.url.clone(),
    });

    match &metadata.image {
        Some(image_url) => OutgoingReply::Photo {
            image_url: image_url.clone(),
            caption: format!("{}\n{}", heading, SOURCE_LABEL),
            button,
        },
        None => OutgoingReply::Text {
            text: format!("{}\n{}", heading, html::escape(&metadata.url)),
            button,
        },
    }
}

/// Echo an uploaded audio file back, or ask for a resend when the
/// attachment is not audio.
pub fn audio_reply(attachment: Option<&Attachment>) -> OutgoingReply {
    match attachment {
        Some(attachment) if attachment.is_audio() => OutgoingReply::Audio {
            file_id: attachment.file_id.clone(),
            caption: AUDIO_CAPTION.to_string(),
        },
        _ => OutgoingReply::text(RESEND_AS_AUDIO_TEXT),
    }
}

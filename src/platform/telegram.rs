use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::payloads::{SendAudioSetters, SendMessageSetters, SendPhotoSetters};
use teloxide::prelude::*;
use teloxide::types::{FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode};
use tracing::{info, warn};

use crate::bot::Router;
use crate::platform::{Attachment, AttachmentKind, ChatEvent};
use crate::reply::{LinkButton, OutgoingReply};

/// Run the Telegram long-polling loop until interrupted
pub async fn run(router: Arc<Router>, bot: Bot) -> Result<()> {
    info!("Starting Telegram platform...");

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Telegram platform stopped");
    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, router: Arc<Router>) -> ResponseResult<()> {
    let event = chat_event(&msg);

    info!(
        "Telegram message from {:?}: text={:?} audio={} document={}",
        msg.from.as_ref().map(|user| user.id.0),
        event.text,
        event.audio.is_some(),
        event.document.is_some()
    );

    let reply = router.handle(&event).await;
    send_reply(&bot, msg.chat.id, reply).await
}

fn chat_event(msg: &Message) -> ChatEvent {
    ChatEvent {
        text: msg.text().map(str::to_string),
        audio: msg.audio().map(|audio| Attachment {
            kind: AttachmentKind::Audio,
            file_id: audio.file.id.0.clone(),
            mime_type: audio.mime_type.as_ref().map(|mime| mime.to_string()),
        }),
        document: msg.document().map(|document| Attachment {
            kind: AttachmentKind::Document,
            file_id: document.file.id.0.clone(),
            mime_type: document.mime_type.as_ref().map(|mime| mime.to_string()),
        }),
    }
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: OutgoingReply) -> ResponseResult<()> {
    match reply {
        OutgoingReply::Text { text, button } => {
            send_text(bot, chat_id, text, button.as_ref()).await?;
        }
        reply @ OutgoingReply::Photo { .. } => {
            if let Err(e) = send_photo(bot, chat_id, &reply).await {
                warn!("Failed to send cover photo, replying with text: {:#}", e);
                if let OutgoingReply::Text { text, button } = reply.without_photo() {
                    send_text(bot, chat_id, text, button.as_ref()).await?;
                }
            }
        }
        OutgoingReply::Audio { file_id, caption } => {
            bot.send_audio(chat_id, InputFile::file_id(FileId(file_id)))
                .caption(caption)
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }

    Ok(())
}

async fn send_photo(bot: &Bot, chat_id: ChatId, reply: &OutgoingReply) -> Result<()> {
    let OutgoingReply::Photo {
        image_url,
        caption,
        button,
    } = reply
    else {
        anyhow::bail!("not a photo reply");
    };

    let url = image_url
        .parse::<reqwest::Url>()
        .with_context(|| format!("Invalid cover URL {}", image_url))?;

    let mut request = bot
        .send_photo(chat_id, InputFile::url(url))
        .caption(caption.clone())
        .parse_mode(ParseMode::Html);
    if let Some(markup) = button.as_ref().and_then(keyboard) {
        request = request.reply_markup(markup);
    }
    request.await?;
    Ok(())
}

async fn send_text(
    bot: &Bot,
    chat_id: ChatId,
    text: String,
    button: Option<&LinkButton>,
) -> ResponseResult<()> {
    let mut request = bot.send_message(chat_id, text).parse_mode(ParseMode::Html);
    if let Some(markup) = button.and_then(keyboard) {
        request = request.reply_markup(markup);
    }
    request.await?;
    Ok(())
}

/// Single-button inline keyboard. Unparseable targets drop the button.
fn keyboard(button: &LinkButton) -> Option<InlineKeyboardMarkup> {
    match button.url.parse::<reqwest::Url>() {
        Ok(url) => Some(InlineKeyboardMarkup::new([[InlineKeyboardButton::url(
            button.label.clone(),
            url,
        )]])),
        Err(e) => {
            warn!("Skipping button with invalid URL {}: {}", button.url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_with_valid_url() {
        let button = LinkButton {
            label: "Open".to_string(),
            url: "https://music.yandex.ru/album/1".to_string(),
        };
        let markup = keyboard(&button).unwrap();
        assert_eq!(markup.inline_keyboard.len(), 1);
        assert_eq!(markup.inline_keyboard[0].len(), 1);
        assert_eq!(markup.inline_keyboard[0][0].text, "Open");
    }

    #[test]
    fn test_keyboard_with_invalid_url() {
        let button = LinkButton {
            label: "Open".to_string(),
            url: "not a url".to_string(),
        };
        assert!(keyboard(&button).is_none());
    }
}

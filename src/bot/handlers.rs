//! Command and callback handlers
//!
//! One handler per inbound surface: the `/start` command, plain text
//! messages, and the content-type callback. Each callback runs one full
//! pipeline cycle; failures end in exactly one classified chat message and
//! never propagate past the handler.

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};

use crate::bot::links::PendingLinks;
use crate::bot::messages::{self, ErrorMessages, NO_PENDING_LINK_TEXT};
use crate::bot::outbound::TelegramSink;
use crate::bot::pipeline::DeliveryPipeline;
use crate::bot::selection::{choice_keyboard, ContentChoice, PROMPT_TEXT};
use crate::resolver::HttpMediaResolver;

/// Substring that marks a message as an Instagram link
pub const INSTAGRAM_DOMAIN: &str = "instagram.com";

/// Text sent between selection and delivery
pub const PROGRESS_TEXT: &str = "Please wait for a moment...";

/// Supported commands
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the welcome message
    #[command(description = "Start working with the bot.")]
    Start,
}

/// Whether `text` looks like an Instagram link. Pure substring check, no
/// URL validation.
#[must_use]
pub fn is_instagram_link(text: &str) -> bool {
    text.contains(INSTAGRAM_DOMAIN)
}

/// Replies to `/start` with the welcome text. Never touches the store.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn start(bot: Bot, msg: Message) -> Result<()> {
    let first_name = msg
        .from
        .as_ref()
        .map_or("there", |user| user.first_name.as_str());

    bot.send_message(
        msg.chat.id,
        format!(
            "Welcome to Instra, {first_name}!\nSend me an Instagram video or image link to download it."
        ),
    )
    .await?;

    Ok(())
}

/// Handles a plain text message: an Instagram link is stored as the chat's
/// pending link and answered with the selection prompt; anything else is
/// ignored without a reply.
///
/// # Errors
///
/// Returns an error if the prompt cannot be sent.
pub async fn handle_text(bot: Bot, msg: Message, links: Arc<PendingLinks>) -> Result<()> {
    let chat_id = msg.chat.id;
    let Some(text) = msg.text() else {
        debug!(%chat_id, "received message without text");
        return Ok(());
    };

    if !is_instagram_link(text) {
        return Ok(());
    }

    links.put(chat_id, text.to_string()).await;

    let first_name = msg.from.as_ref().map_or("", |u| u.first_name.as_str());
    let last_name = msg
        .from
        .as_ref()
        .and_then(|u| u.last_name.as_deref())
        .unwrap_or("");
    info!(
        "User: {first_name} {last_name} (Chat ID: {chat_id}) wants to download: {text}"
    );

    bot.send_message(chat_id, PROMPT_TEXT)
        .reply_markup(choice_keyboard())
        .await?;

    Ok(())
}

/// Handles a content-type selection: acknowledges the callback first, takes
/// the pending link and runs one delivery cycle for it.
///
/// # Errors
///
/// Returns an error if a Telegram send fails outside the pipeline; pipeline
/// failures are classified and reported to the user instead.
pub async fn handle_selection(
    bot: Bot,
    q: CallbackQuery,
    links: Arc<PendingLinks>,
    resolver: Arc<HttpMediaResolver>,
    strategy: Arc<dyn ErrorMessages>,
) -> Result<()> {
    // Telegram expects the acknowledgment within a short window, so answer
    // before any resolution work
    let _ = bot.answer_callback_query(q.id.clone()).await;

    let Some(chat_id) = q.message.as_ref().map(|msg| msg.chat().id) else {
        warn!("callback query without originating message");
        return Ok(());
    };

    let Some(choice) = q.data.as_deref().and_then(ContentChoice::from_tag) else {
        warn!(%chat_id, data = ?q.data, "unrecognized callback data");
        return Ok(());
    };

    // First-read-wins: the link is consumed here, a racing second selection
    // sees no pending link
    let Some(link) = links.take(chat_id).await else {
        bot.send_message(chat_id, NO_PENDING_LINK_TEXT).await?;
        return Ok(());
    };

    bot.send_message(chat_id, PROGRESS_TEXT).await?;

    let pipeline = DeliveryPipeline::new(resolver, TelegramSink::new(bot.clone()));
    match pipeline.deliver(chat_id, &link, choice).await {
        Ok(delivered) => {
            info!(%chat_id, delivered, tag = choice.tag(), "link processed");
        }
        Err(e) => {
            error!("Error processing Instagram link for chat ID: {chat_id}: {e:?}");
            let text = messages::for_failure(&e, chat_id, strategy.as_ref()).await;
            if let Err(send_err) = bot.send_message(chat_id, text).await {
                error!(%chat_id, "failed to deliver error notice: {send_err}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_classifier_substring_match() {
        assert!(is_instagram_link("https://www.instagram.com/p/abc/"));
        assert!(is_instagram_link("look at this instagram.com/reel/x"));
        assert!(!is_instagram_link("https://example.com/p/abc"));
        assert!(!is_instagram_link("/start"));
        assert!(!is_instagram_link(""));
    }
}

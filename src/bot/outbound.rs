//! Outbound media dispatch seam
//!
//! The delivery pipeline sends media through [`MediaSink`] rather than
//! talking to Telegram directly, so delivery ordering and pacing can be
//! exercised in tests with a recording fake.

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile};
use teloxide::RequestError;

use crate::resolver::ResolverError;

/// Dispatches one media attachment per call to a chat.
#[async_trait]
pub trait MediaSink: Send + Sync {
    /// Send a video attachment by direct URL.
    async fn send_video(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<(), ResolverError>;

    /// Send a photo attachment by direct URL.
    async fn send_photo(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<(), ResolverError>;
}

#[async_trait]
impl<T: MediaSink + ?Sized> MediaSink for Arc<T> {
    async fn send_video(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<(), ResolverError> {
        (**self).send_video(chat_id, url, caption).await
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<(), ResolverError> {
        (**self).send_photo(chat_id, url, caption).await
    }
}

/// [`MediaSink`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    /// Wraps `bot` for media dispatch.
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn parse_url(url: &str) -> Result<reqwest::Url, ResolverError> {
        reqwest::Url::parse(url)
            .map_err(|e| ResolverError::Unclassified(format!("bad media url {url}: {e}")))
    }
}

/// Dispatch failures feed the same classification table as resolver
/// failures, so Telegram errors are folded into [`ResolverError`] here.
impl From<RequestError> for ResolverError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::RetryAfter(_) => Self::RateLimited,
            RequestError::Network(e) => e.as_ref().into(),
            other => Self::Unclassified(other.to_string()),
        }
    }
}

#[async_trait]
impl MediaSink for TelegramSink {
    async fn send_video(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<(), ResolverError> {
        let mut req = self.bot.send_video(chat_id, InputFile::url(Self::parse_url(url)?));
        if let Some(caption) = caption {
            req = req.caption(caption);
        }
        req.await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        url: &str,
        caption: Option<&str>,
    ) -> Result<(), ResolverError> {
        let mut req = self.bot.send_photo(chat_id, InputFile::url(Self::parse_url(url)?));
        if let Some(caption) = caption {
            req = req.caption(caption);
        }
        req.await?;
        Ok(())
    }
}

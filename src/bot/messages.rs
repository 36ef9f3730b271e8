//! Error classification and user-facing messages
//!
//! Maps every [`ResolverError`] to exactly one chat message via an ordered
//! first-match table. Only the unclassified arm is strategy-dependent: the
//! static strategy answers a fixed apology, the generative one asks Gemini
//! to phrase it and falls back to a fixed text when that fails too.
//! Classification itself never fails.

use async_trait::async_trait;
use teloxide::types::ChatId;
use tracing::error;

use crate::llm::GeminiClient;
use crate::resolver::ResolverError;

/// Answer to a 429 from the resolver
pub const RATE_LIMITED_TEXT: &str = "Too many requests. Please wait a moment and try again.";
/// Answer to a 404 from the resolver
pub const NOT_FOUND_TEXT: &str = "The provided link is invalid or the content has been removed.";
/// Answer to a transport timeout
pub const TIMEOUT_TEXT: &str = "The request timed out. Please try again later.";
/// Answer to a 500 from the resolver
pub const UPSTREAM_TEXT: &str = "There was an issue with the server. Please try again later.";
/// Static answer to anything unclassified
pub const GENERIC_TEXT: &str = "There was an error processing your request. Please try again.";
/// Answer when the message generation itself fails
pub const GENERATION_FAILED_TEXT: &str =
    "There was an issue generating a custom error message. Please try again.";
/// Answer to a selection event with no pending link
pub const NO_PENDING_LINK_TEXT: &str = "Something went wrong. Please send the link again.";

/// Produces the message for failures the classifier cannot name.
#[async_trait]
pub trait ErrorMessages: Send + Sync {
    /// Message for an unclassified failure carrying `detail`.
    async fn unclassified(&self, detail: &str, chat_id: ChatId) -> String;
}

/// Fixed-table strategy
pub struct StaticMessages;

#[async_trait]
impl ErrorMessages for StaticMessages {
    async fn unclassified(&self, _detail: &str, _chat_id: ChatId) -> String {
        GENERIC_TEXT.to_string()
    }
}

/// Strategy that phrases the fallback message with Gemini
pub struct GenerativeMessages {
    llm: GeminiClient,
}

impl GenerativeMessages {
    /// Wraps `llm` for message generation.
    #[must_use]
    pub const fn new(llm: GeminiClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ErrorMessages for GenerativeMessages {
    async fn unclassified(&self, detail: &str, chat_id: ChatId) -> String {
        match self.llm.error_message(detail, chat_id.0).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error generating custom error message: {e}");
                GENERATION_FAILED_TEXT.to_string()
            }
        }
    }
}

/// Selects the single user-facing message for a failed pipeline run.
/// First match wins; the four classified kinds never consult the strategy.
pub async fn for_failure(
    err: &ResolverError,
    chat_id: ChatId,
    strategy: &dyn ErrorMessages,
) -> String {
    match err {
        ResolverError::RateLimited => RATE_LIMITED_TEXT.to_string(),
        ResolverError::NotFound => NOT_FOUND_TEXT.to_string(),
        ResolverError::Timeout => TIMEOUT_TEXT.to_string(),
        ResolverError::UpstreamError => UPSTREAM_TEXT.to_string(),
        ResolverError::Unclassified(detail) => strategy.unclassified(detail, chat_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: ChatId = ChatId(99);

    #[tokio::test]
    async fn test_classified_failures_use_fixed_texts() {
        assert_eq!(
            for_failure(&ResolverError::RateLimited, CHAT, &StaticMessages).await,
            RATE_LIMITED_TEXT
        );
        assert_eq!(
            for_failure(&ResolverError::NotFound, CHAT, &StaticMessages).await,
            NOT_FOUND_TEXT
        );
        assert_eq!(
            for_failure(&ResolverError::Timeout, CHAT, &StaticMessages).await,
            TIMEOUT_TEXT
        );
        assert_eq!(
            for_failure(&ResolverError::UpstreamError, CHAT, &StaticMessages).await,
            UPSTREAM_TEXT
        );
    }

    #[tokio::test]
    async fn test_unclassified_falls_through_to_generic() {
        let err = ResolverError::Unclassified(String::new());
        assert_eq!(for_failure(&err, CHAT, &StaticMessages).await, GENERIC_TEXT);
    }

    #[tokio::test]
    async fn test_strategy_only_sees_unclassified() {
        struct Marker;

        #[async_trait]
        impl ErrorMessages for Marker {
            async fn unclassified(&self, detail: &str, chat_id: ChatId) -> String {
                format!("custom: {detail} for {chat_id}")
            }
        }

        assert_eq!(
            for_failure(&ResolverError::Timeout, CHAT, &Marker).await,
            TIMEOUT_TEXT
        );
        assert_eq!(
            for_failure(
                &ResolverError::Unclassified("odd".to_string()),
                CHAT,
                &Marker
            )
            .await,
            "custom: odd for 99"
        );
    }
}

//! Pending-link store
//!
//! Holds the single most recently submitted Instagram link per chat while
//! the user picks a content type. The map never outlives the process; a
//! restart forgets every pending link.

use std::collections::HashMap;
use teloxide::types::ChatId;
use tokio::sync::Mutex;

/// In-memory mapping from chat to its pending link.
///
/// At most one link is pending per chat: submitting a new link before the
/// previous one is resolved silently replaces it. Consumption is
/// first-read-wins: [`PendingLinks::take`] removes the entry atomically with
/// the read, so two selection events racing on one chat cannot both start a
/// delivery for the same link.
#[derive(Default)]
pub struct PendingLinks {
    links: Mutex<HashMap<ChatId, String>>,
}

impl PendingLinks {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `link` for `chat_id`, replacing any pending link.
    pub async fn put(&self, chat_id: ChatId, link: String) {
        self.links.lock().await.insert(chat_id, link);
    }

    /// Removes and returns the pending link for `chat_id`, if any.
    pub async fn take(&self, chat_id: ChatId) -> Option<String> {
        self.links.lock().await.remove(&chat_id)
    }

    /// Removes the pending link for `chat_id`. No-op when absent.
    pub async fn clear(&self, chat_id: ChatId) {
        self.links.lock().await.remove(&chat_id);
    }

    /// Whether a link is pending for `chat_id`
    pub async fn contains(&self, chat_id: ChatId) -> bool {
        self.links.lock().await.contains_key(&chat_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: ChatId = ChatId(42);

    #[tokio::test]
    async fn test_take_clears_entry() {
        let store = PendingLinks::new();
        store.put(CHAT, "https://instagram.com/p/abc".to_string()).await;

        assert_eq!(
            store.take(CHAT).await.as_deref(),
            Some("https://instagram.com/p/abc")
        );
        assert!(store.take(CHAT).await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_pending_link() {
        let store = PendingLinks::new();
        store.put(CHAT, "https://instagram.com/p/old".to_string()).await;
        store.put(CHAT, "https://instagram.com/p/new".to_string()).await;

        assert_eq!(
            store.take(CHAT).await.as_deref(),
            Some("https://instagram.com/p/new")
        );
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = PendingLinks::new();
        store.clear(CHAT).await;

        store.put(CHAT, "https://instagram.com/p/abc".to_string()).await;
        store.clear(CHAT).await;
        store.clear(CHAT).await;
        assert!(!store.contains(CHAT).await);
    }

    #[tokio::test]
    async fn test_chats_are_independent() {
        let store = PendingLinks::new();
        store.put(ChatId(1), "https://instagram.com/p/one".to_string()).await;
        store.put(ChatId(2), "https://instagram.com/p/two".to_string()).await;

        assert_eq!(
            store.take(ChatId(1)).await.as_deref(),
            Some("https://instagram.com/p/one")
        );
        assert!(store.contains(ChatId(2)).await);
    }
}

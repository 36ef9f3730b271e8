//! Resolution and delivery pipeline
//!
//! One pipeline run covers a single chat's cycle: resolve the pending link,
//! dispatch every resolved URL in order with flood-limit pacing, then
//! observe the cool-down. The run is sequential by design; parallel dispatch
//! would defeat the pacing guarantee.

use std::sync::Arc;
use std::time::Duration;

use teloxide::types::ChatId;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::bot::outbound::MediaSink;
use crate::bot::selection::ContentChoice;
use crate::config::{COOL_DOWN_DELAY, PACING_DELAY};
use crate::resolver::{MediaResolver, ResolverError};

/// Caption attached to each item of a `Video` delivery
pub const VIDEO_CAPTION: &str = "Here's your video!";
/// Caption attached to each item of an `Image` delivery
pub const IMAGE_CAPTION: &str = "Here's your image!";

/// Resolves one link and relays the media into the chat.
pub struct DeliveryPipeline<R, S> {
    resolver: Arc<R>,
    sink: S,
    pacing: Duration,
    cool_down: Duration,
}

impl<R, S> DeliveryPipeline<R, S>
where
    R: MediaResolver,
    S: MediaSink,
{
    /// Creates a pipeline with the production pacing and cool-down delays.
    #[must_use]
    pub fn new(resolver: Arc<R>, sink: S) -> Self {
        Self::with_delays(resolver, sink, PACING_DELAY, COOL_DOWN_DELAY)
    }

    /// Creates a pipeline with explicit delays. Test constructor.
    #[must_use]
    pub fn with_delays(resolver: Arc<R>, sink: S, pacing: Duration, cool_down: Duration) -> Self {
        Self {
            resolver,
            sink,
            pacing,
            cool_down,
        }
    }

    /// Runs one full cycle for `chat_id` and returns the number of items
    /// delivered.
    ///
    /// Items are dispatched strictly in the order the resolver returned
    /// them, one pacing delay after each item and one cool-down after the
    /// full sequence. A failure on any item aborts the remainder.
    ///
    /// # Errors
    ///
    /// Returns the resolver or dispatch failure that ended the run. The run
    /// is terminal either way; the caller retries only by resubmitting.
    pub async fn deliver(
        &self,
        chat_id: ChatId,
        link: &str,
        choice: ContentChoice,
    ) -> Result<usize, ResolverError> {
        let urls = self.resolver.resolve(link).await?;
        debug!(%chat_id, count = urls.len(), "delivering resolved media");

        let mut delivered = 0usize;
        for url in &urls {
            self.dispatch_one(chat_id, url, choice).await?;
            delivered += 1;
            sleep(self.pacing).await;
        }

        sleep(self.cool_down).await;
        info!(%chat_id, delivered, "delivery cycle finished");
        Ok(delivered)
    }

    async fn dispatch_one(
        &self,
        chat_id: ChatId,
        url: &str,
        choice: ContentChoice,
    ) -> Result<(), ResolverError> {
        match choice {
            ContentChoice::Video => self.sink.send_video(chat_id, url, Some(VIDEO_CAPTION)).await,
            ContentChoice::Image => self.sink.send_photo(chat_id, url, Some(IMAGE_CAPTION)).await,
            // "Both" always uses the video shape, captionless. Kept as the
            // original behaves, not an oversight.
            ContentChoice::Both => self.sink.send_video(chat_id, url, None).await,
        }
    }
}

//! End-to-end checks of the relay cycle wired from the store, the pipeline
//! and the message classifier, with fake collaborators in place of the
//! resolver service and the Telegram API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use teloxide::types::ChatId;

use instra_bot::bot::messages::{self, StaticMessages, NOT_FOUND_TEXT, RATE_LIMITED_TEXT};
use instra_bot::bot::outbound::MediaSink;
use instra_bot::bot::pipeline::DeliveryPipeline;
use instra_bot::bot::selection::ContentChoice;
use instra_bot::bot::PendingLinks;
use instra_bot::resolver::{MediaResolver, ResolverError};

const CHAT: ChatId = ChatId(1234);

/// Counts invocations and answers with a fixed outcome.
struct CountingResolver {
    calls: AtomicUsize,
    outcome: fn() -> Result<Vec<String>, ResolverError>,
}

impl CountingResolver {
    fn with_outcome(outcome: fn() -> Result<Vec<String>, ResolverError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome,
        })
    }

    fn two_videos() -> Arc<Self> {
        Self::with_outcome(|| {
            Ok(vec![
                "https://cdn.example/0.mp4".to_string(),
                "https://cdn.example/1.mp4".to_string(),
            ])
        })
    }
}

#[async_trait]
impl MediaResolver for CountingResolver {
    async fn resolve(&self, _link: &str) -> Result<Vec<String>, ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }
}

#[derive(Default)]
struct RecordingSink {
    videos: Mutex<Vec<String>>,
    photos: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaSink for RecordingSink {
    async fn send_video(
        &self,
        _chat_id: ChatId,
        url: &str,
        _caption: Option<&str>,
    ) -> Result<(), ResolverError> {
        self.videos.lock().expect("sink lock").push(url.to_string());
        Ok(())
    }

    async fn send_photo(
        &self,
        _chat_id: ChatId,
        url: &str,
        _caption: Option<&str>,
    ) -> Result<(), ResolverError> {
        self.photos.lock().expect("sink lock").push(url.to_string());
        Ok(())
    }
}

fn pipeline<R: MediaResolver>(
    resolver: Arc<R>,
    sink: Arc<RecordingSink>,
) -> DeliveryPipeline<R, Arc<RecordingSink>> {
    DeliveryPipeline::with_delays(
        resolver,
        sink,
        Duration::from_millis(1),
        Duration::from_millis(2),
    )
}

#[tokio::test]
async fn successful_cycle_leaves_no_pending_link() {
    let links = PendingLinks::new();
    links
        .put(CHAT, "https://instagram.com/p/abc".to_string())
        .await;

    let resolver = CountingResolver::two_videos();
    let sink = Arc::new(RecordingSink::default());

    let link = links.take(CHAT).await.expect("pending link");
    let delivered = pipeline(resolver.clone(), sink.clone())
        .deliver(CHAT, &link, ContentChoice::Video)
        .await
        .expect("delivery");

    assert_eq!(delivered, 2);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    assert_eq!(sink.videos.lock().expect("sink lock").len(), 2);
    assert!(!links.contains(CHAT).await);
}

#[tokio::test]
async fn errored_cycle_leaves_no_pending_link() {
    let links = PendingLinks::new();
    links
        .put(CHAT, "https://instagram.com/p/gone".to_string())
        .await;

    let resolver = CountingResolver::with_outcome(|| Err(ResolverError::NotFound));
    let sink = Arc::new(RecordingSink::default());

    // take() consumes the link before the pipeline runs, so the store is
    // clean whatever the outcome
    let link = links.take(CHAT).await.expect("pending link");
    let err = pipeline(resolver, sink.clone())
        .deliver(CHAT, &link, ContentChoice::Image)
        .await
        .expect_err("resolution fails");

    assert_eq!(
        messages::for_failure(&err, CHAT, &StaticMessages).await,
        NOT_FOUND_TEXT
    );
    assert!(sink.photos.lock().expect("sink lock").is_empty());
    assert!(!links.contains(CHAT).await);
}

#[tokio::test]
async fn selection_without_pending_link_never_resolves() {
    let links = PendingLinks::new();
    let resolver = CountingResolver::with_outcome(|| Err(ResolverError::UpstreamError));

    // The handler only enters the pipeline when take() yields a link
    assert!(links.take(CHAT).await.is_none());
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn double_selection_runs_delivery_once() {
    let links = Arc::new(PendingLinks::new());
    links
        .put(CHAT, "https://instagram.com/p/abc".to_string())
        .await;

    // Two racing selection events both try to consume the link; exactly one
    // wins
    let first = links.take(CHAT).await;
    let second = links.take(CHAT).await;

    assert!(first.is_some());
    assert!(second.is_none());
}

#[tokio::test]
async fn newest_link_wins_after_resubmission() {
    let links = PendingLinks::new();
    links
        .put(CHAT, "https://instagram.com/p/first".to_string())
        .await;
    links
        .put(CHAT, "https://instagram.com/p/second".to_string())
        .await;

    assert_eq!(
        links.take(CHAT).await.as_deref(),
        Some("https://instagram.com/p/second")
    );
}

#[tokio::test]
async fn rate_limited_failure_maps_to_rate_limit_notice() {
    let resolver = CountingResolver::with_outcome(|| Err(ResolverError::RateLimited));
    let sink = Arc::new(RecordingSink::default());

    let err = pipeline(resolver, sink)
        .deliver(CHAT, "https://instagram.com/p/abc", ContentChoice::Both)
        .await
        .expect_err("rate limited");

    assert_eq!(
        messages::for_failure(&err, CHAT, &StaticMessages).await,
        RATE_LIMITED_TEXT
    );
}

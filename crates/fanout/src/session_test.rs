//! Tests for subscriber sessions

use super::*;
use crate::test_support::*;
use firetap_protocol::AuthorProfile;

fn session_with(
    filter: &str,
    enrich: bool,
    fetcher: StubFetcher,
) -> (Arc<Session>, Arc<CollectingSink>) {
    let sink = CollectingSink::new();
    let session = Session::new(
        SessionConfig {
            filter: filter.into(),
            interval: Duration::from_millis(1000),
            enrich,
        },
        cache_with(fetcher),
        Arc::clone(&sink) as Arc<dyn EventSink>,
    );
    (session, sink)
}

// ============================================================================
// Intake: filtering
// ============================================================================

#[tokio::test]
async fn non_matching_text_is_never_enqueued() {
    let (session, _sink) = session_with("launch", false, StubFetcher::empty());

    session.intake(&post_event("d1", "r1", "c1", "unrelated post"));
    assert_eq!(session.queue_len(), 0);
}

#[tokio::test]
async fn filter_match_is_case_insensitive() {
    let (session, _sink) = session_with("LAUNCH", false, StubFetcher::empty());

    session.intake(&post_event("d1", "r1", "c1", "we Launch today"));
    assert_eq!(session.queue_len(), 1);
}

#[tokio::test]
async fn empty_filter_matches_everything() {
    let (session, _sink) = session_with("", false, StubFetcher::empty());

    session.intake(&post_event("d1", "r1", "c1", "anything at all"));
    session.intake(&post_event("d2", "r2", "c2", "and this too"));
    assert_eq!(session.queue_len(), 2);
}

#[tokio::test]
async fn textless_event_is_ignored() {
    let (session, _sink) = session_with("", false, StubFetcher::empty());

    session.intake(&textless_event("d1"));
    assert_eq!(session.queue_len(), 0);
}

// ============================================================================
// Intake: projection and enrichment
// ============================================================================

#[tokio::test]
async fn enrichment_disabled_enqueues_without_author() {
    let (session, _sink) = session_with(
        "",
        false,
        StubFetcher::empty().with_profile(profile("d1", "h1")),
    );

    session.intake(&post_event("d1", "r1", "c1", "hello"));

    let queued = session.queue.lock().front().cloned().unwrap();
    assert!(queued.author.is_none());
}

#[tokio::test]
async fn queue_size_is_depth_before_append() {
    let (session, _sink) = session_with("", false, StubFetcher::empty());

    for i in 0..3 {
        session.intake(&post_event("d1", &format!("r{i}"), "c", "hello"));
    }

    let sizes: Vec<usize> = session
        .queue
        .lock()
        .iter()
        .map(|e| e.meta.queue_size)
        .collect();
    assert_eq!(sizes, vec![0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn launch_scenario_enriches_and_derives_permalink() {
    let (session, _sink) = session_with(
        "launch",
        true,
        StubFetcher::empty().with_profile(AuthorProfile {
            did: "d1".into(),
            handle: "h1".into(),
            display_name: Some("H1".into()),
            avatar: Some("a1".into()),
        }),
    );

    session.intake(&post_event("d1", "r1", "c1", "we launch today"));
    settle().await;

    let queue = session.queue.lock();
    assert_eq!(queue.len(), 1);
    let queued = queue.front().unwrap();
    assert_eq!(queued.url, "https://bsky.app/profile/d1/post/r1");
    assert_eq!(queued.author.as_ref().unwrap().handle, "h1");
}

#[tokio::test(start_paused = true)]
async fn enrichment_failure_still_enqueues_without_author() {
    // The stub has no profile for d2, so the lookup fails.
    let (session, _sink) = session_with("", true, StubFetcher::empty());

    session.intake(&post_event("d2", "r1", "c1", "hello"));
    settle().await;

    let queue = session.queue.lock();
    assert_eq!(queue.len(), 1);
    assert!(queue.front().unwrap().author.is_none());
}

#[tokio::test(start_paused = true)]
async fn enrichment_resolving_after_teardown_is_discarded() {
    let fetcher = StubFetcher::empty()
        .with_profile(profile("d1", "h1"))
        .with_delay(Duration::from_millis(50));
    let (session, sink) = session_with("", true, fetcher);

    session.intake(&post_event("d1", "r1", "c1", "hello"));
    session.shutdown();

    tokio::time::advance(Duration::from_millis(100)).await;
    settle().await;

    assert_eq!(session.queue_len(), 0);
    assert_eq!(sink.len(), 0);
    assert_eq!(session.counters().0, 0, "nothing may enqueue after teardown");
}

// ============================================================================
// Delivery
// ============================================================================

#[tokio::test(start_paused = true)]
async fn delivery_drains_one_event_per_tick_in_fifo_order() {
    let (session, sink) = session_with("", false, StubFetcher::empty());

    session.intake(&post_event("d1", "r1", "c1", "first"));
    session.intake(&post_event("d1", "r2", "c2", "second"));
    tokio::spawn(Arc::clone(&session).run_delivery());

    tokio::time::advance(Duration::from_millis(1000)).await;
    settle().await;
    assert_eq!(sink.texts(), vec!["first"]);

    tokio::time::advance(Duration::from_millis(1000)).await;
    settle().await;
    assert_eq!(sink.texts(), vec!["first", "second"]);

    // Empty queue: a tick delivers nothing.
    tokio::time::advance(Duration::from_millis(1000)).await;
    settle().await;
    assert_eq!(sink.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn delivery_respects_the_configured_interval() {
    let sink = CollectingSink::new();
    let session = Session::new(
        SessionConfig {
            filter: String::new(),
            interval: Duration::from_millis(250),
            enrich: false,
        },
        cache_with(StubFetcher::empty()),
        Arc::clone(&sink) as Arc<dyn EventSink>,
    );

    for i in 0..4 {
        session.intake(&post_event("d1", &format!("r{i}"), "c", "hi"));
    }
    tokio::spawn(Arc::clone(&session).run_delivery());

    // Advance one interval at a time: a single 500ms jump would make the
    // first tick fire late, and MissedTickBehavior::Delay then pushes the
    // second tick past the window.
    tokio::time::advance(Duration::from_millis(250)).await;
    settle().await;
    tokio::time::advance(Duration::from_millis(250)).await;
    settle().await;
    assert_eq!(sink.len(), 2, "two ticks drain exactly two events");
}

#[tokio::test(start_paused = true)]
async fn teardown_stops_intake_and_delivery() {
    let (session, sink) = session_with("", false, StubFetcher::empty());

    session.intake(&post_event("d1", "r1", "c1", "queued then dropped"));
    tokio::spawn(Arc::clone(&session).run_delivery());

    session.shutdown();

    // Intake after teardown is a no-op.
    session.intake(&post_event("d1", "r2", "c2", "late"));
    assert_eq!(session.queue_len(), 0);

    // The timer never writes to the sink again.
    tokio::time::advance(Duration::from_millis(3000)).await;
    settle().await;
    assert_eq!(sink.len(), 0, "queued items are discarded, not flushed");
}

#[tokio::test]
async fn shutdown_is_idempotent() {
    let (session, _sink) = session_with("", false, StubFetcher::empty());
    session.shutdown();
    session.shutdown();
    assert!(!session.is_live());
}

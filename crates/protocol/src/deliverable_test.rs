//! Tests for the deliverable projection

use super::*;
use crate::event::RawEvent;

fn post_event(did: &str, rkey: &str, cid: &str, text: &str, created_at: &str) -> RawEvent {
    let frame = serde_json::json!({
        "did": did,
        "kind": "commit",
        "commit": {
            "collection": "app.bsky.feed.post",
            "rkey": rkey,
            "cid": cid,
            "record": { "text": text, "createdAt": created_at }
        }
    });
    RawEvent::decode(&frame.to_string()).unwrap()
}

#[test]
fn projects_post_fields_and_permalink() {
    let event = post_event("d1", "r1", "c1", "we launch today", "t1");
    let deliverable = DeliverableEvent::from_raw(&event, 3).unwrap();

    assert_eq!(deliverable.id, "r1");
    assert_eq!(deliverable.cid, "c1");
    assert_eq!(deliverable.text, "we launch today");
    assert_eq!(deliverable.created_at, "t1");
    assert_eq!(deliverable.did, "d1");
    assert_eq!(deliverable.url, "https://bsky.app/profile/d1/post/r1");
    assert_eq!(deliverable.meta.queue_size, 3);
    assert!(deliverable.author.is_none());
}

#[test]
fn textless_event_does_not_project() {
    let frame = r#"{"did":"d1","kind":"identity"}"#;
    let event = RawEvent::decode(frame).unwrap();
    assert!(DeliverableEvent::from_raw(&event, 0).is_none());
}

#[test]
fn serializes_wire_field_names() {
    let event = post_event("d1", "r1", "c1", "hello", "2024-09-09T19:46:02.102Z");
    let deliverable = DeliverableEvent::from_raw(&event, 2).unwrap();

    let value = serde_json::to_value(&deliverable).unwrap();
    assert_eq!(value["id"], "r1");
    assert_eq!(value["cid"], "c1");
    assert_eq!(value["text"], "hello");
    assert_eq!(value["createdAt"], "2024-09-09T19:46:02.102Z");
    assert_eq!(value["url"], "https://bsky.app/profile/d1/post/r1");
    assert_eq!(value["did"], "d1");
    assert_eq!(value["meta"]["queueSize"], 2);

    // No author field at all when enrichment did not attach one.
    assert!(value.get("author").is_none());
}

#[test]
fn serializes_author_sub_object() {
    let event = post_event("d1", "r1", "c1", "hello", "t1");
    let deliverable = DeliverableEvent::from_raw(&event, 0)
        .unwrap()
        .with_author(AuthorProfile {
            did: "d1".into(),
            handle: "h1".into(),
            display_name: Some("H1".into()),
            avatar: Some("a1".into()),
        });

    let value = serde_json::to_value(&deliverable).unwrap();
    assert_eq!(value["author"]["did"], "d1");
    assert_eq!(value["author"]["handle"], "h1");
    assert_eq!(value["author"]["displayName"], "H1");
    assert_eq!(value["author"]["avatar"], "a1");
}

#[test]
fn permalink_template() {
    assert_eq!(
        post_url("did:plc:abc", "3l3qo"),
        "https://bsky.app/profile/did:plc:abc/post/3l3qo"
    );
}

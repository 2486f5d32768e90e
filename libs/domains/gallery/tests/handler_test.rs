//! HTTP tests for the gallery route.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use domain_events::{Event, EventRepository, EventService, InMemoryEventRepository, LinkBuilder};
use domain_gallery::*;
use domain_uploads::{EventRecord, InMemoryRecordRepository, RecordContent, RecordRepository};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

async fn send(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn photo(event_id: Uuid, name: &str, group: Option<Uuid>, age_secs: i64) -> EventRecord {
    let mut record = EventRecord::new(
        event_id,
        RecordContent::photo(
            format!("http://localhost:8080/api/blobs/{}/1-{}", event_id, name),
            format!("{}/1-{}", event_id, name),
            None,
        ),
    )
    .with_group(group);
    record.uploaded_at = Utc::now() - Duration::seconds(age_secs);
    record
}

async fn app() -> (axum::Router, Uuid, Uuid) {
    let events = InMemoryEventRepository::new();
    let event = Event {
        id: Uuid::new_v4(),
        title: "Ana's Party".into(),
        description: "Cake".into(),
        date: "2025-06-01".into(),
        location: "Lisbon".into(),
        event_type: "Birthday Party".into(),
        custom_event_type: None,
        created_at: Utc::now(),
        owner_user_id: Uuid::new_v4(),
    };
    let event_id = event.id;
    events.create(event).await.unwrap();

    let group = Uuid::new_v4();
    let records = InMemoryRecordRepository::new();
    records.create(photo(event_id, "a.jpg", Some(group), 30)).await.unwrap();
    records.create(photo(event_id, "b.jpg", Some(group), 20)).await.unwrap();
    records.create(photo(event_id, "c.jpg", None, 10)).await.unwrap();
    records
        .create(EventRecord::new(
            event_id,
            RecordContent::Message {
                text: "Congrats!".into(),
            },
        ))
        .await
        .unwrap();

    let events = Arc::new(EventService::new(events, LinkBuilder::new("http://localhost:3000")));
    let service = Arc::new(GalleryService::new(events, records));
    (handlers::router(service), event_id, group)
}

#[tokio::test]
async fn test_gallery_partitions_and_groups() {
    let (router, event_id, group) = app().await;

    let (status, body) = send(router, &format!("/{}/gallery", event_id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["title"], "Ana's Party");
    assert_eq!(
        body["event"]["links"]["galleryUrl"],
        format!("http://localhost:3000/events/{}/gallery", event_id)
    );

    let images = body["images"].as_array().unwrap();
    assert_eq!(images.len(), 3);
    assert!(images[0]["fileName"].as_str().unwrap().ends_with("c.jpg"));
    assert_eq!(body["messages"][0]["message"], "Congrats!");

    let groups = body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["id"], images[0]["id"]);
    assert_eq!(groups[1]["id"], group.to_string());
    assert_eq!(groups[1]["recordIds"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_gallery_unknown_event() {
    let (router, _, _) = app().await;

    let (status, body) = send(router.clone(), &format!("/{}/gallery", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) = send(router, "/nope/gallery").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

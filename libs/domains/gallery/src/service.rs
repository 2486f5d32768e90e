use domain_events::{EventRepository, EventService};
use domain_uploads::RecordRepository;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::GalleryResult;
use crate::model::Gallery;

/// Read side of an event: the event with its links and every record
pub struct GalleryService<E: EventRepository, R: RecordRepository> {
    events: Arc<EventService<E>>,
    records: R,
}

impl<E: EventRepository, R: RecordRepository> GalleryService<E, R> {
    pub fn new(events: Arc<EventService<E>>, records: R) -> Self {
        Self { events, records }
    }

    #[instrument(skip(self))]
    pub async fn load(&self, event_id: Uuid) -> GalleryResult<Gallery> {
        let event = self.events.get(event_id).await?;
        let records = self.records.list_for_event(event_id).await?;
        tracing::debug!(records = records.len(), "Gallery loaded");
        Ok(Gallery::new(event, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalleryError;
    use chrono::Utc;
    use domain_events::{Event, InMemoryEventRepository, LinkBuilder};
    use domain_uploads::{EventRecord, InMemoryRecordRepository, RecordContent, UploadError};
    use mockall::mock;

    mock! {
        Records {}

        #[async_trait::async_trait]
        impl RecordRepository for Records {
            async fn create(&self, record: EventRecord) -> domain_uploads::UploadResult<EventRecord>;
            async fn list_for_event(&self, event_id: Uuid) -> domain_uploads::UploadResult<Vec<EventRecord>>;
        }
    }

    async fn events_with_one() -> (Arc<EventService<InMemoryEventRepository>>, Uuid) {
        let repository = InMemoryEventRepository::new();
        let event = Event {
            id: Uuid::new_v4(),
            title: "Party".into(),
            description: "d".into(),
            date: "2025-06-01".into(),
            location: "l".into(),
            event_type: "Birthday Party".into(),
            custom_event_type: None,
            created_at: Utc::now(),
            owner_user_id: Uuid::new_v4(),
        };
        let id = event.id;
        repository.create(event).await.unwrap();
        let service = EventService::new(repository, LinkBuilder::new("http://localhost:3000"));
        (Arc::new(service), id)
    }

    #[tokio::test]
    async fn test_load_partitions_and_groups() {
        let (events, event_id) = events_with_one().await;
        let records = InMemoryRecordRepository::new();
        let group = Uuid::new_v4();
        for name in ["a.jpg", "b.jpg"] {
            records
                .create(
                    EventRecord::new(
                        event_id,
                        RecordContent::photo(format!("http://x/{}", name), name.into(), None),
                    )
                    .with_group(Some(group)),
                )
                .await
                .unwrap();
        }
        records
            .create(EventRecord::new(
                event_id,
                RecordContent::Message {
                    text: "Congrats!".into(),
                },
            ))
            .await
            .unwrap();

        let gallery = GalleryService::new(events, records).load(event_id).await.unwrap();

        assert_eq!(gallery.event.event.id, event_id);
        assert_eq!(gallery.images.len(), 2);
        assert_eq!(gallery.messages.len(), 1);
        assert_eq!(gallery.groups.len(), 1);
        assert_eq!(gallery.groups[0].id, group);
    }

    #[tokio::test]
    async fn test_load_unknown_event() {
        let (events, _) = events_with_one().await;
        let mut records = MockRecords::new();
        records.expect_list_for_event().never();

        let missing = Uuid::new_v4();
        let result = GalleryService::new(events, records).load(missing).await;

        assert!(matches!(result, Err(GalleryError::EventNotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn test_load_surfaces_record_query_failure() {
        let (events, event_id) = events_with_one().await;
        let mut records = MockRecords::new();
        records
            .expect_list_for_event()
            .returning(|_| Err(UploadError::Database("connection reset".into())));

        let result = GalleryService::new(events, records).load(event_id).await;

        assert!(matches!(result, Err(GalleryError::Records(_))));
    }
}

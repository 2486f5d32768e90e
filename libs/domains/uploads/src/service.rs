//! Upload service - blob then record, per image or message

use async_trait::async_trait;
use chrono::Utc;
use domain_events::EventRepository;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::blob::{BlobStore, StoredBlob, blob_path};
use crate::error::{UploadError, UploadResult};
use crate::models::{EventRecord, LocalFile, RecordContent};
use crate::repository::RecordRepository;

/// Operations the upload session drives
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadBackend: Send + Sync {
    /// Store one image and write its record (`Combined` when captioned)
    async fn upload_image(
        &self,
        event_id: Uuid,
        file: LocalFile,
        caption: Option<String>,
        group_id: Option<Uuid>,
    ) -> UploadResult<EventRecord>;

    /// Write a text-only record
    async fn post_message(&self, event_id: Uuid, text: String) -> UploadResult<EventRecord>;
}

pub struct UploadService<E: EventRepository, R: RecordRepository> {
    events: E,
    records: R,
    blobs: Arc<dyn BlobStore>,
}

impl<E: EventRepository, R: RecordRepository> UploadService<E, R> {
    pub fn new(events: E, records: R, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            events,
            records,
            blobs,
        }
    }

    pub async fn ensure_event(&self, event_id: Uuid) -> UploadResult<()> {
        match self.events.get_by_id(event_id).await? {
            Some(_) => Ok(()),
            None => Err(UploadError::EventNotFound(event_id)),
        }
    }

    /// Records of an existing event, newest first
    #[instrument(skip(self))]
    pub async fn list_records(&self, event_id: Uuid) -> UploadResult<Vec<EventRecord>> {
        self.ensure_event(event_id).await?;
        self.records.list_for_event(event_id).await
    }

    pub async fn get_blob(&self, path: &str) -> UploadResult<StoredBlob> {
        self.blobs
            .get(path)
            .await?
            .ok_or_else(|| UploadError::BlobNotFound(path.to_string()))
    }
}

#[async_trait]
impl<E, R> UploadBackend for UploadService<E, R>
where
    E: EventRepository,
    R: RecordRepository,
{
    #[instrument(skip(self, file, caption), fields(file_name = %file.file_name, size = file.bytes.len()))]
    async fn upload_image(
        &self,
        event_id: Uuid,
        file: LocalFile,
        caption: Option<String>,
        group_id: Option<Uuid>,
    ) -> UploadResult<EventRecord> {
        if !file.is_image() {
            return Err(UploadError::UnsupportedContentType(file.content_type));
        }
        if file.bytes.is_empty() {
            return Err(UploadError::EmptyFile(file.file_name));
        }
        self.ensure_event(event_id).await?;

        let record_id = Uuid::now_v7();
        let path = blob_path(
            event_id,
            Utc::now().timestamp_millis(),
            record_id,
            &file.file_name,
        );
        let blob = self
            .blobs
            .put(&path, file.bytes, &file.content_type)
            .await?;

        let caption = caption
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let record = EventRecord::new(event_id, RecordContent::photo(blob.url, blob.path, caption))
            .with_id(record_id)
            .with_group(group_id);

        let record = self.records.create(record).await?;
        tracing::info!(record_id = %record.id, kind = %record.kind(), "Photo uploaded");
        Ok(record)
    }

    #[instrument(skip(self, text))]
    async fn post_message(&self, event_id: Uuid, text: String) -> UploadResult<EventRecord> {
        let text = text.trim();
        if text.is_empty() {
            return Err(UploadError::EmptyMessage);
        }
        self.ensure_event(event_id).await?;

        let record = EventRecord::new(
            event_id,
            RecordContent::Message {
                text: text.to_string(),
            },
        );
        let record = self.records.create(record).await?;
        tracing::info!(record_id = %record.id, "Message posted");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::{BlobUrls, InMemoryBlobStore, MockBlobStore};
    use crate::models::RecordKind;
    use crate::repository::InMemoryRecordRepository;
    use crate::repository::mock::MockRecordRepository;
    use domain_events::{Event, InMemoryEventRepository};

    async fn seeded_events() -> (InMemoryEventRepository, Uuid) {
        let events = InMemoryEventRepository::new();
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
        events.create(event).await.unwrap();
        (events, id)
    }

    fn jpeg(name: &str) -> LocalFile {
        LocalFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
    }

    fn blobs() -> Arc<InMemoryBlobStore> {
        Arc::new(InMemoryBlobStore::new(BlobUrls::new("http://localhost:8080")))
    }

    #[tokio::test]
    async fn test_upload_image_writes_blob_then_record() {
        let (events, event_id) = seeded_events().await;
        let records = InMemoryRecordRepository::new();
        let blobs = blobs();
        let service = UploadService::new(events, records.clone(), blobs.clone());

        let record = service
            .upload_image(event_id, jpeg("beach.jpg"), None, None)
            .await
            .unwrap();

        assert_eq!(record.kind(), RecordKind::Image);
        let file_name = record.file_name().unwrap();
        assert!(file_name.starts_with(&format!("{}/", event_id)));
        assert!(file_name.ends_with(&format!("-{}-beach.jpg", record.id)));
        assert_eq!(
            record.url().unwrap(),
            format!("http://localhost:8080/api/blobs/{}", file_name)
        );
        assert_eq!(blobs.len().await, 1);
        assert_eq!(records.list_for_event(event_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_caption_makes_combined_record() {
        let (events, event_id) = seeded_events().await;
        let service = UploadService::new(events, InMemoryRecordRepository::new(), blobs());

        let group = Uuid::new_v4();
        let record = service
            .upload_image(event_id, jpeg("a.jpg"), Some("  Happy birthday! ".into()), Some(group))
            .await
            .unwrap();

        assert_eq!(record.kind(), RecordKind::Combined);
        assert_eq!(record.message(), Some("Happy birthday!"));
        assert_eq!(record.group_id, Some(group));

        let blank = service
            .upload_image(event_id, jpeg("b.jpg"), Some("   ".into()), None)
            .await
            .unwrap();
        assert_eq!(blank.kind(), RecordKind::Image);
    }

    #[tokio::test]
    async fn test_rejects_non_images_and_unknown_events() {
        let (events, event_id) = seeded_events().await;
        let service = UploadService::new(events, InMemoryRecordRepository::new(), blobs());

        let pdf = LocalFile::new("doc.pdf", "application/pdf", vec![1u8]);
        assert!(matches!(
            service.upload_image(event_id, pdf, None, None).await,
            Err(UploadError::UnsupportedContentType(_))
        ));

        let missing = Uuid::new_v4();
        assert!(matches!(
            service.upload_image(missing, jpeg("a.jpg"), None, None).await,
            Err(UploadError::EventNotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn test_blob_failure_writes_no_record() {
        let (events, event_id) = seeded_events().await;
        let mut blobs = MockBlobStore::new();
        blobs
            .expect_put()
            .returning(|_, _, _| Err(UploadError::Blob("disk full".into())));
        let mut records = MockRecordRepository::new();
        records.expect_create().never();

        let service = UploadService::new(events, records, Arc::new(blobs));
        let result = service
            .upload_image(event_id, jpeg("a.jpg"), None, None)
            .await;

        assert!(matches!(result, Err(UploadError::Blob(_))));
    }

    #[tokio::test]
    async fn test_post_message() {
        let (events, event_id) = seeded_events().await;
        let records = InMemoryRecordRepository::new();
        let service = UploadService::new(events, records.clone(), blobs());

        let record = service
            .post_message(event_id, " Congrats! ".into())
            .await
            .unwrap();
        assert_eq!(record.kind(), RecordKind::Message);
        assert_eq!(record.message(), Some("Congrats!"));
        assert!(record.url().is_none());

        assert!(matches!(
            service.post_message(event_id, "  ".into()).await,
            Err(UploadError::EmptyMessage)
        ));
        assert_eq!(records.list_for_event(event_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_blob_missing() {
        let (events, _) = seeded_events().await;
        let service = UploadService::new(events, InMemoryRecordRepository::new(), blobs());

        assert!(matches!(
            service.get_blob("nope/1-a.jpg").await,
            Err(UploadError::BlobNotFound(_))
        ));
    }
}

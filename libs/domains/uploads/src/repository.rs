//! Event record repository trait

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::UploadResult;
use crate::models::EventRecord;

/// Records are append-only: created once, read many times
#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn create(&self, record: EventRecord) -> UploadResult<EventRecord>;

    /// All records of an event, newest `uploaded_at` first
    async fn list_for_event(&self, event_id: Uuid) -> UploadResult<Vec<EventRecord>>;
}

#[async_trait]
impl<R: RecordRepository + ?Sized> RecordRepository for Arc<R> {
    async fn create(&self, record: EventRecord) -> UploadResult<EventRecord> {
        (**self).create(record).await
    }

    async fn list_for_event(&self, event_id: Uuid) -> UploadResult<Vec<EventRecord>> {
        (**self).list_for_event(event_id).await
    }
}

/// In-memory implementation of RecordRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordRepository {
    records: Arc<RwLock<Vec<EventRecord>>>,
}

impl InMemoryRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn create(&self, record: EventRecord) -> UploadResult<EventRecord> {
        self.records.write().await.push(record.clone());
        tracing::debug!(
            record_id = %record.id,
            event_id = %record.event_id,
            kind = %record.kind(),
            "Stored record"
        );
        Ok(record)
    }

    async fn list_for_event(&self, event_id: Uuid) -> UploadResult<Vec<EventRecord>> {
        let records = self.records.read().await;
        let mut found: Vec<EventRecord> = records
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(found)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordContent;
    use chrono::{Duration, Utc};

    fn message(event_id: Uuid, text: &str, age_secs: i64) -> EventRecord {
        let mut record = EventRecord::new(event_id, RecordContent::Message { text: text.into() });
        record.uploaded_at = Utc::now() - Duration::seconds(age_secs);
        record
    }

    #[tokio::test]
    async fn test_list_for_event_newest_first_and_scoped() {
        let repo = InMemoryRecordRepository::new();
        let event_id = Uuid::new_v4();

        repo.create(message(event_id, "first", 60)).await.unwrap();
        repo.create(message(event_id, "latest", 1)).await.unwrap();
        repo.create(message(Uuid::new_v4(), "elsewhere", 0))
            .await
            .unwrap();

        let texts: Vec<String> = repo
            .list_for_event(event_id)
            .await
            .unwrap()
            .iter()
            .filter_map(|r| r.message().map(str::to_string))
            .collect();
        assert_eq!(texts, vec!["latest", "first"]);
    }
}

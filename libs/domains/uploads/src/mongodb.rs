//! MongoDB implementation of RecordRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UploadError, UploadResult};
use crate::models::{EventRecord, FlatRecord, RecordKind};
use crate::repository::RecordRepository;

/// Stored flat record: string ids, BSON timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub event_id: String,
    pub uploaded_at: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: RecordKind,
}

impl From<&EventRecord> for RecordDocument {
    fn from(record: &EventRecord) -> Self {
        let flat = FlatRecord::from(record.clone());
        Self {
            id: flat.id.to_string(),
            event_id: flat.event_id.to_string(),
            uploaded_at: bson::DateTime::from_millis(flat.uploaded_at.timestamp_millis()),
            group_id: flat.group_id.map(|g| g.to_string()),
            url: flat.url,
            message: flat.message,
            file_name: flat.file_name,
            kind: flat.kind,
        }
    }
}

impl TryFrom<RecordDocument> for EventRecord {
    type Error = UploadError;

    fn try_from(doc: RecordDocument) -> Result<Self, Self::Error> {
        let uploaded_at = DateTime::<Utc>::from_timestamp_millis(doc.uploaded_at.timestamp_millis())
            .ok_or_else(|| {
                UploadError::InvalidRecord(format!("record {}: bad uploadedAt", doc.id))
            })?;

        let flat = FlatRecord {
            id: parse_uuid(&doc.id)?,
            event_id: parse_uuid(&doc.event_id)?,
            uploaded_at,
            group_id: doc.group_id.as_deref().map(parse_uuid).transpose()?,
            url: doc.url,
            message: doc.message,
            file_name: doc.file_name,
            kind: doc.kind,
        };

        EventRecord::try_from(flat)
    }
}

fn parse_uuid(raw: &str) -> UploadResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| UploadError::InvalidRecord(format!("'{}': {}", raw, e)))
}

/// MongoDB-based record repository
#[derive(Clone)]
pub struct MongoRecordRepository {
    collection: Collection<RecordDocument>,
}

impl MongoRecordRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("event_records"),
        }
    }

    pub async fn create_indexes(&self) -> UploadResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "eventId": 1, "uploadedAt": -1 })
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordRepository for MongoRecordRepository {
    #[instrument(skip(self, record), fields(record_id = %record.id, event_id = %record.event_id))]
    async fn create(&self, record: EventRecord) -> UploadResult<EventRecord> {
        self.collection
            .insert_one(RecordDocument::from(&record))
            .await?;
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn list_for_event(&self, event_id: Uuid) -> UploadResult<Vec<EventRecord>> {
        let options = FindOptions::builder()
            .sort(doc! { "uploadedAt": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "eventId": event_id.to_string() })
            .with_options(options)
            .await?;
        let documents: Vec<RecordDocument> = cursor.try_collect().await?;

        // Corrupt documents are skipped, not fatal
        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            match EventRecord::try_from(document) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(error = %e, "Skipping invalid record"),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordContent;

    #[test]
    fn test_document_keeps_flat_fields() {
        let record = EventRecord::new(
            Uuid::new_v4(),
            RecordContent::photo("http://x/u".into(), "e/1-a.jpg".into(), None),
        )
        .with_group(Some(Uuid::new_v4()));

        let document = bson::to_document(&RecordDocument::from(&record)).unwrap();
        assert_eq!(document.get_str("type").unwrap(), "image");
        assert_eq!(document.get_str("fileName").unwrap(), "e/1-a.jpg");
        assert!(document.get("message").is_none());
        assert!(document.get_datetime("uploadedAt").is_ok());

        let restored = EventRecord::try_from(RecordDocument::from(&record)).unwrap();
        assert_eq!(restored.content, record.content);
        assert_eq!(restored.group_id, record.group_id);
    }

    #[test]
    fn test_document_violating_type_rejected() {
        let record = EventRecord::new(
            Uuid::new_v4(),
            RecordContent::Message {
                text: "hello".into(),
            },
        );
        let mut document = RecordDocument::from(&record);
        document.url = Some("http://x/u".into());

        assert!(matches!(
            EventRecord::try_from(document),
            Err(UploadError::InvalidRecord(_))
        ));
    }
}

//! MongoDB implementation of EventRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::Event;
use crate::repository::EventRepository;

/// Stored shape of an event: string ids, BSON timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_event_type: Option<String>,
    pub created_at: bson::DateTime,
    pub owner_user_id: String,
}

impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date.clone(),
            location: event.location.clone(),
            event_type: event.event_type.clone(),
            custom_event_type: event.custom_event_type.clone(),
            created_at: to_bson_datetime(event.created_at),
            owner_user_id: event.owner_user_id.to_string(),
        }
    }
}

impl TryFrom<EventDocument> for Event {
    type Error = EventError;

    fn try_from(doc: EventDocument) -> Result<Self, Self::Error> {
        let id = parse_uuid("_id", &doc.id)?;
        let owner_user_id = parse_uuid("ownerUserId", &doc.owner_user_id)?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(doc.created_at.timestamp_millis())
            .ok_or_else(|| {
                EventError::CorruptDocument(format!("createdAt out of range: {}", doc.created_at))
            })?;

        Ok(Event {
            id,
            title: doc.title,
            description: doc.description,
            date: doc.date,
            location: doc.location,
            event_type: doc.event_type,
            custom_event_type: doc.custom_event_type,
            created_at,
            owner_user_id,
        })
    }
}

fn parse_uuid(field: &str, raw: &str) -> EventResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| EventError::CorruptDocument(format!("{} '{}': {}", field, raw, e)))
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

/// MongoDB-based event repository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("events"),
        }
    }

    /// Owner list query runs on `ownerUserId` then `createdAt` descending
    pub async fn create_indexes(&self) -> EventResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "ownerUserId": 1, "createdAt": -1 })
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn create(&self, event: Event) -> EventResult<Event> {
        self.collection
            .insert_one(EventDocument::from(&event))
            .await?;
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        let found = self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await?;
        found.map(Event::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_owner(&self, owner_user_id: Uuid) -> EventResult<Vec<Event>> {
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "ownerUserId": owner_user_id.to_string() })
            .with_options(options)
            .await?;
        let documents: Vec<EventDocument> = cursor.try_collect().await?;

        documents.into_iter().map(Event::try_from).collect()
    }
}

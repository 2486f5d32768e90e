//! Event records and their flat wire form

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::UploadError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
    Image,
    Message,
    Combined,
}

/// What a guest left: a photo, a message, or a photo with a caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordContent {
    Image { url: String, file_name: String },
    Message { text: String },
    Combined { url: String, file_name: String, text: String },
}

impl RecordContent {
    /// Image, or captioned image when `caption` is present
    pub fn photo(url: String, file_name: String, caption: Option<String>) -> Self {
        match caption {
            Some(text) => RecordContent::Combined {
                url,
                file_name,
                text,
            },
            None => RecordContent::Image { url, file_name },
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            RecordContent::Image { .. } => RecordKind::Image,
            RecordContent::Message { .. } => RecordKind::Message,
            RecordContent::Combined { .. } => RecordKind::Combined,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            RecordContent::Image { url, .. } | RecordContent::Combined { url, .. } => Some(url),
            RecordContent::Message { .. } => None,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            RecordContent::Image { file_name, .. } | RecordContent::Combined { file_name, .. } => {
                Some(file_name)
            }
            RecordContent::Message { .. } => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            RecordContent::Message { text } | RecordContent::Combined { text, .. } => Some(text),
            RecordContent::Image { .. } => None,
        }
    }
}

/// One upload scoped under an event. Never mutated after creation.
///
/// Serializes to the flat [`FlatRecord`] shape; deserializing rejects
/// flat records whose fields disagree with their `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FlatRecord", into = "FlatRecord")]
pub struct EventRecord {
    pub id: Uuid,
    pub event_id: Uuid,
    pub uploaded_at: DateTime<Utc>,
    /// Shared by the photos of one upload batch
    pub group_id: Option<Uuid>,
    pub content: RecordContent,
}

impl EventRecord {
    pub fn new(event_id: Uuid, content: RecordContent) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_id,
            uploaded_at: Utc::now(),
            group_id: None,
            content,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_group(mut self, group_id: Option<Uuid>) -> Self {
        self.group_id = group_id;
        self
    }

    pub fn kind(&self) -> RecordKind {
        self.content.kind()
    }

    pub fn url(&self) -> Option<&str> {
        self.content.url()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.content.file_name()
    }

    pub fn message(&self) -> Option<&str> {
        self.content.text()
    }
}

/// Legacy flat record: optional `url`, `message`, `fileName` plus `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = EventRecord)]
pub struct FlatRecord {
    pub id: Uuid,
    pub event_id: Uuid,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: RecordKind,
}

impl From<EventRecord> for FlatRecord {
    fn from(record: EventRecord) -> Self {
        let kind = record.kind();
        let (url, file_name, message) = match record.content {
            RecordContent::Image { url, file_name } => (Some(url), Some(file_name), None),
            RecordContent::Message { text } => (None, None, Some(text)),
            RecordContent::Combined {
                url,
                file_name,
                text,
            } => (Some(url), Some(file_name), Some(text)),
        };

        Self {
            id: record.id,
            event_id: record.event_id,
            uploaded_at: record.uploaded_at,
            group_id: record.group_id,
            url,
            message,
            file_name,
            kind,
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<FlatRecord> for EventRecord {
    type Error = UploadError;

    fn try_from(flat: FlatRecord) -> Result<Self, Self::Error> {
        let url = present(flat.url);
        let file_name = present(flat.file_name);
        let message = present(flat.message);

        let content = match (flat.kind, url, file_name, message) {
            (RecordKind::Image, Some(url), Some(file_name), None) => {
                RecordContent::Image { url, file_name }
            }
            (RecordKind::Message, None, None, Some(text)) => RecordContent::Message { text },
            (RecordKind::Combined, Some(url), Some(file_name), Some(text)) => {
                RecordContent::Combined {
                    url,
                    file_name,
                    text,
                }
            }
            (kind, url, file_name, message) => {
                return Err(UploadError::InvalidRecord(format!(
                    "record {} of type {} has url={}, fileName={}, message={}",
                    flat.id,
                    kind,
                    url.is_some(),
                    file_name.is_some(),
                    message.is_some()
                )));
            }
        };

        Ok(EventRecord {
            id: flat.id,
            event_id: flat.event_id,
            uploaded_at: flat.uploaded_at,
            group_id: flat.group_id,
            content,
        })
    }
}

/// A file picked on the guest's device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl LocalFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        is_image_content_type(&self.content_type)
    }
}

pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}

/// Body of `POST /events/{id}/messages`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PostMessage {
    pub text: String,
}

/// One file the HTTP upload could not store
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailedUpload {
    pub file_name: String,
    pub error: String,
}

/// Result of a multipart upload request
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadOutcome {
    #[schema(value_type = Vec<FlatRecord>)]
    pub records: Vec<EventRecord>,
    pub failed: Vec<FailedUpload>,
}

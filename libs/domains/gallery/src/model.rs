//! Gallery shape: image/text partition and image grouping

use domain_events::EventView;
use domain_uploads::{EventRecord, FlatRecord};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Records split the way the gallery renders them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Records with an image, captioned or not
    pub images: Vec<EventRecord>,
    /// Text-only records
    pub messages: Vec<EventRecord>,
}

/// Split records into image and text-only lists, keeping their order.
pub fn partition(records: Vec<EventRecord>) -> Partition {
    let mut out = Partition::default();
    for record in records {
        if record.url().is_some_and(|u| !u.is_empty()) {
            out.images.push(record);
        } else if record.message().is_some_and(|m| !m.is_empty()) {
            out.messages.push(record);
        }
    }
    out
}

/// Images uploaded together, or a single image on its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageGroup {
    /// The shared group id, or the record id for a singleton
    pub id: Uuid,
    pub record_ids: Vec<Uuid>,
}

/// Group image records by `group_id`, falling back to the record's own id.
/// Groups come out in order of first appearance.
pub fn group_images(images: &[EventRecord]) -> Vec<ImageGroup> {
    let mut groups: Vec<ImageGroup> = Vec::new();
    for record in images {
        let key = record.group_id.unwrap_or(record.id);
        match groups.iter_mut().find(|g| g.id == key) {
            Some(group) => group.record_ids.push(record.id),
            None => groups.push(ImageGroup {
                id: key,
                record_ids: vec![record.id],
            }),
        }
    }
    groups
}

/// A loaded event gallery
#[derive(Debug, Clone)]
pub struct Gallery {
    pub event: EventView,
    pub images: Vec<EventRecord>,
    pub messages: Vec<EventRecord>,
    pub groups: Vec<ImageGroup>,
}

impl Gallery {
    /// `records` must already be newest first
    pub fn new(event: EventView, records: Vec<EventRecord>) -> Self {
        let Partition { images, messages } = partition(records);
        let groups = group_images(&images);
        Self {
            event,
            images,
            messages,
            groups,
        }
    }

    pub fn image(&self, id: Uuid) -> Option<&EventRecord> {
        self.images.iter().find(|r| r.id == id)
    }
}

/// Body of `GET /events/{id}/gallery`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GalleryResponse {
    pub event: EventView,
    #[schema(value_type = Vec<FlatRecord>)]
    pub images: Vec<EventRecord>,
    #[schema(value_type = Vec<FlatRecord>)]
    pub messages: Vec<EventRecord>,
    pub groups: Vec<ImageGroup>,
}

impl From<Gallery> for GalleryResponse {
    fn from(gallery: Gallery) -> Self {
        Self {
            event: gallery.event,
            images: gallery.images,
            messages: gallery.messages,
            groups: gallery.groups,
        }
    }
}

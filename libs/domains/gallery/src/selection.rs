use std::collections::HashSet;
use uuid::Uuid;

use domain_uploads::EventRecord;

/// Record ids marked for batch download
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: HashSet<Uuid>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership; returns whether `id` is now selected
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected records in gallery order
    pub fn pick<'a>(&self, images: &'a [EventRecord]) -> Vec<&'a EventRecord> {
        images.iter().filter(|r| self.ids.contains(&r.id)).collect()
    }
}

//! Event repository trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::EventResult;
use crate::models::Event;

/// Event storage. Events are immutable once created and never deleted.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: Event) -> EventResult<Event>;

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>>;

    /// Owner's events, newest `created_at` first
    async fn list_by_owner(&self, owner_user_id: Uuid) -> EventResult<Vec<Event>>;
}

#[async_trait]
impl<R: EventRepository + ?Sized> EventRepository for Arc<R> {
    async fn create(&self, event: Event) -> EventResult<Event> {
        (**self).create(event).await
    }

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        (**self).get_by_id(id).await
    }

    async fn list_by_owner(&self, owner_user_id: Uuid) -> EventResult<Vec<Event>> {
        (**self).list_by_owner(owner_user_id).await
    }
}

/// In-memory implementation of EventRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, event: Event) -> EventResult<Event> {
        self.events.write().await.insert(event.id, event.clone());
        tracing::info!(event_id = %event.id, "Created event");
        Ok(event)
    }

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_user_id: Uuid) -> EventResult<Vec<Event>> {
        let events = self.events.read().await;
        let mut owned: Vec<Event> = events
            .values()
            .filter(|e| e.owner_user_id == owner_user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(owned)
    }
}

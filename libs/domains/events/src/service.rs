//! Event service - business logic layer

use domain_identity::CurrentUser;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::filter::EventFilter;
use crate::links::{LinkBuilder, QrTarget};
use crate::models::{CreateEventForm, Event, EventView};
use crate::repository::EventRepository;

/// Event service for business logic
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
    links: LinkBuilder,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R, links: LinkBuilder) -> Self {
        Self {
            repository: Arc::new(repository),
            links,
        }
    }

    pub fn links(&self) -> &LinkBuilder {
        &self.links
    }

    /// Validate the form and persist an event owned by `owner`
    #[instrument(skip(self, form), fields(owner = %owner.uid))]
    pub async fn create(&self, owner: &CurrentUser, form: CreateEventForm) -> EventResult<EventView> {
        form.check()?;

        let event = self.repository.create(form.into_event(owner.uid)).await?;
        tracing::info!(event_id = %event.id, event_type = %event.event_type, "Event created");

        Ok(self.view(event))
    }

    pub async fn find(&self, id: Uuid) -> EventResult<Option<Event>> {
        self.repository.get_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> EventResult<EventView> {
        self.find(id)
            .await?
            .map(|event| self.view(event))
            .ok_or(EventError::NotFound(id))
    }

    /// Owner's events, newest first, narrowed by `filter`
    #[instrument(skip(self, filter))]
    pub async fn list_for_owner(
        &self,
        owner_user_id: Uuid,
        filter: &EventFilter,
    ) -> EventResult<Vec<EventView>> {
        let events = self.repository.list_by_owner(owner_user_id).await?;

        Ok(events
            .into_iter()
            .filter(|e| filter.matches(e))
            .map(|e| self.view(e))
            .collect())
    }

    pub async fn list_by_owner(&self, owner_user_id: Uuid) -> EventResult<Vec<Event>> {
        self.repository.list_by_owner(owner_user_id).await
    }

    /// SVG QR code for one of the event's public pages
    #[instrument(skip(self))]
    pub async fn qr_svg(&self, id: Uuid, target: QrTarget) -> EventResult<String> {
        if self.find(id).await?.is_none() {
            return Err(EventError::NotFound(id));
        }
        self.links.qr_svg(id, target)
    }

    fn view(&self, event: Event) -> EventView {
        let links = self.links.links(event.id);
        EventView { event, links }
    }
}

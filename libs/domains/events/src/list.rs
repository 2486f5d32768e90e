//! Owner's events list: loads once, filters locally

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};
use uuid::Uuid;

use crate::bus::{SearchBus, SearchMessage};
use crate::error::EventResult;
use crate::filter::{self, EventFilter};
use crate::links::{EventLinks, QrTarget};
use crate::models::Event;
use crate::repository::EventRepository;
use crate::service::EventService;

pub struct EventsList<R: EventRepository> {
    service: Arc<EventService<R>>,
    events: Vec<Event>,
    filter: EventFilter,
    search: broadcast::Receiver<SearchMessage>,
}

impl<R: EventRepository> EventsList<R> {
    pub fn new(service: Arc<EventService<R>>, bus: &SearchBus) -> Self {
        Self {
            service,
            events: Vec::new(),
            filter: EventFilter::new(),
            search: bus.subscribe(),
        }
    }

    /// Fetch the owner's events, newest first. A failed fetch is logged
    /// and leaves the list empty.
    pub async fn load(&mut self, owner_user_id: Uuid) {
        self.events = match self.service.list_by_owner(owner_user_id).await {
            Ok(events) => events,
            Err(e) => {
                tracing::error!(error = %e, %owner_user_id, "Failed to load events");
                Vec::new()
            }
        };
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.set_search(search);
    }

    pub fn set_event_type(&mut self, event_type: Option<String>) {
        self.filter.set_event_type(event_type);
    }

    /// Apply every search message published since the last call
    pub fn sync_search(&mut self) {
        loop {
            match self.search.try_recv() {
                Ok(SearchMessage::Search(text)) => self.filter.set_search(text),
                Ok(SearchMessage::EventType(event_type)) => self.filter.set_event_type(event_type),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Search bus lagged, older messages dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    /// Loaded events passing the current filter
    pub fn visible(&self) -> Vec<&Event> {
        self.filter.apply(&self.events)
    }

    pub fn available_types(&self) -> Vec<String> {
        filter::available_types(&self.events)
    }

    pub fn links(&self, event: &Event) -> EventLinks {
        self.service.links().links(event.id)
    }

    /// The list shows a QR code for the gallery page
    pub fn gallery_qr(&self, event: &Event) -> EventResult<String> {
        self.service.links().qr_svg(event.id, QrTarget::Gallery)
    }
}

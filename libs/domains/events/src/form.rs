//! Event creation form state

use domain_identity::SessionContext;
use std::sync::Arc;

use crate::error::{EventError, EventResult};
use crate::links::QrTarget;
use crate::models::{CreateEventForm, EventView};
use crate::repository::EventRepository;
use crate::service::EventService;

/// What the creator sees after a successful submit
#[derive(Debug, Clone)]
pub struct CreatedEvent {
    pub view: EventView,
    /// QR code of the upload link, to print or share
    pub upload_qr_svg: String,
}

impl CreatedEvent {
    pub fn upload_url(&self) -> &str {
        &self.view.links.upload_url
    }
}

pub struct EventForm<R: EventRepository> {
    service: Arc<EventService<R>>,
    session: SessionContext,
    created: Option<CreatedEvent>,
}

impl<R: EventRepository> EventForm<R> {
    pub fn new(service: Arc<EventService<R>>, session: SessionContext) -> Self {
        Self {
            service,
            session,
            created: None,
        }
    }

    /// Validate, persist with the signed-in user as owner, and render the
    /// upload QR code.
    pub async fn submit(&mut self, form: CreateEventForm) -> EventResult<&CreatedEvent> {
        let owner = self.session.current_user().ok_or(EventError::Unauthorized)?;

        let view = self.service.create(&owner, form).await?;
        let upload_qr_svg = self.service.links().qr_svg(view.event.id, QrTarget::Upload)?;

        Ok(&*self.created.insert(CreatedEvent {
            view,
            upload_qr_svg,
        }))
    }

    pub fn created(&self) -> Option<&CreatedEvent> {
        self.created.as_ref()
    }

    /// Back to an empty form
    pub fn reset(&mut self) {
        self.created = None;
    }
}

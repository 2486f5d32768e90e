//! Events Domain
//!
//! Everything around a SnapEvent event before guests arrive:
//! - creation form with per-field validation and resolved event type
//! - MongoDB and in-memory persistence
//! - public upload/gallery links and their QR codes
//! - the owner's events list with local search and type filtering
//!
//! # Architecture
//!
//! ```text
//! EventForm ──submit──► EventService ──► EventRepository (Mongo / memory)
//!                           │
//!                           └─► LinkBuilder ──► QR SVG
//!
//! SearchBus ──► EventsList ──load──► EventService
//!                   └─ EventFilter (pure, no refetch)
//! ```

use utoipa::OpenApi;

pub mod bus;
pub mod error;
pub mod filter;
pub mod form;
pub mod handlers;
pub mod links;
pub mod list;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use bus::{SearchBus, SearchMessage};
pub use error::{EventError, EventResult};
pub use filter::{ALL_TYPES, EventFilter, available_types};
pub use form::{CreatedEvent, EventForm};
pub use links::{EventLinks, LinkBuilder, QrTarget, render_qr_svg};
pub use list::EventsList;
pub use models::{CreateEventForm, Event, EventListQuery, EventType, EventView};
pub use repository::{EventRepository, InMemoryEventRepository};
pub use self::mongodb::{EventDocument, MongoEventRepository};
pub use service::EventService;

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_event,
        handlers::list_events,
        handlers::get_event,
        handlers::event_qr,
    ),
    components(schemas(CreateEventForm, Event, EventType, EventLinks, EventView, QrTarget)),
    tags(
        (name = "events", description = "Event creation, share links and QR codes")
    )
)]
pub struct ApiDoc;

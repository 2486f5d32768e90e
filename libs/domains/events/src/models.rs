//! Event domain models

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::links::EventLinks;

/// Event kinds offered by the creation form.
///
/// Serialized with the human-readable label that is also stored on the
/// event, e.g. `"Birthday Party"`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    ToSchema,
)]
pub enum EventType {
    Wedding,
    #[serde(rename = "Birthday Party")]
    #[strum(serialize = "Birthday Party")]
    BirthdayParty,
    Conference,
    Concert,
    #[serde(rename = "Corporate Event")]
    #[strum(serialize = "Corporate Event")]
    CorporateEvent,
    Graduation,
    Workshop,
    #[default]
    #[serde(rename = "Social Gathering")]
    #[strum(serialize = "Social Gathering")]
    SocialGathering,
    Other,
}

impl EventType {
    /// All choices in the order the form lists them
    pub fn options() -> Vec<EventType> {
        Self::iter().collect()
    }
}

/// A stored event.
///
/// `event_type` holds the resolved label: the custom text when
/// [`EventType::Other`] was chosen, else the selected label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM`, as entered
    pub date: String,
    pub location: String,
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_event_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub owner_user_id: Uuid,
}

/// Event creation form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(
        length(min = 1, message = "Date is required"),
        custom(function = "validate_event_date")
    )]
    pub date: String,

    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,

    #[serde(default)]
    pub event_type: EventType,

    #[serde(default)]
    pub custom_event_type: Option<String>,
}

impl CreateEventForm {
    /// Field rules plus the cross-field rule: choosing `Other` requires a
    /// non-empty `customEventType`.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.event_type == EventType::Other && self.custom_type().is_none() {
            errors.add(
                "custom_event_type",
                field_error("required", "Please specify the event type"),
            );
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn custom_type(&self) -> Option<&str> {
        self.custom_event_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Builds the stored event. Call [`check`](Self::check) first.
    pub fn into_event(self, owner_user_id: Uuid) -> Event {
        let custom = match self.event_type {
            EventType::Other => self.custom_type().map(str::to_string),
            _ => None,
        };
        let event_type = custom
            .clone()
            .unwrap_or_else(|| self.event_type.to_string());

        Event {
            id: Uuid::now_v7(),
            title: self.title,
            description: self.description,
            date: self.date,
            location: self.location,
            event_type,
            custom_event_type: custom,
            created_at: Utc::now(),
            owner_user_id,
        }
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Accepts `YYYY-MM-DD` (date input) or `YYYY-MM-DDTHH:MM` (datetime-local).
/// Emptiness is reported by the length rule.
fn validate_event_date(date: &str) -> Result<(), ValidationError> {
    if date.is_empty()
        || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M").is_ok()
    {
        Ok(())
    } else {
        Err(field_error("invalid_date", "Date must be YYYY-MM-DD or YYYY-MM-DDTHH:MM"))
    }
}

/// Event plus its public share links
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub links: EventLinks,
}

/// Query parameters of the owner's event list
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct EventListQuery {
    /// Case-insensitive match on title, description or location
    pub search: Option<String>,
    /// Exact stored event type; `all` or empty means no filter
    pub event_type: Option<String>,
}

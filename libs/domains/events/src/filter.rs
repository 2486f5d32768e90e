//! Client-side filtering of an already loaded event list

use crate::models::{Event, EventListQuery};

/// Type-filter value meaning "no filter"
pub const ALL_TYPES: &str = "all";

/// Search text plus optional exact event type.
///
/// Both parts compose with AND; an empty search matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    search: String,
    event_type: Option<String>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.set_search(search);
        self
    }

    pub fn with_event_type(mut self, event_type: Option<String>) -> Self {
        self.set_event_type(event_type);
        self
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into().to_lowercase();
    }

    /// `None`, empty or `"all"` clears the type filter
    pub fn set_event_type(&mut self, event_type: Option<String>) {
        self.event_type = event_type.filter(|t| !t.is_empty() && t != ALL_TYPES);
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.matches_search(event) && self.matches_type(event)
    }

    fn matches_search(&self, event: &Event) -> bool {
        self.search.is_empty()
            || [&event.title, &event.description, &event.location]
                .iter()
                .any(|field| field.to_lowercase().contains(&self.search))
    }

    fn matches_type(&self, event: &Event) -> bool {
        self.event_type
            .as_deref()
            .is_none_or(|wanted| event.event_type == wanted)
    }

    /// Matching events, order preserved
    pub fn apply<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        events.iter().filter(|e| self.matches(e)).collect()
    }
}

impl From<EventListQuery> for EventFilter {
    fn from(query: EventListQuery) -> Self {
        EventFilter::new()
            .with_search(query.search.unwrap_or_default())
            .with_event_type(query.event_type)
    }
}

/// Distinct stored types in first-appearance order
pub fn available_types(events: &[Event]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for event in events {
        if !types.contains(&event.event_type) {
            types.push(event.event_type.clone());
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn event(title: &str, location: &str, event_type: &str) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: title.into(),
            description: "An evening together".into(),
            date: "2025-06-01".into(),
            location: location.into(),
            event_type: event_type.into(),
            custom_event_type: None,
            created_at: Utc::now(),
            owner_user_id: Uuid::nil(),
        }
    }

    fn sample() -> Vec<Event> {
        vec![
            event("Ana's Party", "Lisbon", "Birthday Party"),
            event("Team offsite", "Porto", "Corporate Event"),
            event("Rooftop jam", "Lisbon", "Concert"),
            event("Hack night", "Berlin", "Hackathon"),
        ]
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let events = sample();
        assert_eq!(EventFilter::new().apply(&events).len(), 4);
    }

    #[test]
    fn test_search_is_case_insensitive_over_fields() {
        let events = sample();

        let by_location = EventFilter::new().with_search("LISBON").apply(&events);
        assert_eq!(by_location.len(), 2);

        let by_title = EventFilter::new().with_search("offsite").apply(&events);
        assert_eq!(by_title[0].title, "Team offsite");

        let by_description = EventFilter::new().with_search("evening").apply(&events);
        assert_eq!(by_description.len(), 4);
    }

    #[test]
    fn test_type_filter_exact_and_all() {
        let events = sample();

        let concerts = EventFilter::new()
            .with_event_type(Some("Concert".into()))
            .apply(&events);
        assert_eq!(concerts.len(), 1);

        let all = EventFilter::new()
            .with_event_type(Some(ALL_TYPES.into()))
            .apply(&events);
        assert_eq!(all.len(), 4);

        let partial = EventFilter::new()
            .with_event_type(Some("Concer".into()))
            .apply(&events);
        assert!(partial.is_empty());
    }

    #[test]
    fn test_search_and_type_commute() {
        let events = sample();
        let search_then_type: Vec<_> = EventFilter::new()
            .with_search("lisbon")
            .apply(&events)
            .into_iter()
            .filter(|e| e.event_type == "Concert")
            .map(|e| e.id)
            .collect();

        let type_then_search: Vec<_> = EventFilter::new()
            .with_event_type(Some("Concert".into()))
            .apply(&events)
            .into_iter()
            .filter(|e| e.location.to_lowercase().contains("lisbon"))
            .map(|e| e.id)
            .collect();

        let combined: Vec<_> = EventFilter::new()
            .with_search("lisbon")
            .with_event_type(Some("Concert".into()))
            .apply(&events)
            .into_iter()
            .map(|e| e.id)
            .collect();

        assert_eq!(search_then_type, type_then_search);
        assert_eq!(search_then_type, combined);
        assert_eq!(combined.len(), 1);
    }

    #[test]
    fn test_available_types_first_appearance() {
        let mut events = sample();
        events.push(event("Second gig", "Faro", "Concert"));

        assert_eq!(
            available_types(&events),
            vec!["Birthday Party", "Corporate Event", "Concert", "Hackathon"]
        );
    }

    #[test]
    fn test_from_query() {
        let filter = EventFilter::from(EventListQuery {
            search: Some("Party".into()),
            event_type: Some(String::new()),
        });
        assert_eq!(filter.search(), "party");
        assert_eq!(filter.event_type(), None);
    }
}

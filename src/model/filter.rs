use std::rc::Rc;

use crate::store::saved::SavedEvents;

use super::event::{Continent, Event, EventList, EventType};

/// The active filter dimensions.
///
/// `None`/empty means a dimension imposes no constraint; active dimensions
/// combine with logical AND.
#[derive(Debug, Default, Clone)]
pub struct FilterState {
    pub continent: Option<Continent>,
    pub event_type: Option<EventType>,
    pub search: String,
    pub saved_only: bool,
}

impl FilterState {
    /// True if the event satisfies every active dimension.
    pub fn matches(&self, event: &Event, saved: &SavedEvents) -> bool {
        let matches_continent = self
            .continent
            .map_or(true, |continent| event.continent() == continent);
        let matches_type = self
            .event_type
            .map_or(true, |event_type| event.event_type() == event_type);
        let matches_search = self.search.is_empty() || {
            let query = self.search.to_lowercase();
            event.name().to_lowercase().contains(&query)
                || event.location().to_lowercase().contains(&query)
        };
        let matches_saved = !self.saved_only || saved.is_saved(event);

        matches_continent && matches_type && matches_search && matches_saved
    }

    /// The subsequence of `events` satisfying this filter, in input order.
    pub fn apply(&self, events: &[Rc<Event>], saved: &SavedEvents) -> EventList {
        events
            .iter()
            .filter(|event| self.matches(event, saved))
            .cloned()
            .collect()
    }

    /// A one line summary of the active dimensions for headers and logs.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(continent) = self.continent {
            parts.push(continent.to_string());
        }
        if let Some(event_type) = self.event_type {
            parts.push(event_type.to_string());
        }
        if !self.search.is_empty() {
            parts.push(format!("\"{}\"", self.search));
        }
        if self.saved_only {
            parts.push("saved only".into());
        }
        if parts.is_empty() {
            "all events".into()
        } else {
            parts.join(", ")
        }
    }
}

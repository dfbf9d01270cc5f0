use color_eyre::eyre::{Context, Result};
use log::{debug, warn};

use crate::model::event::{Event, EventId};

use super::{session::Session, Storage, SAVED_EVENTS_KEY};

/// The saved-events list: identifiers of the events a signed-in visitor has
/// marked as favorites.
///
/// Persisted as a flat JSON array of id strings under a single storage key.
/// Insertion order is preserved but carries no meaning. The list is not
/// partitioned per user; signing in under a different email sees the same
/// set.
#[derive(Debug, Default)]
pub struct SavedEvents {
    ids: Vec<EventId>,
}

impl SavedEvents {
    /// Load the saved set, treating a missing or malformed stored value as empty.
    pub fn load(storage: &Storage) -> SavedEvents {
        let Some(raw) = storage.get(SAVED_EVENTS_KEY) else {
            return SavedEvents::default();
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => SavedEvents {
                ids: ids.into_iter().map(EventId::from).collect(),
            },
            Err(e) => {
                warn!("saved events list is malformed, starting empty: {}", e);
                SavedEvents::default()
            }
        }
    }

    pub fn from_ids(ids: Vec<EventId>) -> SavedEvents {
        SavedEvents { ids }
    }

    /// Flip membership of the event in the saved set and persist.
    ///
    /// A no-op without a signed-in session. Returns whether the event is
    /// saved afterwards.
    pub fn toggle(&mut self, storage: &Storage, session: &Session, event: &Event) -> Result<bool> {
        if !session.signed_in() {
            debug!("ignoring save of {}: not signed in", event.id());
            return Ok(false);
        }

        if let Some(position) = self.ids.iter().position(|id| id == event.id()) {
            self.ids.remove(position);
        } else {
            self.ids.push(event.id().clone());
        }
        self.persist(storage)?;

        Ok(self.is_saved(event))
    }

    pub fn is_saved(&self, event: &Event) -> bool {
        self.contains(event.id())
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.ids.iter().any(|saved| saved == id)
    }

    pub fn ids(&self) -> &[EventId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&self, storage: &Storage) -> Result<()> {
        let raw: Vec<&str> = self.ids.iter().map(|id| id.as_str()).collect();
        let serialized =
            serde_json::to_string(&raw).wrap_err("could not serialize the saved events list")?;
        storage.set(SAVED_EVENTS_KEY, &serialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::tests::sample_catalog;
    use crate::store::tests::temp_storage;
    use pretty_assertions::assert_eq;

    fn signed_in(storage: &Storage) -> Session {
        let mut session = Session::load(storage);
        session
            .sign_in(storage, "fanny@example.com", "hunter2")
            .unwrap();
        session
    }

    #[test]
    fn toggle_requires_a_session() {
        let (_dir, storage) = temp_storage();
        let catalog = sample_catalog();
        let event = &catalog.events()[0];

        let mut saved = SavedEvents::load(&storage);
        let session = Session::load(&storage);

        assert!(!saved.toggle(&storage, &session, event).unwrap());
        assert!(saved.is_empty());
    }

    #[test]
    fn toggle_persists_across_reload() {
        let (_dir, storage) = temp_storage();
        let catalog = sample_catalog();
        let event = &catalog.events()[0];
        let session = signed_in(&storage);

        let mut saved = SavedEvents::load(&storage);
        assert!(saved.toggle(&storage, &session, event).unwrap());

        // a fresh load simulates the page reload
        let reloaded = SavedEvents::load(&storage);
        assert!(reloaded.is_saved(event));

        // second toggle returns to the original state
        assert!(!saved.toggle(&storage, &session, event).unwrap());
        assert!(!SavedEvents::load(&storage).is_saved(event));
    }

    #[test]
    fn corrupt_stored_list_degrades_to_empty() {
        let (_dir, storage) = temp_storage();
        storage.set(SAVED_EVENTS_KEY, "][ not json").unwrap();

        let saved = SavedEvents::load(&storage);
        assert!(saved.is_empty());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let (_dir, storage) = temp_storage();
        let catalog = sample_catalog();
        let session = signed_in(&storage);

        let mut saved = SavedEvents::load(&storage);
        saved
            .toggle(&storage, &session, &catalog.events()[2])
            .unwrap();
        saved
            .toggle(&storage, &session, &catalog.events()[0])
            .unwrap();

        let reloaded = SavedEvents::load(&storage);
        let ids: Vec<&str> = reloaded.ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["June-Pixel Fiesta-5", "March-Typo Days-10"]);
    }
}

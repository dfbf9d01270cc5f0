use color_eyre::eyre::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::path::Path;
use std::rc::Rc;

use super::event::{Event, EventList, EventRecord};

/// Wrapper for the `[[event]]` tables of the catalog file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "event")]
    events: Vec<EventRecord>,
}

/// The static, read-only event catalog.
///
/// Loaded in full at startup and never mutated; identifiers are assigned to
/// each record here and nowhere else.
#[derive(Debug, Default)]
pub struct Catalog {
    events: EventList,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Catalog> {
        debug!("reading event catalog from {:?}", path);
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("could not read the event catalog: {:?}", path))?;
        let catalog = Self::parse(&raw)?;
        info!("read {} events from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn parse(raw: &str) -> Result<Catalog> {
        let file: CatalogFile =
            toml_edit::de::from_str(raw).wrap_err("could not parse the event catalog")?;

        let events = file
            .events
            .into_iter()
            .map(|record| Rc::new(Event::from_record(record)))
            .collect();

        Ok(Catalog { events })
    }

    /// All events, in catalog order.
    #[must_use]
    pub fn events(&self) -> &[Rc<Event>] {
        self.events.as_ref()
    }

    pub fn find(&self, id: &str) -> Option<&Rc<Event>> {
        self.events.iter().find(|e| e.id().as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Month;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    pub(crate) const SAMPLE_CATALOG: &str = indoc! {r#"
        [[event]]
        name = "Typo Days"
        month = "March"
        start_day = 10
        end_day = 12
        time = "9:00 - 18:00"
        location = "Berlin"
        flag = "🇩🇪"
        continent = "Europe"
        event_type = "conference"
        url = "https://typodays.example"
        edition = "12th edition"
        venue = "Kulturbrauerei"
        speakers = ["Ada Kern", "Jun Sato"]
        description = "Three days of type design talks."

        [[event]]
        name = "Grid Systems Workshop"
        month = "March"
        start_day = 21
        end_day = 21
        time = "10:00 - 16:00"
        location = "Online"
        continent = "Online"
        event_type = "workshop"
        url = "https://gridworkshop.example"

        [[event]]
        name = "Pixel Fiesta"
        month = "June"
        start_day = 5
        end_day = 6
        time = "12:00 - 23:00"
        location = "Mexico City"
        flag = "🇲🇽"
        continent = "Latin America"
        event_type = "festival"
        url = "https://pixelfiesta.example"
    "#};

    pub(crate) fn sample_catalog() -> Catalog {
        Catalog::parse(SAMPLE_CATALOG).expect("sample catalog should parse")
    }

    #[test]
    fn parses_records_in_order() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 3);

        let names: Vec<&str> = catalog.events().iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec!["Typo Days", "Grid Systems Workshop", "Pixel Fiesta"]
        );
    }

    #[test]
    fn optional_fields_default() {
        let catalog = sample_catalog();
        let workshop = &catalog.events()[1];

        assert_eq!(workshop.month(), Month::March);
        assert_eq!(workshop.flag(), "");
        assert_eq!(workshop.edition(), None);
        assert!(workshop.speakers().is_empty());
    }

    #[test]
    fn ids_are_assigned_at_load_time() {
        let catalog = sample_catalog();
        assert_eq!(catalog.events()[2].id().as_str(), "June-Pixel Fiesta-5");
        assert!(catalog.find("June-Pixel Fiesta-5").is_some());
        assert!(catalog.find("June-Pixel Fiesta-6").is_none());
    }
}

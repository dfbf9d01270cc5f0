use chrono::{Month, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, rc::Rc, str::FromStr};

/// The strftime format used for the ends of the human readable date range
const DATE_RANGE_FORMAT: &str = "%a, %b %-d";

/// A list of events
///
/// These are reference counted since they may appear in more than one day cell
pub type EventList = Vec<Rc<Event>>;

/// Stable event identifier, assigned exactly once when the catalog is loaded.
///
/// The derivation (`month-name-startDay`) matches the keys of previously
/// persisted saved lists, so upgrading does not lose anyone's favorites.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EventId(String);

impl EventId {
    pub(crate) fn derive(month: Month, name: &str, start_day: u8) -> EventId {
        EventId(format!("{}-{}-{}", month.name(), name, start_day))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        EventId(value)
    }
}

/// Coarse geographic grouping; "Online" is a pseudo-continent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Continent {
    Asia,
    Europe,
    #[serde(rename = "Latin America")]
    LatinAmerica,
    #[serde(rename = "North America")]
    NorthAmerica,
    Oceania,
    Africa,
    #[serde(rename = "Middle East")]
    MiddleEast,
    Online,
}

impl Continent {
    pub const ALL: [Continent; 8] = [
        Continent::Asia,
        Continent::Europe,
        Continent::LatinAmerica,
        Continent::NorthAmerica,
        Continent::Oceania,
        Continent::Africa,
        Continent::MiddleEast,
        Continent::Online,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::LatinAmerica => "Latin America",
            Continent::NorthAmerica => "North America",
            Continent::Oceania => "Oceania",
            Continent::Africa => "Africa",
            Continent::MiddleEast => "Middle East",
            Continent::Online => "Online",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Continent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Continent::ALL
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown continent: {}", s))
    }
}

/// The format of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Conference,
    Workshop,
    Meetup,
    Festival,
    Online,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Conference,
        EventType::Workshop,
        EventType::Meetup,
        EventType::Festival,
        EventType::Online,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EventType::Conference => "conference",
            EventType::Workshop => "workshop",
            EventType::Meetup => "meetup",
            EventType::Festival => "festival",
            EventType::Online => "online",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown event type: {}", s))
    }
}

/// One record of the event catalog, as it appears in the TOML catalog file.
///
/// Day ranges are inclusive on both ends and are not validated here;
/// a malformed range simply produces an odd looking grid.
#[derive(Debug, Deserialize)]
pub struct EventRecord {
    pub name: String,
    #[serde(deserialize_with = "month_from_name")]
    pub month: Month,
    pub start_day: u8,
    pub end_day: u8,
    pub time: String,
    pub location: String,
    #[serde(default)]
    pub flag: String,
    pub continent: Continent,
    pub event_type: EventType,
    pub url: String,
    pub edition: Option<String>,
    pub venue: Option<String>,
    #[serde(default)]
    pub speakers: Vec<String>,
    pub description: Option<String>,
}

/// An immutable catalog event with its identifier attached.
#[derive(Debug)]
pub struct Event {
    id: EventId,
    record: EventRecord,
}

impl Event {
    pub(crate) fn from_record(record: EventRecord) -> Event {
        let id = EventId::derive(record.month, &record.name, record.start_day);
        Event { id, record }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn month(&self) -> Month {
        self.record.month
    }

    pub fn start_day(&self) -> u8 {
        self.record.start_day
    }

    pub fn end_day(&self) -> u8 {
        self.record.end_day
    }

    pub fn time(&self) -> &str {
        &self.record.time
    }

    pub fn location(&self) -> &str {
        &self.record.location
    }

    pub fn flag(&self) -> &str {
        &self.record.flag
    }

    pub fn continent(&self) -> Continent {
        self.record.continent
    }

    pub fn event_type(&self) -> EventType {
        self.record.event_type
    }

    pub fn url(&self) -> &str {
        &self.record.url
    }

    pub fn edition(&self) -> Option<&str> {
        self.record.edition.as_deref()
    }

    pub fn venue(&self) -> Option<&str> {
        self.record.venue.as_deref()
    }

    pub fn speakers(&self) -> &[String] {
        &self.record.speakers
    }

    pub fn description(&self) -> Option<&str> {
        self.record.description.as_deref()
    }

    /// Whether this event is active on the given day of its own month.
    pub fn is_active_on(&self, day: u8) -> bool {
        self.record.start_day <= day && day <= self.record.end_day
    }

    /// Location with the flag emoji appended, as shown in the UI and put
    /// into exported calendar entries.
    pub fn location_with_flag(&self) -> String {
        if self.record.flag.is_empty() {
            self.record.location.clone()
        } else {
            format!("{} {}", self.record.location, self.record.flag)
        }
    }

    /// The human readable date range of this occurrence, e.g. "Tue, Mar 10 - Thu, Mar 12".
    pub fn date_range(&self, year: i32) -> String {
        let month = self.record.month.number_from_month();
        let start = NaiveDate::from_ymd_opt(year, month, self.record.start_day.into());
        let end = NaiveDate::from_ymd_opt(year, month, self.record.end_day.into());

        match (start, end) {
            (Some(start), Some(end)) if start == end => {
                start.format(DATE_RANGE_FORMAT).to_string()
            }
            (Some(start), Some(end)) => format!(
                "{} - {}",
                start.format(DATE_RANGE_FORMAT),
                end.format(DATE_RANGE_FORMAT)
            ),
            // out-of-month day numbers fall back to the raw range
            _ => format!(
                "{} {}-{}",
                self.record.month.name(),
                self.record.start_day,
                self.record.end_day
            ),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {}-{}, {})",
            self.record.name,
            self.record.month.name(),
            self.record.start_day,
            self.record.end_day,
            self.location_with_flag(),
        )
    }
}

/// Template context for a single event, suitable for Tera interpolation.
#[derive(Debug, Serialize)]
pub struct EventContext {
    pub id: String,
    pub name: String,
    pub month: String,
    pub anchor: String,
    pub date_range: String,
    pub time: String,
    pub location: String,
    pub flag: String,
    pub continent: String,
    pub event_type: String,
    pub url: String,
    pub edition: Option<String>,
    pub venue: Option<String>,
    pub speakers: Vec<String>,
    pub description: Option<String>,
    pub is_saved: bool,
}

impl EventContext {
    pub fn new(event: &Event, year: i32, is_saved: bool) -> EventContext {
        EventContext {
            id: event.id().to_string(),
            name: event.name().into(),
            month: event.month().name().into(),
            anchor: event.month().name().to_lowercase(),
            date_range: event.date_range(year),
            time: event.time().into(),
            location: event.location().into(),
            flag: event.flag().into(),
            continent: event.continent().to_string(),
            event_type: event.event_type().to_string(),
            url: event.url().into(),
            edition: event.edition().map(Into::into),
            venue: event.venue().map(Into::into),
            speakers: event.speakers().to_vec(),
            description: event.description().map(Into::into),
            is_saved,
        }
    }
}

/// Deserialize a named month ("March", "mar") via chrono's month parser
fn month_from_name<'de, D>(deserializer: D) -> Result<Month, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse::<Month>()
        .map_err(|_| serde::de::Error::custom(format!("unknown month: {}", name)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn record(name: &str, month: Month, start_day: u8, end_day: u8) -> EventRecord {
        EventRecord {
            name: name.into(),
            month,
            start_day,
            end_day,
            time: "9:00 - 18:00".into(),
            location: "Berlin".into(),
            flag: "🇩🇪".into(),
            continent: Continent::Europe,
            event_type: EventType::Conference,
            url: "https://example.com".into(),
            edition: None,
            venue: None,
            speakers: Vec::new(),
            description: None,
        }
    }

    #[test]
    fn id_derivation_matches_legacy_keys() {
        let event = Event::from_record(record("Typo Days", Month::March, 10, 12));
        assert_eq!(event.id().as_str(), "March-Typo Days-10");
    }

    #[test]
    fn active_range_is_inclusive() {
        let event = Event::from_record(record("Typo Days", Month::March, 10, 12));
        assert!(!event.is_active_on(9));
        assert!(event.is_active_on(10));
        assert!(event.is_active_on(12));
        assert!(!event.is_active_on(13));
    }

    #[test]
    fn date_range_collapses_single_days() {
        let multi = Event::from_record(record("Typo Days", Month::March, 10, 12));
        assert_eq!(multi.date_range(2026), "Tue, Mar 10 - Thu, Mar 12");

        let single = Event::from_record(record("Type Night", Month::March, 10, 10));
        assert_eq!(single.date_range(2026), "Tue, Mar 10");
    }

    #[test]
    fn continent_and_type_parse_case_insensitively() {
        assert_eq!(
            "latin america".parse::<Continent>().unwrap(),
            Continent::LatinAmerica
        );
        assert_eq!("Meetup".parse::<EventType>().unwrap(), EventType::Meetup);
        assert!("atlantis".parse::<Continent>().is_err());
    }
}

use chrono::{Days, NaiveDate};
use color_eyre::eyre::{eyre, Context, Result};
use icalendar::{Calendar, Component, Event as IcsEvent, EventLike};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::event::Event;
use crate::util::slugify;

/// The resolved all-day date range of one event occurrence.
///
/// `start` and `end` are both inclusive calendar days, as shown to the
/// visitor. The iCalendar DTEND is exclusive, so [`occurrence_range`]
/// resolves `end` before [`export_event`] shifts it by one day.
#[derive(Debug, PartialEq, Eq)]
pub struct OccurrenceRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Resolve the event's day-of-month range against the reference year.
pub fn occurrence_range(event: &Event, year: i32) -> Result<OccurrenceRange> {
    let month = event.month().number_from_month();
    let start = NaiveDate::from_ymd_opt(year, month, event.start_day().into())
        .ok_or(eyre!("event start day is outside {} {}", event.month().name(), year))?;
    let end = NaiveDate::from_ymd_opt(year, month, event.end_day().into())
        .ok_or(eyre!("event end day is outside {} {}", event.month().name(), year))?;

    Ok(OccurrenceRange { start, end })
}

/// The exclusive DTEND for an inclusive user-facing end day: the calendar
/// day after it, rolling over month and year boundaries.
pub fn exclusive_end(range: &OccurrenceRange) -> Result<NaiveDate> {
    range
        .end
        .checked_add_days(Days::new(1))
        .ok_or(eyre!("could not compute the exclusive end date"))
}

/// Build the single-event iCalendar document for one occurrence.
pub fn event_calendar(event: &Event, year: i32) -> Result<Calendar> {
    let range = occurrence_range(event, year)?;
    let end = exclusive_end(&range)?;

    let description = match event.edition() {
        Some(edition) => format!("{} - {}", edition, event.time()),
        None => event.time().to_string(),
    };

    let mut ics_event = IcsEvent::new();
    ics_event
        .summary(event.name())
        .description(&description)
        .location(&event.location_with_flag())
        .starts(range.start)
        .ends(end);
    if !event.url().is_empty() {
        ics_event.add_property("URL", event.url());
    }

    let mut calendar = Calendar::new();
    calendar.push(ics_event.done());
    Ok(calendar)
}

/// Write the .ics file for one event occurrence and return its path.
pub fn export_event(event: &Event, year: i32, output_dir: &Path) -> Result<PathBuf> {
    let calendar = event_calendar(event, year)?;

    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("could not create the export directory: {:?}", output_dir))?;
    let file_path = output_dir.join(format!("{}.ics", slugify(event.id().as_str())));

    fs::write(&file_path, calendar.to_string())
        .wrap_err_with(|| format!("could not write the calendar file: {:?}", file_path))?;
    info!("wrote calendar file {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::tests::sample_catalog;
    use chrono::Month;
    use pretty_assertions::assert_eq;

    #[test]
    fn end_boundary_is_exclusive() {
        let catalog = sample_catalog();
        // Pixel Fiesta spans June 5-6
        let event = catalog.find("June-Pixel Fiesta-5").unwrap();

        let range = occurrence_range(event, 2026).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2026, 6, 5).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2026, 6, 6).unwrap());
        assert_eq!(
            exclusive_end(&range).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 7).unwrap()
        );
    }

    #[test]
    fn exclusive_end_rolls_over_month_and_year() {
        let event = crate::model::event::Event::from_record(
            crate::model::event::tests::record("Year End Jam", Month::December, 29, 31),
        );

        let range = occurrence_range(&event, 2026).unwrap();
        assert_eq!(
            exclusive_end(&range).unwrap(),
            NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()
        );
    }

    #[test]
    fn calendar_contains_the_converted_boundaries() {
        let catalog = sample_catalog();
        let event = catalog.find("June-Pixel Fiesta-5").unwrap();

        let rendered = event_calendar(event, 2026).unwrap().to_string();
        assert!(rendered.contains("SUMMARY:Pixel Fiesta"));
        assert!(rendered.contains("20260605"));
        assert!(rendered.contains("20260607"));
        assert!(!rendered.contains("20260606"));
    }

    #[test]
    fn description_prefers_the_edition_label() {
        let catalog = sample_catalog();
        let event = catalog.find("March-Typo Days-10").unwrap();

        let rendered = event_calendar(event, 2026).unwrap().to_string();
        assert!(rendered.contains("12th edition - 9:00 - 18:00"));
    }

    #[test]
    fn export_writes_a_slugged_file() {
        let catalog = sample_catalog();
        let event = catalog.find("March-Typo Days-10").unwrap();
        let dir = tempfile::TempDir::new().unwrap();

        let path = export_event(event, 2026, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "march-typo-days-10.ics");
        assert!(path.exists());
    }
}

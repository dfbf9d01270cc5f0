use chrono::{Datelike, Month, NaiveDate};
use color_eyre::eyre::{eyre, Result};
use std::rc::Rc;

use super::event::{Event, EventList};

/// One position of a month's calendar page.
///
/// Either padding (no day number) or a concrete day of the month with the
/// events active on it. Cells are rebuilt from scratch on every filter
/// change, never mutated in place.
#[derive(Debug)]
pub struct DayCell {
    pub day: Option<u8>,
    pub events: EventList,
    pub is_today: bool,
}

impl DayCell {
    fn padding() -> DayCell {
        DayCell {
            day: None,
            events: Vec::new(),
            is_today: false,
        }
    }
}

/// The number of days `month` has in `year`.
pub fn days_in_month(year: i32, month: Month) -> Result<u8> {
    let first = first_of_month(year, month)?;
    let first_of_next = NaiveDate::from_ymd_opt(year, month.number_from_month() + 1, 1)
        .or_else(|| NaiveDate::from_ymd_opt(year + 1, 1, 1))
        .ok_or(eyre!("could not get the first day of the next month"))?;
    let last = first_of_next
        .pred_opt()
        .ok_or(eyre!("could not get the last day of the month"))?;

    Ok((last - first).num_days() as u8 + 1)
}

/// Lay out one month of `year` as an ordered run of day cells for a
/// Monday-first week grid.
///
/// Leading padding aligns day 1 with its weekday column, trailing padding
/// rounds the run up to full weeks. Events are matched purely by
/// day-of-month within their own named month; cross-month spans are not
/// representable.
///
/// `today` marks the current cell by month and day only. The caller decides
/// which date counts as today, so grids for a fixed reference year can still
/// highlight the wall clock date.
pub fn month_grid(
    month: Month,
    year: i32,
    today: Option<NaiveDate>,
    events: &[Rc<Event>],
) -> Result<Vec<DayCell>> {
    let first = first_of_month(year, month)?;
    let day_count = days_in_month(year, month)?;

    let leading = first.weekday().num_days_from_monday() as usize;
    let mut cells: Vec<DayCell> = Vec::with_capacity(leading + day_count as usize + 6);
    cells.resize_with(leading, DayCell::padding);

    let is_today = |day: u8| {
        today.map_or(false, |today| {
            today.month() == month.number_from_month() && today.day() == day as u32
        })
    };

    for day in 1..=day_count {
        let day_events = events
            .iter()
            .filter(|event| event.month() == month && event.is_active_on(day))
            .cloned()
            .collect();
        cells.push(DayCell {
            day: Some(day),
            events: day_events,
            is_today: is_today(day),
        });
    }

    let trailing = (7 - cells.len() % 7) % 7;
    cells.resize_with(cells.len() + trailing, DayCell::padding);

    Ok(cells)
}

fn first_of_month(year: i32, month: Month) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
        .ok_or(eyre!("could not get the first day of {} {}", month.name(), year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::tests::sample_catalog;
    use pretty_assertions::assert_eq;

    #[test]
    fn month_lengths_for_the_reference_year() {
        assert_eq!(days_in_month(2026, Month::February).unwrap(), 28);
        assert_eq!(days_in_month(2024, Month::February).unwrap(), 29);
        assert_eq!(days_in_month(2026, Month::December).unwrap(), 31);
    }

    #[test]
    fn grid_is_padded_to_full_weeks() {
        // March 2026 starts on a Sunday: six leading pads, 31 days, five trailing
        let cells = month_grid(Month::March, 2026, None, &[]).unwrap();

        assert_eq!(cells.len(), 42);
        assert!(cells[..6].iter().all(|c| c.day.is_none()));
        assert_eq!(cells[6].day, Some(1));
        assert_eq!(cells.iter().filter(|c| c.day.is_some()).count(), 31);
    }

    #[test]
    fn monday_start_needs_no_leading_padding() {
        // June 2026 starts on a Monday
        let cells = month_grid(Month::June, 2026, None, &[]).unwrap();

        assert_eq!(cells[0].day, Some(1));
        assert_eq!(cells.len(), 35);
        assert_eq!(cells.len() % 7, 0);
    }

    #[test]
    fn events_land_on_exactly_their_range() {
        let catalog = sample_catalog();
        let cells = month_grid(Month::March, 2026, None, catalog.events()).unwrap();

        for cell in &cells {
            let Some(day) = cell.day else {
                assert!(cell.events.is_empty());
                continue;
            };
            let expected = (10..=12).contains(&day) || day == 21;
            assert_eq!(
                cell.events.iter().any(|e| e.name() == "Typo Days"),
                (10..=12).contains(&day),
                "day {}",
                day
            );
            assert_eq!(!cell.events.is_empty(), expected, "day {}", day);
        }
    }

    #[test]
    fn other_months_stay_empty() {
        let catalog = sample_catalog();
        let cells = month_grid(Month::April, 2026, None, catalog.events()).unwrap();
        assert!(cells.iter().all(|c| c.events.is_empty()));
    }

    #[test]
    fn today_marks_by_month_and_day_regardless_of_year() {
        let today = NaiveDate::from_ymd_opt(2027, 3, 14).unwrap();
        let cells = month_grid(Month::March, 2026, Some(today), &[]).unwrap();

        let marked: Vec<u8> = cells
            .iter()
            .filter(|c| c.is_today)
            .filter_map(|c| c.day)
            .collect();
        assert_eq!(marked, vec![14]);

        let cells = month_grid(Month::April, 2026, Some(today), &[]).unwrap();
        assert!(cells.iter().all(|c| !c.is_today));
    }
}

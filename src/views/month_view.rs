use chrono::{Month, NaiveDate};
use color_eyre::eyre::Result;
use itertools::Itertools;
use serde::Serialize;
use std::rc::Rc;

use crate::model::event::{Event, EventContext};
use crate::model::grid::{month_grid, DayCell};
use crate::store::saved::SavedEvents;

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Template context for one day cell.
#[derive(Debug, Serialize)]
pub struct DayContext {
    pub day: Option<u8>,
    pub is_today: bool,
    pub events: Vec<EventContext>,
}

impl DayContext {
    fn new(cell: &DayCell, year: i32, saved: &SavedEvents) -> DayContext {
        DayContext {
            day: cell.day,
            is_today: cell.is_today,
            events: cell
                .events
                .iter()
                .map(|event| EventContext::new(event, year, saved.is_saved(event)))
                .collect(),
        }
    }
}

/// Template context for one month page: the grid chunked into weeks of seven.
#[derive(Debug, Serialize)]
pub struct MonthContext {
    pub name: String,
    pub anchor: String,
    pub weeks: Vec<Vec<DayContext>>,
    pub event_count: usize,
}

impl MonthContext {
    pub fn build(
        month: Month,
        year: i32,
        today: Option<NaiveDate>,
        events: &[Rc<Event>],
        saved: &SavedEvents,
    ) -> Result<MonthContext> {
        let cells = month_grid(month, year, today, events)?;
        let event_count = cells
            .iter()
            .map(|cell| cell.events.len())
            .sum();

        let weeks = cells
            .iter()
            .map(|cell| DayContext::new(cell, year, saved))
            .chunks(7)
            .into_iter()
            .map(|week| week.collect())
            .collect();

        Ok(MonthContext {
            name: month.name().to_string(),
            anchor: month.name().to_lowercase(),
            weeks,
            event_count,
        })
    }
}

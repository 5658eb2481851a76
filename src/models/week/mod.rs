// Week view model
// The displayed week window and the direction of week-to-week navigation

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::utils::date::{start_of_week, DAYS_IN_WEEK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekDirection {
    Backward,
    Forward,
}

impl WeekDirection {
    /// Signed day offset of one step in this direction
    pub fn days(self) -> i64 {
        match self {
            WeekDirection::Backward => -(DAYS_IN_WEEK as i64),
            WeekDirection::Forward => DAYS_IN_WEEK as i64,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            WeekDirection::Backward => WeekDirection::Forward,
            WeekDirection::Forward => WeekDirection::Backward,
        }
    }
}

/// Currently displayed week. `end` is the last visible day (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekViewState {
    pub week: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekViewState {
    /// The week containing `date`, beginning on `first_day`
    pub fn containing(date: NaiveDate, first_day: Weekday) -> Self {
        Self::starting_at(start_of_week(date, first_day))
    }

    fn starting_at(start: NaiveDate) -> Self {
        let end = start + Duration::days(DAYS_IN_WEEK as i64 - 1);
        // Number the week by the Monday it contains so Sunday-first weeks line up
        // with the ISO week a user sees on a wall calendar.
        let monday = (0..DAYS_IN_WEEK as i64)
            .map(|offset| start + Duration::days(offset))
            .find(|day| day.weekday() == Weekday::Mon)
            .unwrap_or(start);
        Self {
            week: monday.iso_week().week(),
            start,
            end,
        }
    }

    pub fn shifted(&self, direction: WeekDirection) -> Self {
        Self::starting_at(self.start + Duration::days(direction.days()))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether the half-open date range `[start, end_exclusive)` overlaps this week.
    /// Zero-length ranges count when their single point falls inside the week.
    pub fn intersects(&self, start: NaiveDate, end_exclusive: NaiveDate) -> bool {
        if start == end_exclusive {
            return self.contains(start);
        }
        start <= self.end && end_exclusive > self.start
    }

    /// Dates of the seven visible columns, left to right
    pub fn days(&self) -> [NaiveDate; DAYS_IN_WEEK] {
        std::array::from_fn(|i| self.start + Duration::days(i as i64))
    }

    /// Day after the last visible day
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end + Duration::days(1)
    }
}

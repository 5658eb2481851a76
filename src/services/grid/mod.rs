//! Pixel <-> date-time mapping for the week grid.
//!
//! Every query takes the latest cached [`GridMeasurements`] snapshot and
//! returns `None` when no layout has been measured yet, so pointer events that
//! arrive before the first layout are harmless.

mod layout;

pub use layout::{GridLayout, RemeasureTarget};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::grid::GridMeasurements;
use crate::models::settings::EngineSettings;
use crate::utils::date::{
    at_minute, minutes_of_day, snap_minutes, DAYS_IN_WEEK, MINUTES_PER_DAY, MINUTES_PER_HOUR,
};

/// Result of a pointer lookup: a date when over the all-day row, a date-time
/// when over the main grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridTime {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl GridTime {
    pub fn date(&self) -> NaiveDate {
        match self {
            GridTime::Date(date) => *date,
            GridTime::DateTime(dt) => dt.date(),
        }
    }
}

/// Stateless view over one measurement snapshot
#[derive(Debug, Clone, Copy)]
pub struct GridMapper<'a> {
    measurements: Option<&'a GridMeasurements>,
    sidebar_shift: f32,
    time_step: u32,
}

impl<'a> GridMapper<'a> {
    pub fn new(
        measurements: Option<&'a GridMeasurements>,
        sidebar_open: bool,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            measurements,
            sidebar_shift: if sidebar_open { settings.sidebar_width } else { 0.0 },
            time_step: settings.time_step_minutes,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.measurements.is_some()
    }

    pub fn time_step(&self) -> u32 {
        self.time_step
    }

    fn left_edge(&self, m: &GridMeasurements) -> f32 {
        m.main_grid.left() + self.sidebar_shift
    }

    /// Horizontal span `(left, right)` of the day columns in pointer space
    pub fn horizontal_bounds(&self) -> Option<(f32, f32)> {
        let m = self.measurements?;
        let left = self.left_edge(m);
        Some((left, left + m.total_width()))
    }

    /// Column under `x`, clamped to the first/last column outside the grid
    pub fn day_index_for_x(&self, x: f32) -> Option<usize> {
        let m = self.measurements?;
        let local_x = x - self.left_edge(m);

        let mut cumulative = 0.0;
        for (index, width) in m.column_widths.iter().enumerate() {
            if local_x < cumulative + width {
                return Some(index);
            }
            cumulative += width;
        }
        Some(DAYS_IN_WEEK - 1)
    }

    /// Minutes past midnight under `y`, snapped to the time step and clamped
    /// to `[0, 1440]`.
    pub fn minute_for_y(&self, y: f32) -> Option<i64> {
        let m = self.measurements?;
        let raw = (y - m.main_grid.top() + m.scroll_offset) / m.hour_height
            * MINUTES_PER_HOUR as f32;
        Some(snap_minutes(f64::from(raw), self.time_step).clamp(0, MINUTES_PER_DAY))
    }

    pub fn in_all_day_row(&self, y: f32) -> Option<bool> {
        let m = self.measurements?;
        Some(y >= m.all_day_row.top() && y < m.all_day_row.bottom())
    }

    pub fn date_for_x(&self, x: f32, first_day_of_view: NaiveDate) -> Option<NaiveDate> {
        let index = self.day_index_for_x(x)?;
        Some(first_day_of_view + Duration::days(index as i64))
    }

    /// Timed position under the pointer, ignoring the all-day row
    pub fn timed_at(&self, x: f32, y: f32, first_day_of_view: NaiveDate) -> Option<NaiveDateTime> {
        let date = self.date_for_x(x, first_day_of_view)?;
        let minute = self.minute_for_y(y)?;
        Some(at_minute(date, minute))
    }

    /// Minute a new slot starts at under `y`. The bottom of a column stays
    /// one step before midnight instead of rolling into the next day.
    pub fn slot_start_minute(&self, y: f32) -> Option<i64> {
        let minute = self.minute_for_y(y)?;
        Some(minute.min(MINUTES_PER_DAY - i64::from(self.time_step)))
    }

    /// Start of the slot under the pointer, always on the column's own day
    pub fn slot_start_at(&self, x: f32, y: f32, first_day_of_view: NaiveDate) -> Option<NaiveDateTime> {
        let date = self.date_for_x(x, first_day_of_view)?;
        let minute = self.slot_start_minute(y)?;
        Some(at_minute(date, minute))
    }

    /// Where a new draft starts: a date over the all-day row, otherwise the
    /// start of the slot under the pointer
    pub fn date_time_for_xy(&self, x: f32, y: f32, first_day_of_view: NaiveDate) -> Option<GridTime> {
        if self.in_all_day_row(y)? {
            return self.date_for_x(x, first_day_of_view).map(GridTime::Date);
        }
        self.slot_start_at(x, y, first_day_of_view).map(GridTime::DateTime)
    }

    /// Vertical pixel position of `time` within its day column
    pub fn y_for_time(&self, time: NaiveDateTime) -> Option<f32> {
        let m = self.measurements?;
        let minutes = minutes_of_day(time) as f32;
        Some(m.main_grid.top() - m.scroll_offset + minutes / MINUTES_PER_HOUR as f32 * m.hour_height)
    }
}

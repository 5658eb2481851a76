// Grid measurement snapshot
// Layout numbers the coordinate mapper works from

use egui::Rect;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::utils::date::DAYS_IN_WEEK;

/// Immutable snapshot of the week grid's layout.
///
/// Rectangles are in the calendar panel's coordinate space, i.e. with the
/// side panel closed. The mapper applies the side-panel shift itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMeasurements {
    /// Width of each visible day column, left to right
    pub column_widths: [f32; DAYS_IN_WEEK],
    /// Height of one hour row in the main grid
    pub hour_height: f32,
    /// Vertical scroll of the main grid
    pub scroll_offset: f32,
    pub all_day_row: Rect,
    pub main_grid: Rect,
}

impl GridMeasurements {
    /// Uniform columns spanning `main_grid`
    pub fn uniform(main_grid: Rect, all_day_row: Rect, hour_height: f32) -> Self {
        Self {
            column_widths: [main_grid.width() / DAYS_IN_WEEK as f32; DAYS_IN_WEEK],
            hour_height,
            scroll_offset: 0.0,
            all_day_row,
            main_grid,
        }
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if !(self.hour_height.is_finite() && self.hour_height > 0.0) {
            return Err(PlannerError::InvalidMeasurements(format!(
                "hour height must be positive, got {}",
                self.hour_height
            )));
        }

        if let Some(width) = self
            .column_widths
            .iter()
            .find(|w| !w.is_finite() || **w < 0.0)
        {
            return Err(PlannerError::InvalidMeasurements(format!(
                "column width must be non-negative, got {}",
                width
            )));
        }

        if !self.scroll_offset.is_finite() {
            return Err(PlannerError::InvalidMeasurements(
                "scroll offset must be finite".to_string(),
            ));
        }

        Ok(())
    }

    pub fn total_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }
}

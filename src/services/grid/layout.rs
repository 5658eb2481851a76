//! Cached, versioned grid measurements.
//!
//! Written only by the layout side (on resize, side-panel toggle, week change
//! or all-day row growth); everything else reads snapshots.

use egui::Rect;
use serde::{Deserialize, Serialize};

use crate::error::PlannerResult;
use crate::models::grid::GridMeasurements;

/// Part of the layout that was remeasured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemeasureTarget {
    /// Columns, hour height and main grid bounds changed
    MainGrid {
        column_widths: [f32; 7],
        hour_height: f32,
        main_grid: Rect,
    },
    /// The all-day row grew or shrank
    AllDayRow(Rect),
    /// The main grid scrolled
    Scroll(f32),
    /// Full replacement
    All(GridMeasurements),
}

#[derive(Debug, Default)]
pub struct GridLayout {
    current: Option<GridMeasurements>,
    version: u64,
}

impl GridLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest snapshot, `None` until the first full measurement
    pub fn snapshot(&self) -> Option<GridMeasurements> {
        self.current.clone()
    }

    pub fn current(&self) -> Option<&GridMeasurements> {
        self.current.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply a measurement update. Partial updates before the first full
    /// measurement are dropped. Returns the new version.
    pub fn remeasure(&mut self, target: RemeasureTarget) -> PlannerResult<u64> {
        let next = match (target, self.current.as_ref()) {
            (RemeasureTarget::All(measurements), _) => measurements,
            (_, None) => {
                log::debug!("Ignoring partial remeasure before first layout");
                return Ok(self.version);
            }
            (
                RemeasureTarget::MainGrid {
                    column_widths,
                    hour_height,
                    main_grid,
                },
                Some(current),
            ) => GridMeasurements {
                column_widths,
                hour_height,
                main_grid,
                ..current.clone()
            },
            (RemeasureTarget::AllDayRow(all_day_row), Some(current)) => GridMeasurements {
                all_day_row,
                ..current.clone()
            },
            (RemeasureTarget::Scroll(scroll_offset), Some(current)) => GridMeasurements {
                scroll_offset,
                ..current.clone()
            },
        };

        next.validate()?;
        self.current = Some(next);
        self.version += 1;
        log::debug!("Grid remeasured (version {})", self.version);
        Ok(self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn measurements() -> GridMeasurements {
        GridMeasurements::uniform(
            Rect::from_min_size(pos2(0.0, 100.0), vec2(700.0, 1440.0)),
            Rect::from_min_size(pos2(0.0, 40.0), vec2(700.0, 40.0)),
            60.0,
        )
    }

    #[test]
    fn test_partial_update_before_layout_is_ignored() {
        let mut layout = GridLayout::new();
        assert_eq!(layout.remeasure(RemeasureTarget::Scroll(30.0)).unwrap(), 0);
        assert!(layout.snapshot().is_none());
    }

    #[test]
    fn test_versions_increase_and_parts_merge() {
        let mut layout = GridLayout::new();
        layout.remeasure(RemeasureTarget::All(measurements())).unwrap();
        let row = Rect::from_min_size(pos2(0.0, 40.0), vec2(700.0, 80.0));
        let version = layout.remeasure(RemeasureTarget::AllDayRow(row)).unwrap();
        assert_eq!(version, 2);

        let snapshot = layout.snapshot().unwrap();
        assert_eq!(snapshot.all_day_row, row);
        assert_eq!(snapshot.hour_height, 60.0);
    }

    #[test]
    fn test_invalid_update_keeps_previous_snapshot() {
        let mut layout = GridLayout::new();
        layout.remeasure(RemeasureTarget::All(measurements())).unwrap();
        let result = layout.remeasure(RemeasureTarget::MainGrid {
            column_widths: [100.0; 7],
            hour_height: 0.0,
            main_grid: Rect::NOTHING,
        });
        assert!(result.is_err());
        assert_eq!(layout.version(), 1);
        assert_eq!(layout.current().unwrap().hour_height, 60.0);
    }
}

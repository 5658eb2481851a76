// Settings module
// Tunables for the draft engine, persisted as TOML

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::PlannerResult;
use crate::models::someday::BucketKind;
use crate::utils::date::DisplayZone;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Grid snapping step in minutes
    pub time_step_minutes: u32,
    /// Length of a freshly created timed draft, in minutes
    pub default_event_duration: u32,
    /// Distance from a grid edge that arms week navigation during a drag
    pub edge_threshold_px: f32,
    /// How long the pointer must stay in the edge zone before the week changes
    pub edge_hold_ms: u64,
    /// Pointer travel below which a drag counts as a click
    pub noop_threshold_px: f32,
    /// Width of the side panel; shifts the grid's horizontal origin while open
    pub sidebar_width: f32,
    pub someday_week_capacity: usize,
    pub someday_month_capacity: usize,
    pub first_day_of_week: Weekday,
    /// IANA zone name; system zone when absent
    pub timezone: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            time_step_minutes: 15,
            default_event_duration: 30,
            edge_threshold_px: 50.0,
            edge_hold_ms: 500,
            noop_threshold_px: 4.0,
            sidebar_width: 350.0,
            someday_week_capacity: 10,
            someday_month_capacity: 10,
            first_day_of_week: Weekday::Sun,
            timezone: None,
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.time_step_minutes == 0 || 60 % self.time_step_minutes != 0 {
            return Err(format!(
                "time_step_minutes must divide an hour, got {}",
                self.time_step_minutes
            ));
        }

        if self.default_event_duration == 0 {
            return Err("default_event_duration must be positive".to_string());
        }

        if self.someday_week_capacity == 0 || self.someday_month_capacity == 0 {
            return Err("someday capacities must be at least 1".to_string());
        }

        let distances = [
            ("edge_threshold_px", self.edge_threshold_px),
            ("noop_threshold_px", self.noop_threshold_px),
            ("sidebar_width", self.sidebar_width),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }

        Ok(())
    }

    pub fn capacity_for(&self, bucket: BucketKind) -> usize {
        match bucket {
            BucketKind::Week => self.someday_week_capacity,
            BucketKind::Month => self.someday_month_capacity,
        }
    }

    pub fn edge_hold(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.edge_hold_ms)
    }

    pub fn default_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.default_event_duration))
    }

    pub fn display_zone(&self) -> PlannerResult<DisplayZone> {
        DisplayZone::parse(self.timezone.as_deref())
    }
}

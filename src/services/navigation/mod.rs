//! Week navigation: manual, keyboard and edge-triggered.

mod edge;

pub use edge::EdgeNavigator;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::week::{WeekDirection, WeekViewState};

/// What caused a week change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationCause {
    /// Toolbar arrows
    Manual,
    Keyboard,
    /// Pointer held at a grid edge while dragging a timed draft
    EdgeDrag,
}

/// Week change requested by the engine or the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationRequest {
    Shift {
        direction: WeekDirection,
        cause: NavigationCause,
    },
    Today {
        cause: NavigationCause,
    },
}

impl NavigationRequest {
    pub fn cause(&self) -> NavigationCause {
        match self {
            NavigationRequest::Shift { cause, .. } | NavigationRequest::Today { cause } => *cause,
        }
    }
}

/// Owner of the displayed week
#[derive(Debug, Clone)]
pub struct WeekNavigator {
    state: WeekViewState,
    first_day: Weekday,
}

impl WeekNavigator {
    pub fn new(today: NaiveDate, first_day: Weekday) -> Self {
        Self {
            state: WeekViewState::containing(today, first_day),
            first_day,
        }
    }

    pub fn current(&self) -> &WeekViewState {
        &self.state
    }

    pub fn navigate_previous(&mut self) -> &WeekViewState {
        self.state = self.state.shifted(WeekDirection::Backward);
        &self.state
    }

    pub fn navigate_next(&mut self) -> &WeekViewState {
        self.state = self.state.shifted(WeekDirection::Forward);
        &self.state
    }

    pub fn jump_to_today(&mut self, today: NaiveDate) -> &WeekViewState {
        self.state = WeekViewState::containing(today, self.first_day);
        &self.state
    }

    /// Apply a request; returns whether the displayed week changed
    pub fn apply(&mut self, request: NavigationRequest, today: NaiveDate) -> bool {
        let before = self.state;
        match request {
            NavigationRequest::Shift {
                direction: WeekDirection::Backward,
                ..
            } => {
                self.navigate_previous();
            }
            NavigationRequest::Shift {
                direction: WeekDirection::Forward,
                ..
            } => {
                self.navigate_next();
            }
            NavigationRequest::Today { .. } => {
                self.jump_to_today(today);
            }
        }

        let changed = before != self.state;
        if changed {
            log::info!(
                "Week {} -> {} ({:?})",
                before.week,
                self.state.week,
                request.cause()
            );
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_shift_requests() {
        let mut nav = WeekNavigator::new(date(2024, 1, 3), Weekday::Sun);
        assert!(nav.apply(
            NavigationRequest::Shift {
                direction: WeekDirection::Forward,
                cause: NavigationCause::Keyboard,
            },
            date(2024, 1, 3),
        ));
        assert_eq!(nav.current().start, date(2024, 1, 7));
    }

    #[test]
    fn test_today_is_noop_when_already_visible() {
        let mut nav = WeekNavigator::new(date(2024, 1, 3), Weekday::Sun);
        let changed = nav.apply(
            NavigationRequest::Today {
                cause: NavigationCause::Keyboard,
            },
            date(2024, 1, 5),
        );
        assert!(!changed);

        nav.navigate_previous();
        nav.navigate_previous();
        assert!(nav.apply(
            NavigationRequest::Today {
                cause: NavigationCause::Manual,
            },
            date(2024, 1, 5),
        ));
        assert_eq!(nav.current().start, date(2023, 12, 31));
    }
}

//! Edge-triggered week navigation during a drag.
//!
//! Holding the pointer within the edge zone of the grid for the configured
//! hold time requests a week change and restarts the hold. Leaving the zone
//! cancels the pending hold. The clock is passed in so holds are deterministic.

use std::time::{Duration, Instant};

use crate::models::settings::EngineSettings;
use crate::models::week::WeekDirection;

#[derive(Debug, Clone)]
pub struct EdgeNavigator {
    threshold: f32,
    hold: Duration,
    armed: Option<(WeekDirection, Instant)>,
}

impl EdgeNavigator {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            threshold: settings.edge_threshold_px,
            hold: settings.edge_hold(),
            armed: None,
        }
    }

    /// Edge the pointer is close to, if any
    fn zone_for(&self, x: f32, (left, right): (f32, f32)) -> Option<WeekDirection> {
        if x - left <= self.threshold {
            Some(WeekDirection::Backward)
        } else if right - x <= self.threshold {
            Some(WeekDirection::Forward)
        } else {
            None
        }
    }

    /// Feed a pointer position. Returns a direction when a hold completes.
    pub fn observe(&mut self, x: f32, bounds: (f32, f32), now: Instant) -> Option<WeekDirection> {
        match self.zone_for(x, bounds) {
            None => {
                if self.armed.take().is_some() {
                    log::debug!("Pointer left the edge zone; hold cancelled");
                }
                None
            }
            Some(direction) => match self.armed {
                Some((armed, _)) if armed == direction => self.poll(now),
                _ => {
                    self.armed = Some((direction, now));
                    None
                }
            },
        }
    }

    /// Check the running hold without a new pointer position
    pub fn poll(&mut self, now: Instant) -> Option<WeekDirection> {
        let (direction, since) = self.armed?;
        if now.saturating_duration_since(since) >= self.hold {
            self.armed = Some((direction, now));
            log::debug!("Edge hold completed: {:?}", direction);
            Some(direction)
        } else {
            None
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn reset(&mut self) {
        self.armed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: (f32, f32) = (0.0, 700.0);

    fn navigator() -> EdgeNavigator {
        EdgeNavigator::new(&EngineSettings::default())
    }

    #[test]
    fn test_hold_near_right_edge_moves_forward() {
        let mut edge = navigator();
        let t0 = Instant::now();
        assert_eq!(edge.observe(680.0, BOUNDS, t0), None);
        assert_eq!(edge.observe(685.0, BOUNDS, t0 + Duration::from_millis(200)), None);
        assert_eq!(
            edge.observe(690.0, BOUNDS, t0 + Duration::from_millis(500)),
            Some(WeekDirection::Forward)
        );
    }

    #[test]
    fn test_hold_restarts_after_trigger() {
        let mut edge = navigator();
        let t0 = Instant::now();
        edge.observe(10.0, BOUNDS, t0);
        assert_eq!(
            edge.poll(t0 + Duration::from_millis(600)),
            Some(WeekDirection::Backward)
        );
        assert_eq!(edge.poll(t0 + Duration::from_millis(700)), None);
        assert_eq!(
            edge.poll(t0 + Duration::from_millis(1100)),
            Some(WeekDirection::Backward)
        );
    }

    #[test]
    fn test_leaving_zone_cancels() {
        let mut edge = navigator();
        let t0 = Instant::now();
        edge.observe(690.0, BOUNDS, t0);
        edge.observe(350.0, BOUNDS, t0 + Duration::from_millis(300));
        assert!(!edge.is_armed());
        assert_eq!(edge.observe(690.0, BOUNDS, t0 + Duration::from_millis(600)), None);
    }

    #[test]
    fn test_switching_edges_rearms() {
        let mut edge = navigator();
        let t0 = Instant::now();
        edge.observe(690.0, BOUNDS, t0);
        assert_eq!(edge.observe(5.0, BOUNDS, t0 + Duration::from_millis(600)), None);
        assert_eq!(
            edge.poll(t0 + Duration::from_millis(1100)),
            Some(WeekDirection::Backward)
        );
    }

    #[test]
    fn test_pointer_past_the_edge_counts() {
        let mut edge = navigator();
        let t0 = Instant::now();
        edge.observe(760.0, BOUNDS, t0);
        assert_eq!(
            edge.poll(t0 + Duration::from_millis(500)),
            Some(WeekDirection::Forward)
        );
    }
}

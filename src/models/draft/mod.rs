// Draft module
// The single in-progress edit plus its drag/resize companions

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::models::event::{Event, EventTime, Origin, Priority};
use crate::utils::date::DisplayZone;

/// One end of a draft's range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    Start,
    End,
}

impl Boundary {
    pub fn opposite(self) -> Self {
        match self {
            Boundary::Start => Boundary::End,
            Boundary::End => Boundary::Start,
        }
    }
}

/// Event under active manipulation, in display-zone wall-clock time.
///
/// Timed drafts carry full date-times snapped to the grid step. All-day and
/// someday drafts carry midnight boundaries with an exclusive end, so a
/// single-day all-day draft spans `[d 00:00, d+1 00:00)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub id: Option<String>,
    pub user: Option<String>,
    pub title: String,
    pub description: Option<String>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    pub is_all_day: bool,
    pub is_someday: bool,
    pub priority: Priority,
    /// `None` until the draft is persisted for the first time
    pub origin: Option<Origin>,
    pub order: Option<u32>,
    /// Edit form visible
    pub is_open: bool,
    /// Set on the resize step that swapped the controlled boundary
    pub has_flipped: bool,
}

impl Draft {
    fn blank(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: None,
            user: None,
            title: String::new(),
            description: None,
            start,
            end,
            is_all_day: false,
            is_someday: false,
            priority: Priority::Unassigned,
            origin: None,
            order: None,
            is_open: false,
            has_flipped: false,
        }
    }

    /// New timed draft. Reversed input is reordered.
    pub fn timed(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::blank(start.min(end), start.max(end))
    }

    /// New all-day draft over `[start, end_exclusive)`
    pub fn all_day(start: NaiveDate, end_exclusive: NaiveDate) -> Self {
        let (start, end) = (start.min(end_exclusive), start.max(end_exclusive));
        let mut draft = Self::blank(start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN));
        draft.is_all_day = true;
        draft
    }

    /// New backlog draft spanning a bucket's range
    pub fn someday(start: NaiveDate, end_exclusive: NaiveDate, order: u32) -> Self {
        let mut draft = Self::all_day(start, end_exclusive);
        draft.is_all_day = false;
        draft.is_someday = true;
        draft.order = Some(order);
        draft
    }

    /// Draft editing an existing event
    pub fn from_event(event: &Event, zone: &DisplayZone) -> Self {
        let to_naive = |time: &EventTime| match time {
            EventTime::Date(date) => date.and_time(NaiveTime::MIN),
            EventTime::DateTime(dt) => zone.to_naive(dt),
        };
        let start = to_naive(&event.start);
        let end = to_naive(&event.end);

        Self {
            id: event.id.clone(),
            user: event.user.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            start: start.min(end),
            end: start.max(end),
            is_all_day: event.is_all_day,
            is_someday: event.is_someday,
            priority: event.priority,
            origin: Some(event.origin),
            order: event.order,
            is_open: false,
            has_flipped: false,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// True for drafts whose boundaries are calendar dates
    pub fn is_date_only(&self) -> bool {
        self.is_all_day || self.is_someday
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn boundary(&self, boundary: Boundary) -> NaiveDateTime {
        match boundary {
            Boundary::Start => self.start,
            Boundary::End => self.end,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Exclusive end date of a date-only draft
    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// Last covered day of a date-only draft
    pub fn last_day(&self) -> NaiveDate {
        if self.end > self.start {
            (self.end - Duration::days(1)).date()
        } else {
            self.start.date()
        }
    }

    /// Replace the range, keeping `start <= end` and date-only granularity.
    pub fn set_range(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> PlannerResult<()> {
        if end < start {
            return Err(PlannerError::InvalidRange(format!(
                "end {} is before start {}",
                end, start
            )));
        }
        if self.is_date_only() && (start.time() != NaiveTime::MIN || end.time() != NaiveTime::MIN) {
            return Err(PlannerError::InvalidRange(
                "all-day and someday drafts take date-only boundaries".to_string(),
            ));
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    /// Check the range invariants after flags were changed directly
    pub fn validate(&self) -> PlannerResult<()> {
        self.clone().set_range(self.start, self.end)
    }

    /// Replace the range of a date-only draft from dates, `end` exclusive
    pub fn set_dates(&mut self, start: NaiveDate, end_exclusive: NaiveDate) -> PlannerResult<()> {
        self.set_range(start.and_time(NaiveTime::MIN), end_exclusive.and_time(NaiveTime::MIN))
    }
}

/// Companion of a draft being moved as a whole
#[derive(Debug, Clone, PartialEq)]
pub struct DragStatus {
    /// `end - start` when the drag began; preserved throughout
    pub original_duration: Duration,
    /// Pointer distance below the event's visual top when the drag began
    pub offset_y: f32,
    /// Day columns between the event's first day and the grabbed column
    pub day_offset: i64,
    /// Pointer position at pointer-down
    pub anchor: Pos2,
    /// Pointer travelled past the no-op threshold
    pub has_moved: bool,
}

impl DragStatus {
    pub fn new(draft: &Draft, anchor: Pos2, offset_y: f32, day_offset: i64) -> Self {
        Self {
            original_duration: draft.duration(),
            offset_y,
            day_offset,
            anchor,
            has_moved: false,
        }
    }
}

/// Companion of a draft whose boundary is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeStatus {
    /// Boundary currently under pointer control
    pub controlled: Boundary,
    pub has_moved: bool,
}

impl ResizeStatus {
    pub fn new(controlled: Boundary) -> Self {
        Self {
            controlled,
            has_moved: false,
        }
    }
}

/// Opaque handle for an in-flight user lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingTicket(pub u64);

/// Lifecycle state of the draft engine
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Activity {
    #[default]
    Idle,
    /// Fresh draft not yet dragged or opened. `anchor` is set when the draft
    /// came from a pointer-down on an empty cell.
    Creating { draft: Draft, anchor: Option<Pos2> },
    Dragging { draft: Draft, status: DragStatus },
    Resizing { draft: Draft, status: ResizeStatus },
    Open { draft: Draft },
}

/// Tag of an [`Activity`], as reported to the event store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Idle,
    Creating,
    Dragging,
    Resizing,
    Open,
}

impl Activity {
    pub fn kind(&self) -> ActivityKind {
        match self {
            Activity::Idle => ActivityKind::Idle,
            Activity::Creating { .. } => ActivityKind::Creating,
            Activity::Dragging { .. } => ActivityKind::Dragging,
            Activity::Resizing { .. } => ActivityKind::Resizing,
            Activity::Open { .. } => ActivityKind::Open,
        }
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            Activity::Idle => None,
            Activity::Creating { draft, .. }
            | Activity::Dragging { draft, .. }
            | Activity::Resizing { draft, .. }
            | Activity::Open { draft } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match self {
            Activity::Idle => None,
            Activity::Creating { draft, .. }
            | Activity::Dragging { draft, .. }
            | Activity::Resizing { draft, .. }
            | Activity::Open { draft } => Some(draft),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Activity::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date(2024, 1, 3).and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_timed_reorders_reversed_input() {
        let draft = Draft::timed(at(11, 0), at(10, 0));
        assert_eq!(draft.start(), at(10, 0));
        assert_eq!(draft.end(), at(11, 0));
        assert!(draft.is_new());
    }

    #[test]
    fn test_all_day_last_day() {
        let draft = Draft::all_day(date(2024, 1, 3), date(2024, 1, 5));
        assert_eq!(draft.last_day(), date(2024, 1, 4));
        assert_eq!(draft.end_date(), date(2024, 1, 5));
        assert!(draft.is_date_only());
    }

    #[test]
    fn test_set_range_rejects_reversed() {
        let mut draft = Draft::timed(at(10, 0), at(11, 0));
        assert!(draft.set_range(at(12, 0), at(11, 0)).is_err());
        assert_eq!(draft.end(), at(11, 0));
    }

    #[test]
    fn test_all_day_rejects_times() {
        let mut draft = Draft::all_day(date(2024, 1, 3), date(2024, 1, 4));
        assert!(draft.set_range(at(10, 0), at(11, 0)).is_err());
        assert!(draft.set_dates(date(2024, 1, 4), date(2024, 1, 6)).is_ok());
        assert_eq!(draft.duration(), Duration::days(2));
    }

    #[test]
    fn test_from_event_converts_into_display_zone() {
        let zone = DisplayZone::parse(Some("Europe/Berlin")).unwrap();
        let start: DateTime<FixedOffset> =
            DateTime::parse_from_rfc3339("2024-01-03T08:00:00Z").unwrap();
        let event = Event::builder()
            .id("evt-1")
            .timed(start, start + Duration::minutes(45))
            .build()
            .unwrap();

        let draft = Draft::from_event(&event, &zone);
        assert_eq!(draft.start(), at(9, 0));
        assert_eq!(draft.duration(), Duration::minutes(45));
        assert_eq!(draft.origin, Some(Origin::Native));
        assert!(!draft.is_new());
    }

    #[test]
    fn test_activity_kind_and_draft_access() {
        let mut activity = Activity::Open {
            draft: Draft::timed(at(9, 0), at(9, 30)),
        };
        assert_eq!(activity.kind(), ActivityKind::Open);
        activity.draft_mut().unwrap().title = "Review".into();
        assert_eq!(activity.draft().unwrap().title, "Review");
        assert!(Activity::default().is_idle());
    }
}

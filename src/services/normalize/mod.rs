//! Draft-to-event normalization performed at submit time.

use crate::error::{PlannerError, PlannerResult};
use crate::models::draft::Draft;
use crate::models::event::{Event, EventTime, Origin};
use crate::models::week::WeekViewState;
use crate::services::store::StoreCommand;
use crate::utils::date::DisplayZone;

/// Outcome of submitting a draft
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub event: Event,
    /// Existing scheduled event that no longer intersects the visible week
    pub leaves_view: bool,
}

impl Submission {
    /// Commands that persist this submission, in dispatch order
    pub fn into_commands(self) -> Vec<StoreCommand> {
        let leaving_id = self
            .leaves_view
            .then(|| self.event.id.clone())
            .flatten();

        let mut commands = vec![if self.event.is_new() {
            StoreCommand::Create { event: self.event }
        } else {
            StoreCommand::Update { event: self.event }
        }];
        if let Some(id) = leaving_id {
            commands.push(StoreCommand::RemoveFromWeekView { id });
        }
        commands
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    zone: DisplayZone,
}

impl Normalizer {
    pub fn new(zone: DisplayZone) -> Self {
        Self { zone }
    }

    /// Convert a draft into the canonical storage shape, dropping all
    /// UI-only state (open/flip flags, drag and resize companions).
    pub fn normalize(&self, draft: &Draft) -> PlannerResult<Event> {
        let (start, end) = if draft.is_date_only() {
            (
                EventTime::Date(draft.start_date()),
                EventTime::Date(draft.end_date()),
            )
        } else {
            (
                EventTime::DateTime(self.zone.attach(draft.start())?),
                EventTime::DateTime(self.zone.attach(draft.end())?),
            )
        };

        let event = Event {
            id: draft.id.clone(),
            user: draft.user.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            start,
            end,
            is_all_day: draft.is_all_day && !draft.is_someday,
            is_someday: draft.is_someday,
            priority: draft.priority,
            origin: draft.origin.unwrap_or(Origin::Native),
            order: if draft.is_someday { draft.order } else { None },
        };

        event.validate().map_err(PlannerError::InvalidRange)?;
        Ok(event)
    }

    /// Normalize and decide create-vs-update and view removal
    pub fn submit(&self, draft: &Draft, week: &WeekViewState) -> PlannerResult<Submission> {
        let event = self.normalize(draft)?;

        let leaves_view = !draft.is_new()
            && !draft.is_someday
            && !week.intersects(draft.start_date(), Self::end_exclusive_date(draft));

        if leaves_view {
            log::info!(
                "Event {:?} moved outside week {}; dropping it from the view",
                draft.id,
                week.week
            );
        }

        Ok(Submission { event, leaves_view })
    }

    fn end_exclusive_date(draft: &Draft) -> chrono::NaiveDate {
        if draft.is_date_only() {
            return draft.end_date();
        }
        // A timed range ending exactly at midnight does not touch the next day
        let end = draft.end();
        if end > draft.start() && end.time() == chrono::NaiveTime::MIN {
            end.date()
        } else {
            end.date() + chrono::Duration::days(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::Priority;
    use chrono::{NaiveDate, NaiveDateTime, Weekday};
    use pretty_assertions::assert_eq;

    fn zone() -> DisplayZone {
        DisplayZone::parse(Some("America/New_York")).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        date(2024, 1, d).and_hms_opt(h, m, 0).unwrap()
    }

    fn week() -> WeekViewState {
        WeekViewState::containing(date(2024, 1, 3), Weekday::Sun)
    }

    #[test]
    fn test_new_timed_draft_becomes_create_with_offsets() {
        let mut draft = Draft::timed(at(3, 9, 0), at(3, 9, 30));
        draft.is_open = true;
        draft.has_flipped = true;
        draft.title = "Standup".into();
        draft.user = Some("user-1".into());

        let submission = Normalizer::new(zone()).submit(&draft, &week()).unwrap();
        assert!(!submission.leaves_view);

        let event = &submission.event;
        assert_eq!(event.origin, Origin::Native);
        assert_eq!(event.user.as_deref(), Some("user-1"));
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["start"], "2024-01-03T09:00:00-05:00");
        assert_eq!(json["end"], "2024-01-03T09:30:00-05:00");

        let commands = submission.into_commands();
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], StoreCommand::Create { .. }));
    }

    #[test]
    fn test_all_day_draft_keeps_plain_dates() {
        let mut draft = Draft::all_day(date(2024, 1, 4), date(2024, 1, 6));
        draft.priority = Priority::Relationships;
        let event = Normalizer::new(zone()).normalize(&draft).unwrap();
        assert_eq!(event.start, EventTime::Date(date(2024, 1, 4)));
        assert_eq!(event.end, EventTime::Date(date(2024, 1, 6)));
        assert!(event.is_all_day);
        assert_eq!(event.order, None);
    }

    #[test]
    fn test_someday_draft_keeps_order() {
        let draft = Draft::someday(date(2023, 12, 31), date(2024, 1, 7), 3);
        let event = Normalizer::new(zone()).normalize(&draft).unwrap();
        assert!(event.is_someday);
        assert!(!event.is_all_day);
        assert_eq!(event.order, Some(3));
    }

    #[test]
    fn test_existing_event_moved_out_of_week_is_flagged() {
        let mut draft = Draft::timed(at(9, 9, 0), at(9, 10, 0));
        draft.id = Some("evt-7".into());
        draft.origin = Some(Origin::Imported);

        let submission = Normalizer::new(zone()).submit(&draft, &week()).unwrap();
        assert!(submission.leaves_view);
        assert_eq!(submission.event.origin, Origin::Imported);
        assert_eq!(
            submission.into_commands()[1],
            StoreCommand::RemoveFromWeekView { id: "evt-7".into() }
        );
    }

    #[test]
    fn test_new_event_outside_week_is_not_flagged() {
        let draft = Draft::timed(at(9, 9, 0), at(9, 10, 0));
        let submission = Normalizer::new(zone()).submit(&draft, &week()).unwrap();
        assert!(!submission.leaves_view);
    }

    #[test]
    fn test_event_ending_at_week_start_midnight_leaves_view() {
        // Saturday 2023-12-30 23:00 to Sunday 00:00 sits entirely before the week
        let mut draft = Draft::timed(
            date(2023, 12, 30).and_hms_opt(23, 0, 0).unwrap(),
            date(2023, 12, 31).and_hms_opt(0, 0, 0).unwrap(),
        );
        draft.id = Some("evt-2".into());
        let submission = Normalizer::new(zone()).submit(&draft, &week()).unwrap();
        assert!(submission.leaves_view);
    }
}

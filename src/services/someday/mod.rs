//! Someday backlog management: capacity checks, reordering, scheduling a
//! backlog item onto the grid and moving grid events into the backlog.

use chrono::Duration;
use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::models::draft::Draft;
use crate::models::event::{Event, EventTime};
use crate::models::settings::EngineSettings;
use crate::models::someday::{BucketKind, SomedayBucket};
use crate::models::week::{WeekDirection, WeekViewState};
use crate::services::grid::GridMapper;
use crate::services::store::{EventStore, StoreCommand};
use crate::utils::date::DisplayZone;

/// Where on the grid a backlog item was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropTarget {
    MainGrid,
    AllDayRow,
}

/// Shift both boundaries by exactly one week, preserving duration
pub fn migrate(event: &Event, direction: WeekDirection) -> Event {
    event.shifted_by(Duration::days(direction.days()))
}

pub struct BacklogManager<'a> {
    settings: &'a EngineSettings,
    zone: DisplayZone,
}

impl<'a> BacklogManager<'a> {
    pub fn new(settings: &'a EngineSettings, zone: DisplayZone) -> Self {
        Self { settings, zone }
    }

    /// Snapshot a bucket from the store's selector
    pub fn load_bucket(
        &self,
        store: &dyn EventStore,
        kind: BucketKind,
        week: &WeekViewState,
    ) -> SomedayBucket {
        SomedayBucket::from_events(
            kind,
            &store.someday_events(kind, week),
            self.settings.capacity_for(kind),
        )
    }

    pub fn ensure_capacity(&self, bucket: &SomedayBucket) -> PlannerResult<()> {
        if bucket.is_full() {
            log::warn!(
                "Someday {} bucket is full ({}/{})",
                bucket.kind(),
                bucket.len(),
                bucket.capacity()
            );
            return Err(PlannerError::BucketFull {
                bucket: bucket.kind(),
                capacity: bucket.capacity(),
            });
        }
        Ok(())
    }

    /// Default backlog draft placed at the end of `bucket`
    pub fn new_draft(&self, bucket: &SomedayBucket, week: &WeekViewState) -> PlannerResult<Draft> {
        self.ensure_capacity(bucket)?;
        let (start, end) = bucket.kind().range(week);
        Ok(Draft::someday(start, end, bucket.len() as u32))
    }

    /// Move `dragged_id` to `dest_index` and renumber the whole bucket.
    /// Returns `None` when nothing moves.
    pub fn reorder(
        &self,
        bucket: &mut SomedayBucket,
        source_index: usize,
        dest_index: usize,
        dragged_id: &str,
    ) -> PlannerResult<Option<StoreCommand>> {
        if source_index == dest_index {
            return Ok(None);
        }

        let current = bucket
            .remove(dragged_id)
            .ok_or_else(|| PlannerError::EventNotFound(dragged_id.to_string()))?;
        if current != source_index {
            log::debug!(
                "Reorder source index {} is stale; {} was at {}",
                source_index,
                dragged_id,
                current
            );
        }
        bucket.insert(dest_index, dragged_id)?;

        log::debug!(
            "Reordered {} in {} bucket to position {}",
            dragged_id,
            bucket.kind(),
            dest_index.min(bucket.len() - 1)
        );
        Ok(Some(StoreCommand::Reorder {
            bucket: bucket.kind(),
            order: bucket.order_entries(),
        }))
    }

    /// Schedule a backlog item at the drop position. New items become a
    /// `Create`; existing ones are converted in place and leave `bucket`.
    /// Returns `Ok(None)` when the grid has not been measured yet.
    pub fn promote(
        &self,
        event: &Event,
        target: DropTarget,
        pos: Pos2,
        mapper: &GridMapper<'_>,
        week: &WeekViewState,
        bucket: Option<&mut SomedayBucket>,
    ) -> PlannerResult<Option<StoreCommand>> {
        let (start, end, is_all_day) = match target {
            DropTarget::AllDayRow => {
                let Some(date) = mapper.date_for_x(pos.x, week.start) else {
                    return Ok(None);
                };
                (
                    EventTime::Date(date),
                    EventTime::Date(date + Duration::days(1)),
                    true,
                )
            }
            DropTarget::MainGrid => {
                let Some(start) = mapper.slot_start_at(pos.x, pos.y, week.start) else {
                    return Ok(None);
                };
                let end = start + self.settings.default_duration();
                (
                    EventTime::DateTime(self.zone.attach(start)?),
                    EventTime::DateTime(self.zone.attach(end)?),
                    false,
                )
            }
        };

        let scheduled = Event {
            start,
            end,
            is_all_day,
            is_someday: false,
            order: None,
            ..event.clone()
        };
        scheduled.validate().map_err(PlannerError::InvalidRange)?;

        match &scheduled.id {
            None => {
                log::info!("Scheduling new backlog item at {:?}", scheduled.start);
                Ok(Some(StoreCommand::Create { event: scheduled }))
            }
            Some(id) => {
                if let Some(bucket) = bucket {
                    bucket.remove(id);
                }
                log::info!("Converting someday event {} to {:?}", id, scheduled.start);
                Ok(Some(StoreCommand::Convert { event: scheduled }))
            }
        }
    }

    /// Move a scheduled event into the backlog at the end of `bucket`
    pub fn demote(
        &self,
        event: &Event,
        bucket: &mut SomedayBucket,
        week: &WeekViewState,
    ) -> PlannerResult<StoreCommand> {
        let id = event
            .id
            .clone()
            .ok_or_else(|| PlannerError::EventNotFound("<unsaved event>".to_string()))?;
        if bucket.contains(&id) {
            return Err(PlannerError::DuplicateId(id));
        }
        self.ensure_capacity(bucket)?;

        let (start, end) = bucket.kind().range(week);
        let order = bucket.len() as u32;
        bucket.insert(bucket.len(), id.clone())?;

        log::info!("Moving event {} into the {} backlog", id, bucket.kind());
        Ok(StoreCommand::Convert {
            event: Event {
                start: EventTime::Date(start),
                end: EventTime::Date(end),
                is_all_day: false,
                is_someday: true,
                order: Some(order),
                ..event.clone()
            },
        })
    }

    /// One-click "move to next/previous week"
    pub fn migrate_command(
        &self,
        event: &Event,
        direction: WeekDirection,
    ) -> PlannerResult<StoreCommand> {
        if event.id.is_none() {
            return Err(PlannerError::EventNotFound("<unsaved event>".to_string()));
        }
        Ok(StoreCommand::Migrate {
            event: migrate(event, direction),
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grid::GridMeasurements;
    use crate::models::someday::OrderEntry;
    use crate::services::store::MockEventStore;
    use chrono::{NaiveDate, Weekday};
    use egui::{pos2, vec2, Rect};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn week() -> WeekViewState {
        WeekViewState::containing(date(2024, 1, 3), Weekday::Sun)
    }

    fn zone() -> DisplayZone {
        DisplayZone::parse(Some("UTC")).unwrap()
    }

    fn measurements() -> GridMeasurements {
        GridMeasurements::uniform(
            Rect::from_min_size(pos2(0.0, 100.0), vec2(700.0, 1440.0)),
            Rect::from_min_size(pos2(0.0, 40.0), vec2(700.0, 40.0)),
            60.0,
        )
    }

    fn bucket(ids: &[&str], capacity: usize) -> SomedayBucket {
        let mut bucket = SomedayBucket::new(BucketKind::Week, capacity);
        for id in ids {
            bucket.insert(bucket.len(), *id).unwrap();
        }
        bucket
    }

    fn someday_event(id: Option<&str>) -> Event {
        let mut builder = Event::builder()
            .title("Read paper")
            .someday(date(2023, 12, 31), date(2024, 1, 7))
            .order(0);
        if let Some(id) = id {
            builder = builder.id(id);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_reorder_moves_and_renumbers() {
        let settings = EngineSettings::default();
        let manager = BacklogManager::new(&settings, zone());
        let mut b = bucket(&["a", "b", "c", "d"], 10);

        let command = manager.reorder(&mut b, 0, 2, "a").unwrap().unwrap();
        assert_eq!(b.ids(), &["b", "c", "a", "d"]);
        assert_eq!(
            command,
            StoreCommand::Reorder {
                bucket: BucketKind::Week,
                order: vec![
                    OrderEntry { id: "b".into(), order: 0 },
                    OrderEntry { id: "c".into(), order: 1 },
                    OrderEntry { id: "a".into(), order: 2 },
                    OrderEntry { id: "d".into(), order: 3 },
                ],
            }
        );
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let settings = EngineSettings::default();
        let manager = BacklogManager::new(&settings, zone());
        let mut b = bucket(&["a", "b"], 10);
        assert_eq!(manager.reorder(&mut b, 1, 1, "b").unwrap(), None);
        assert_eq!(b.ids(), &["a", "b"]);
    }

    #[test]
    fn test_reorder_unknown_id() {
        let settings = EngineSettings::default();
        let manager = BacklogManager::new(&settings, zone());
        let mut b = bucket(&["a"], 10);
        assert!(matches!(
            manager.reorder(&mut b, 0, 1, "zzz"),
            Err(PlannerError::EventNotFound(_))
        ));
    }

    #[test]
    fn test_new_draft_refused_when_full() {
        let settings = EngineSettings::default();
        let manager = BacklogManager::new(&settings, zone());
        let b = bucket(&["a", "b", "c", "d", "e"], 5);
        let result = manager.new_draft(&b, &week());
        assert!(matches!(
            result,
            Err(PlannerError::BucketFull {
                bucket: BucketKind::Week,
                capacity: 5
            })
        ));
        assert_eq!(b.len(), 5);
    }

    #[test]
    fn test_new_draft_spans_bucket_range() {
        let settings = EngineSettings::default();
        let manager = BacklogManager::new(&settings, zone());
        let b = bucket(&["a"], 5);
        let draft = manager.new_draft(&b, &week()).unwrap();
        assert!(draft.is_someday);
        assert_eq!(draft.start_date(), date(2023, 12, 31));
        assert_eq!(draft.end_date(), date(2024, 1, 7));
        assert_eq!(draft.order, Some(1));
    }

    #[test]
    fn test_promote_existing_to_main_grid() {
        let settings = EngineSettings::default();
        let manager = BacklogManager::new(&settings, zone());
        let m = measurements();
        let mapper = GridMapper::new(Some(&m), false, &settings);
        let mut b = bucket(&["evt-1", "evt-2"], 10);

        // Column 3 (Wednesday) at 10:00
        let command = manager
            .promote(
                &someday_event(Some("evt-1")),
                DropTarget::MainGrid,
                pos2(350.0, 700.0),
                &mapper,
                &week(),
                Some(&mut b),
            )
            .unwrap()
            .unwrap();

        let StoreCommand::Convert { event } = command else {
            panic!("expected convert, got {:?}", command);
        };
        assert!(!event.is_someday);
        assert_eq!(event.order, None);
        assert_eq!(
            serde_json::to_value(&event.start).unwrap(),
            "2024-01-03T10:00:00+00:00"
        );
        assert_eq!(event.duration(), Duration::minutes(30));
        assert_eq!(b.ids(), &["evt-2"]);
    }

    #[test]
    fn test_promote_at_bottom_of_last_column_stays_in_week() {
        let settings = EngineSettings::default();
        let manager = BacklogManager::new(&settings, zone());
        let m = measurements();
        let mapper = GridMapper::new(Some(&m), false, &settings);

        // Saturday, 23:55
        let command = manager
            .promote(
                &someday_event(None),
                DropTarget::MainGrid,
                pos2(650.0, 100.0 + 23.0 * 60.0 + 55.0),
                &mapper,
                &week(),
                None,
            )
            .unwrap()
            .unwrap();

        let StoreCommand::Create { event } = command else {
            panic!("expected create, got {:?}", command);
        };
        assert_eq!(
            serde_json::to_value(&event.start).unwrap(),
            "2024-01-06T23:45:00+00:00"
        );
        assert_eq!(event.duration(), Duration::minutes(30));
    }

    #[test]
    fn test_promote_new_to_all_day_row() {
        let settings = EngineSettings::default();
        let manager = BacklogManager::new(&settings, zone());
        let m = measurements();
        let mapper = GridMapper::new(Some(&m), false, &settings);

        let command = manager
            .promote(
                &someday_event(None),
                DropTarget::AllDayRow,
                pos2(50.0, 60.0),
                &mapper,
                &week(),
                None,
            )
            .unwrap()
            .unwrap();

        let StoreCommand::Create { event } = command else {
            panic!("expected create, got {:?}", command);
        };
        assert!(event.is_all_day);
        assert_eq!(event.start, EventTime::Date(date(2023, 12, 31)));
        assert_eq!(event.end, EventTime::Date(date(2024, 1, 1)));
    }

    #[test]
    fn test_promote_without_layout_is_noop() {
        let settings = EngineSettings::default();
        let manager = BacklogManager::new(&settings, zone());
        let mapper = GridMapper::new(None, false, &settings);
        let mut b = bucket(&["evt-1"], 10);
        let result = manager
            .promote(
                &someday_event(Some("evt-1")),
                DropTarget::MainGrid,
                pos2(10.0, 10.0),
                &mapper,
                &week(),
                Some(&mut b),
            )
            .unwrap();
        assert!(result.is_none());
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_demote_appends_to_bucket() {
        let settings = EngineSettings::default();
        let manager = BacklogManager::new(&settings, zone());
        let mut b = bucket(&["x"], 10);
        let scheduled = Event::builder()
            .id("evt-9")
            .all_day(date(2024, 1, 2), date(2024, 1, 3))
            .build()
            .unwrap();

        let StoreCommand::Convert { event } = manager.demote(&scheduled, &mut b, &week()).unwrap()
        else {
            panic!("expected convert");
        };
        assert!(event.is_someday);
        assert!(!event.is_all_day);
        assert_eq!(event.order, Some(1));
        assert_eq!(b.ids(), &["x", "evt-9"]);
        assert!(event.validate().is_ok());
    }

    #[test]
    fn test_demote_refused_when_full() {
        let settings = EngineSettings::default();
        let manager = BacklogManager::new(&settings, zone());
        let mut b = bucket(&["x"], 1);
        let scheduled = Event::builder()
            .id("evt-9")
            .all_day(date(2024, 1, 2), date(2024, 1, 3))
            .build()
            .unwrap();
        assert!(manager.demote(&scheduled, &mut b, &week()).is_err());
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_migrate_command_shifts_one_week() {
        let event = Event::builder()
            .id("evt-1")
            .all_day(date(2024, 1, 1), date(2024, 1, 2))
            .build()
            .unwrap();
        let forward = migrate(&event, WeekDirection::Forward);
        assert_eq!(forward.start, EventTime::Date(date(2024, 1, 8)));
        assert_eq!(forward.end, EventTime::Date(date(2024, 1, 9)));
        assert_eq!(migrate(&forward, WeekDirection::Backward), event);
    }

    #[test]
    fn test_migrate_command_requires_id() {
        let settings = EngineSettings::default();
        let manager = BacklogManager::new(&settings, zone());
        assert!(manager
            .migrate_command(&someday_event(None), WeekDirection::Forward)
            .is_err());
        let command = manager
            .migrate_command(&someday_event(Some("evt-3")), WeekDirection::Backward)
            .unwrap();
        assert_eq!(command.label(), "migrate");
    }

    #[test]
    fn test_load_bucket_reads_selector() {
        let settings = EngineSettings {
            someday_week_capacity: 3,
            ..Default::default()
        };
        let manager = BacklogManager::new(&settings, zone());
        let mut store = MockEventStore::new();
        store
            .expect_someday_events()
            .returning(|_, _| vec![someday_event(Some("evt-1")), someday_event(Some("evt-2"))]);

        let b = manager.load_bucket(&store, BucketKind::Week, &week());
        assert_eq!(b.len(), 2);
        assert_eq!(b.capacity(), 3);
    }
}

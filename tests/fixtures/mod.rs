// Test fixtures - reusable test data
// Shared layout, dates, events and a gesture harness for the engine tests

#![allow(dead_code)]

use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Weekday};
use egui::{pos2, vec2, Rect};

use week_planner::models::event::Event;
use week_planner::models::grid::GridMeasurements;
use week_planner::models::settings::EngineSettings;
use week_planner::services::draft::{DraftEngine, EngineContext, Effects, InputEvent, PointerTarget};
use week_planner::services::navigation::WeekNavigator;
use week_planner::services::store::InMemoryEventStore;

/// Sample dates for testing
pub mod dates {
    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        day.and_hms_opt(h, m, 0).unwrap()
    }

    /// Wednesday Jan 3, 2024; its Sunday-first week runs Dec 31 - Jan 6
    pub fn wednesday() -> NaiveDate {
        date(2024, 1, 3)
    }

    /// 09:07 on the sample Wednesday
    pub fn now() -> NaiveDateTime {
        at(wednesday(), 9, 7)
    }

    pub fn utc(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }
}

/// Grid geometry: 100px columns from x=0, one hour per 60px below y=100,
/// all-day row between y=40 and y=80
pub mod layout {
    use super::*;

    pub fn measurements() -> GridMeasurements {
        GridMeasurements::uniform(
            Rect::from_min_size(pos2(0.0, 100.0), vec2(700.0, 1440.0)),
            Rect::from_min_size(pos2(0.0, 40.0), vec2(700.0, 40.0)),
            60.0,
        )
    }

    pub fn column_x(index: usize) -> f32 {
        index as f32 * 100.0 + 50.0
    }

    pub fn y_at(h: u32, m: u32) -> f32 {
        100.0 + h as f32 * 60.0 + m as f32
    }

    pub const ALL_DAY_Y: f32 = 60.0;
}

/// Sample events for testing
pub mod events {
    use super::*;

    pub fn timed(id: &str, start: &str, end: &str) -> Event {
        Event::builder()
            .id(id)
            .user("ada")
            .title("Standup")
            .timed(dates::utc(start), dates::utc(end))
            .build()
            .unwrap()
    }

    pub fn all_day(id: &str, start: NaiveDate, end_exclusive: NaiveDate) -> Event {
        Event::builder()
            .id(id)
            .title("Conference")
            .all_day(start, end_exclusive)
            .build()
            .unwrap()
    }

    /// Backlog item in the week bucket of the sample week
    pub fn someday_week(title: &str, order: u32) -> Event {
        Event::builder()
            .title(title)
            .someday(dates::date(2023, 12, 31), dates::date(2024, 1, 7))
            .order(order)
            .build()
            .unwrap()
    }
}

pub fn settings() -> EngineSettings {
    EngineSettings {
        timezone: Some("UTC".to_string()),
        ..Default::default()
    }
}

/// Engine plus the world it reads, dispatching every emitted command into
/// the in-memory store and following navigation requests
pub struct Harness {
    pub engine: DraftEngine,
    pub store: InMemoryEventStore,
    pub navigator: WeekNavigator,
    pub measurements: Option<GridMeasurements>,
    pub sidebar_open: bool,
    pub now: NaiveDateTime,
    epoch: Instant,
    elapsed: Duration,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_engine(DraftEngine::new(settings()).unwrap().with_user("ada"))
    }

    pub fn with_engine(engine: DraftEngine) -> Self {
        Self {
            engine,
            store: InMemoryEventStore::new(),
            navigator: WeekNavigator::new(dates::wednesday(), Weekday::Sun),
            measurements: Some(layout::measurements()),
            sidebar_open: false,
            now: dates::now(),
            epoch: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.store = InMemoryEventStore::with_events(events);
        self
    }

    /// Run an engine call against the current world and apply its effects
    pub fn run<F>(&mut self, f: F) -> Effects
    where
        F: FnOnce(&mut DraftEngine, &EngineContext<'_>) -> Effects,
    {
        let effects = {
            let ctx = EngineContext::new(self.navigator.current(), &self.store, self.now)
                .with_measurements(self.measurements.as_ref())
                .with_sidebar(self.sidebar_open)
                .at(self.epoch + self.elapsed);
            f(&mut self.engine, &ctx)
        };
        self.apply(&effects);
        effects
    }

    pub fn apply(&mut self, effects: &Effects) {
        self.store
            .dispatch_all(effects.commands.clone())
            .expect("store accepts engine commands");

        if let Some(request) = effects.navigation {
            let previous = *self.navigator.current();
            if self.navigator.apply(request, self.now.date()) {
                let current = *self.navigator.current();
                let follow = self.engine.week_changed(&previous, &current, request.cause());
                self.apply(&follow);
            }
        }
    }

    pub fn input(&mut self, input: InputEvent) -> Effects {
        self.run(|engine, ctx| engine.handle(input, ctx))
    }

    pub fn down(&mut self, x: f32, y: f32, target: PointerTarget) -> Effects {
        self.input(InputEvent::PointerDown {
            pos: pos2(x, y),
            target,
        })
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> Effects {
        self.input(InputEvent::PointerMove { pos: pos2(x, y) })
    }

    pub fn up(&mut self, x: f32, y: f32) -> Effects {
        self.input(InputEvent::PointerUp { pos: pos2(x, y) })
    }

    pub fn wait(&mut self, ms: u64) {
        self.elapsed += Duration::from_millis(ms);
    }

    pub fn tick(&mut self, ms: u64) -> Effects {
        self.wait(ms);
        self.input(InputEvent::Tick)
    }
}

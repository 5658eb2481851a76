//! Inputs, context and effects of the draft engine.

use chrono::NaiveDateTime;
use egui::{Key, Modifiers, Pos2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::models::draft::{Boundary, PendingTicket};
use crate::models::event::Event;
use crate::models::grid::GridMeasurements;
use crate::models::settings::EngineSettings;
use crate::models::someday::BucketKind;
use crate::models::week::WeekViewState;
use crate::services::grid::GridMapper;
use crate::services::navigation::NavigationRequest;
use crate::services::store::{EventStore, StoreCommand};

/// What the pointer went down on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerTarget {
    /// Empty cell of the main grid or all-day row
    EmptyGrid,
    /// Body of an existing event
    EventBody { event: Event },
    /// Start or end handle of an existing event
    ResizeHandle { event: Event, boundary: Boundary },
}

/// Raw input routed to [`super::DraftEngine::handle`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown { pos: Pos2, target: PointerTarget },
    PointerMove { pos: Pos2 },
    PointerUp { pos: Pos2 },
    Key { key: Key, modifiers: Modifiers },
    /// Periodic wake-up while a drag holds at a grid edge
    Tick,
}

/// Read-only view of the world for one handler invocation
#[derive(Clone, Copy)]
pub struct EngineContext<'a> {
    /// Latest cached layout; `None` before the first measurement
    pub measurements: Option<&'a GridMeasurements>,
    pub week: &'a WeekViewState,
    pub store: &'a dyn EventStore,
    pub sidebar_open: bool,
    /// Wall-clock time in the display zone
    pub now: NaiveDateTime,
    /// Monotonic clock for edge holds
    pub clock: Instant,
}

impl<'a> EngineContext<'a> {
    pub fn new(week: &'a WeekViewState, store: &'a dyn EventStore, now: NaiveDateTime) -> Self {
        Self {
            measurements: None,
            week,
            store,
            sidebar_open: false,
            now,
            clock: Instant::now(),
        }
    }

    pub fn with_measurements(mut self, measurements: Option<&'a GridMeasurements>) -> Self {
        self.measurements = measurements;
        self
    }

    pub fn with_sidebar(mut self, open: bool) -> Self {
        self.sidebar_open = open;
        self
    }

    pub fn at(mut self, clock: Instant) -> Self {
        self.clock = clock;
        self
    }

    pub fn mapper(&self, settings: &EngineSettings) -> GridMapper<'a> {
        GridMapper::new(self.measurements, self.sidebar_open, settings)
    }
}

/// User-facing warning raised by a refused action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineWarning {
    BucketFull { bucket: BucketKind, capacity: usize },
    Rejected { reason: String },
}

impl EngineWarning {
    /// Blocking warnings must be acknowledged before the user continues
    pub fn is_blocking(&self) -> bool {
        matches!(self, EngineWarning::BucketFull { .. })
    }
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineWarning::BucketFull { bucket, capacity } => write!(
                f,
                "Your someday {} list is full ({} items). Schedule or remove one first.",
                bucket, capacity
            ),
            EngineWarning::Rejected { reason } => write!(f, "Change not saved: {}", reason),
        }
    }
}

/// Everything a handler produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    /// Commands for the event store, in dispatch order
    pub commands: Vec<StoreCommand>,
    pub warnings: Vec<EngineWarning>,
    pub navigation: Option<NavigationRequest>,
    /// A user lookup the host must resolve via `resolve_user`
    pub pending_user: Option<PendingTicket>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn commands(commands: Vec<StoreCommand>) -> Self {
        Self {
            commands,
            ..Self::default()
        }
    }

    pub fn warning(warning: EngineWarning) -> Self {
        Self {
            warnings: vec![warning],
            ..Self::default()
        }
    }

    pub fn navigate(request: NavigationRequest) -> Self {
        Self {
            navigation: Some(request),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
            && self.warnings.is_empty()
            && self.navigation.is_none()
            && self.pending_user.is_none()
    }
}

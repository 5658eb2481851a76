//! Event store port.
//!
//! The draft engine never mutates events itself. It reads through the
//! [`EventStore`] selectors and returns [`StoreCommand`]s for the host to
//! dispatch.

mod memory;

pub use memory::InMemoryEventStore;

use serde::{Deserialize, Serialize};

use crate::models::draft::ActivityKind;
use crate::models::event::Event;
use crate::models::someday::{BucketKind, OrderEntry};
use crate::models::week::{WeekDirection, WeekViewState};

/// Write command understood by the event store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreCommand {
    Create {
        event: Event,
    },
    Update {
        event: Event,
    },
    Delete {
        id: String,
    },
    /// `event` already carries the shifted range
    Migrate {
        event: Event,
        direction: WeekDirection,
    },
    Reorder {
        bucket: BucketKind,
        order: Vec<OrderEntry>,
    },
    /// Someday item scheduled onto the grid, or grid event moved to the backlog
    Convert {
        event: Event,
    },
    DraftStart {
        activity: ActivityKind,
        event_id: Option<String>,
    },
    DraftDiscard,
    /// The event no longer intersects the visible week
    RemoveFromWeekView {
        id: String,
    },
}

impl StoreCommand {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            StoreCommand::Create { .. } => "create",
            StoreCommand::Update { .. } => "update",
            StoreCommand::Delete { .. } => "delete",
            StoreCommand::Migrate { .. } => "migrate",
            StoreCommand::Reorder { .. } => "reorder",
            StoreCommand::Convert { .. } => "convert",
            StoreCommand::DraftStart { .. } => "draft_start",
            StoreCommand::DraftDiscard => "draft_discard",
            StoreCommand::RemoveFromWeekView { .. } => "remove_from_week_view",
        }
    }
}

/// Read selectors plus the single write entry point of the event store
#[cfg_attr(test, mockall::automock)]
pub trait EventStore {
    /// Scheduled (non-someday) events intersecting `week`
    fn events_in_week(&self, week: &WeekViewState) -> Vec<Event>;

    /// Someday events of `bucket` relative to `week`, in persisted order
    fn someday_events(&self, bucket: BucketKind, week: &WeekViewState) -> Vec<Event>;

    /// Activity the store last heard about
    fn draft_status(&self) -> ActivityKind;

    fn dispatch(&mut self, command: StoreCommand) -> anyhow::Result<()>;
}

use anyhow::{anyhow, bail, Result};
use chrono::Duration;
use std::collections::HashSet;

use super::{EventStore, StoreCommand};
use crate::models::draft::ActivityKind;
use crate::models::event::Event;
use crate::models::someday::BucketKind;
use crate::models::week::WeekViewState;

const ID_PREFIX: &str = "evt-";

/// Minimal event store kept in memory.
///
/// Backs the replay binary and the integration tests. It applies commands
/// literally and is not a full reducer.
#[derive(Debug)]
pub struct InMemoryEventStore {
    events: Vec<Event>,
    hidden: HashSet<String>,
    status: ActivityKind,
    next_id: u64,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            hidden: HashSet::new(),
            status: ActivityKind::Idle,
            next_id: 1,
        }
    }
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, assigning an id when the event has none. Explicit
    /// `evt-N` ids advance the allocator past `N`.
    pub fn insert(&mut self, mut event: Event) -> String {
        let id = match &event.id {
            Some(id) => {
                if let Some(n) = id.strip_prefix(ID_PREFIX).and_then(|n| n.parse::<u64>().ok()) {
                    self.next_id = self.next_id.max(n + 1);
                }
                id.clone()
            }
            None => self.allocate_id(),
        };
        event.id = Some(id.clone());
        self.events.push(event);
        id
    }

    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut store = Self::new();
        for event in events {
            store.insert(event);
        }
        store
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id.as_deref() == Some(id))
    }

    pub fn dispatch_all(&mut self, commands: impl IntoIterator<Item = StoreCommand>) -> Result<()> {
        for command in commands {
            self.dispatch(command)?;
        }
        Ok(())
    }

    /// Next `evt-N` id not already taken
    fn allocate_id(&mut self) -> String {
        loop {
            let id = format!("{}{}", ID_PREFIX, self.next_id);
            self.next_id += 1;
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn replace(&mut self, event: Event) -> Result<()> {
        let id = event
            .id
            .clone()
            .ok_or_else(|| anyhow!("cannot replace an event without an id"))?;
        let slot = self
            .events
            .iter_mut()
            .find(|e| e.id.as_deref() == Some(id.as_str()))
            .ok_or_else(|| anyhow!("event {} not found", id))?;
        *slot = event;
        self.hidden.remove(&id);
        Ok(())
    }

    fn in_bucket(event: &Event, bucket: BucketKind, week: &WeekViewState) -> bool {
        if !event.is_someday {
            return false;
        }
        let (start, end) = bucket.range(week);
        let first_day = event.start.date_naive();
        let spans_week = event.duration() <= Duration::days(7);
        let in_range = start <= first_day && first_day < end;
        match bucket {
            BucketKind::Week => in_range && spans_week,
            BucketKind::Month => in_range && !spans_week,
        }
    }
}

impl EventStore for InMemoryEventStore {
    fn events_in_week(&self, week: &WeekViewState) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| !e.is_someday)
            .filter(|e| e.id.as_ref().map_or(true, |id| !self.hidden.contains(id)))
            .filter(|e| {
                let start = e.start.date_naive();
                let end = e.end.date_naive();
                let end_exclusive = if e.start.is_date() {
                    end
                } else {
                    end + Duration::days(1)
                };
                week.intersects(start, end_exclusive.max(start))
            })
            .cloned()
            .collect()
    }

    fn someday_events(&self, bucket: BucketKind, week: &WeekViewState) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .events
            .iter()
            .filter(|e| Self::in_bucket(e, bucket, week))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.order.unwrap_or(u32::MAX));
        events
    }

    fn draft_status(&self) -> ActivityKind {
        self.status
    }

    fn dispatch(&mut self, command: StoreCommand) -> Result<()> {
        log::debug!("Store dispatch: {}", command.label());
        match command {
            StoreCommand::Create { mut event } => {
                if event.is_someday && event.order.is_none() {
                    event.order = Some(self.events.iter().filter(|e| e.is_someday).count() as u32);
                }
                let id = self.allocate_id();
                event.id = Some(id);
                self.events.push(event);
            }
            StoreCommand::Update { event }
            | StoreCommand::Convert { event }
            | StoreCommand::Migrate { event, .. } => self.replace(event)?,
            StoreCommand::Delete { id } => {
                let before = self.events.len();
                self.events.retain(|e| e.id.as_deref() != Some(id.as_str()));
                if self.events.len() == before {
                    bail!("event {} not found", id);
                }
                self.hidden.remove(&id);
            }
            StoreCommand::Reorder { order, .. } => {
                for entry in order {
                    let event = self
                        .events
                        .iter_mut()
                        .find(|e| e.id.as_deref() == Some(entry.id.as_str()))
                        .ok_or_else(|| anyhow!("event {} not found", entry.id))?;
                    event.order = Some(entry.order);
                }
            }
            StoreCommand::DraftStart { activity, .. } => self.status = activity,
            StoreCommand::DraftDiscard => self.status = ActivityKind::Idle,
            StoreCommand::RemoveFromWeekView { id } => {
                self.hidden.insert(id);
            }
        }
        Ok(())
    }
}

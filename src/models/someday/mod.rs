// Someday module
// Ordered, capacity-limited backlog buckets of undated events

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PlannerError, PlannerResult};
use crate::models::event::Event;
use crate::models::week::WeekViewState;
use crate::utils::date::{start_of_month, start_of_next_month};

/// Which backlog a someday item lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketKind {
    /// "This week"
    Week,
    /// "This month"
    Month,
}

impl BucketKind {
    /// Date span `[start, end)` a bucket covers for the displayed week.
    /// The month bucket follows the month the week starts in.
    pub fn range(self, week: &WeekViewState) -> (NaiveDate, NaiveDate) {
        match self {
            BucketKind::Week => (week.start, week.end_exclusive()),
            BucketKind::Month => (start_of_month(week.start), start_of_next_month(week.start)),
        }
    }
}

impl fmt::Display for BucketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKind::Week => write!(f, "week"),
            BucketKind::Month => write!(f, "month"),
        }
    }
}

/// One persisted `order` assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub id: String,
    pub order: u32,
}

/// Ordered ids of the someday events in one bucket.
///
/// Ids are unique; position in `ids` is the explicit `order` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SomedayBucket {
    kind: BucketKind,
    ids: Vec<String>,
    capacity: usize,
}

impl SomedayBucket {
    pub fn new(kind: BucketKind, capacity: usize) -> Self {
        Self {
            kind,
            ids: Vec::new(),
            capacity,
        }
    }

    /// Build a bucket from store events, sorted by their persisted `order`.
    /// Events without an id or with a repeated id are skipped.
    pub fn from_events(kind: BucketKind, events: &[Event], capacity: usize) -> Self {
        let mut ordered: Vec<&Event> = events.iter().filter(|e| e.id.is_some()).collect();
        ordered.sort_by_key(|e| e.order.unwrap_or(u32::MAX));

        let mut bucket = Self::new(kind, capacity);
        for event in ordered {
            if let Some(id) = &event.id {
                if !bucket.contains(id) {
                    bucket.ids.push(id.clone());
                }
            }
        }
        bucket
    }

    pub fn kind(&self) -> BucketKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= self.capacity
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|existing| existing == id)
    }

    /// Insert `id` at `index` (clamped to the end)
    pub fn insert(&mut self, index: usize, id: impl Into<String>) -> PlannerResult<()> {
        let id = id.into();
        if self.contains(&id) {
            return Err(PlannerError::DuplicateId(id));
        }
        let index = index.min(self.ids.len());
        self.ids.insert(index, id);
        Ok(())
    }

    /// Remove `id`, returning the position it held
    pub fn remove(&mut self, id: &str) -> Option<usize> {
        let index = self.position(id)?;
        self.ids.remove(index);
        Some(index)
    }

    /// Explicit order values for every id, matching their current positions
    pub fn order_entries(&self) -> Vec<OrderEntry> {
        self.ids
            .iter()
            .enumerate()
            .map(|(order, id)| OrderEntry {
                id: id.clone(),
                order: order as u32,
            })
            .collect()
    }
}

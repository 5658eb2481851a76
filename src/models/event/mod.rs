// Event module
// Canonical persisted event shape handed to the event store

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Priority/category tag carried by every event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Unassigned,
    Work,
    #[serde(rename = "self")]
    SelfCare,
    Relationships,
}

/// Where an event was first created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Created in this planner
    #[default]
    Native,
    /// Pulled in from an external calendar
    Imported,
}

/// Storage-format boundary: a plain calendar date for all-day and someday
/// events, an offset-qualified timestamp for timed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl EventTime {
    pub fn is_date(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// Calendar date of this boundary, in the boundary's own offset
    pub fn date_naive(&self) -> NaiveDate {
        match self {
            EventTime::Date(date) => *date,
            EventTime::DateTime(dt) => dt.date_naive(),
        }
    }

    /// Shift by `delta`, keeping the same representation (and offset)
    pub fn shifted(&self, delta: Duration) -> EventTime {
        match self {
            EventTime::Date(date) => EventTime::Date(*date + delta),
            EventTime::DateTime(dt) => EventTime::DateTime(*dt + delta),
        }
    }

    /// Signed distance from `self` to `other`; `None` when the representations differ
    pub fn until(&self, other: &EventTime) -> Option<Duration> {
        match (self, other) {
            (EventTime::Date(a), EventTime::Date(b)) => Some(*b - *a),
            (EventTime::DateTime(a), EventTime::DateTime(b)) => Some(*b - *a),
            _ => None,
        }
    }
}

/// Persisted calendar event.
///
/// All-day and someday ranges use exclusive end dates:
/// `2024-01-01..2024-01-02` covers one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub is_someday: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Event {
    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), String> {
        let duration = self
            .start
            .until(&self.end)
            .ok_or("Event start and end must use the same format")?;

        if duration < Duration::zero() {
            return Err("Event end must not be before its start".to_string());
        }

        if (self.is_all_day || self.is_someday) && !self.start.is_date() {
            return Err("All-day and someday events must carry date boundaries".to_string());
        }

        if !self.is_all_day && !self.is_someday && self.start.is_date() {
            return Err("Timed events must carry date-time boundaries".to_string());
        }

        Ok(())
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Get the duration of the event
    pub fn duration(&self) -> Duration {
        self.start.until(&self.end).unwrap_or_else(Duration::zero)
    }

    /// Copy of this event with both boundaries moved by `delta`
    pub fn shifted_by(&self, delta: Duration) -> Event {
        Event {
            start: self.start.shifted(delta),
            end: self.end.shifted(delta),
            ..self.clone()
        }
    }
}

/// Builder for creating events with optional fields
#[derive(Default)]
pub struct EventBuilder {
    id: Option<String>,
    user: Option<String>,
    title: String,
    description: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
    is_all_day: bool,
    is_someday: bool,
    priority: Priority,
    origin: Origin,
    order: Option<u32>,
}

impl EventBuilder {
    /// Create a new event builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Timed range with explicit offsets
    pub fn timed(mut self, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        self.start = Some(EventTime::DateTime(start));
        self.end = Some(EventTime::DateTime(end));
        self.is_all_day = false;
        self
    }

    /// All-day range; `end` is exclusive
    pub fn all_day(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(EventTime::Date(start));
        self.end = Some(EventTime::Date(end));
        self.is_all_day = true;
        self
    }

    /// Undated backlog item spanning its bucket's range; `end` is exclusive
    pub fn someday(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(EventTime::Date(start));
        self.end = Some(EventTime::Date(end));
        self.is_someday = true;
        self.is_all_day = false;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    /// Build the event
    pub fn build(self) -> Result<Event, String> {
        let start = self.start.ok_or("Event start is required")?;
        let end = self.end.ok_or("Event end is required")?;

        let event = Event {
            id: self.id,
            user: self.user,
            title: self.title,
            description: self.description,
            start,
            end,
            is_all_day: self.is_all_day,
            is_someday: self.is_someday,
            priority: self.priority,
            origin: self.origin,
            order: self.order,
        };

        event.validate()?;
        Ok(event)
    }
}

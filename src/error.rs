//! Error types for the week planner.

use thiserror::Error;

use crate::models::someday::BucketKind;

/// Errors that can occur while configuring or driving the draft engine.
///
/// Timing races (a pointer event arriving before layout, or after the draft
/// was discarded) are not errors; handlers simply return no effects.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid grid measurements: {0}")]
    InvalidMeasurements(String),

    #[error("Someday {bucket} bucket is full ({capacity} items)")]
    BucketFull { bucket: BucketKind, capacity: usize },

    #[error("Event already in bucket: {0}")]
    DuplicateId(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Invalid event range: {0}")]
    InvalidRange(String),

    #[error("Time zone error: {0}")]
    TimeZone(String),
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

//! Resize boundary flip.
//!
//! When the controlled boundary is dragged past the fixed one, the two swap
//! roles so the range stays ordered and the gesture continues smoothly.

use crate::models::draft::Boundary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOutcome<T> {
    /// Boundary under pointer control after this step
    pub controlled: Boundary,
    pub start: T,
    pub end: T,
    /// The controlled boundary changed on this step
    pub flipped: bool,
}

/// Apply `candidate` to the `controlled` boundary of a range whose other
/// boundary sits at `fixed`. Always yields `start <= end`.
pub fn resolve_resize<T: Ord + Copy>(controlled: Boundary, candidate: T, fixed: T) -> ResizeOutcome<T> {
    match controlled {
        Boundary::End if candidate < fixed => ResizeOutcome {
            controlled: Boundary::Start,
            start: candidate,
            end: fixed,
            flipped: true,
        },
        Boundary::End => ResizeOutcome {
            controlled: Boundary::End,
            start: fixed,
            end: candidate,
            flipped: false,
        },
        Boundary::Start if candidate > fixed => ResizeOutcome {
            controlled: Boundary::End,
            start: fixed,
            end: candidate,
            flipped: true,
        },
        Boundary::Start => ResizeOutcome {
            controlled: Boundary::Start,
            start: candidate,
            end: fixed,
            flipped: false,
        },
    }
}

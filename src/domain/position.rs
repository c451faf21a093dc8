//! Sparse fractional positions for ordering siblings.
//!
//! Lists on a board and cards in a list are sorted by an opaque numeric key.
//! New entities are appended `GAP` past the last sibling and moved entities
//! land on the midpoint of their new neighbors, so no sibling ever has to be
//! rewritten on a single insert. Repeated bisection at the same spot eventually
//! runs out of `f64` precision; that is reported as
//! [`BoardlyError::PositionExhausted`] and the caller renumbers the sequence
//! with [`renumber`].

use crate::error::{BoardlyError, Result};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// Spacing between freshly allocated positions.
pub const GAP: f64 = 1024.0;

/// Minimum spacing, relative to the neighbors' magnitude, that can still be bisected.
const MIN_RELATIVE_SPACING: f64 = 2.0 * f64::EPSILON;

/// Ordering key of a list or card among its siblings. Always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Position(f64);

impl Position {
    /// Creates a position, rejecting NaN and infinities.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(BoardlyError::InvalidPosition(value));
        }
        // -0.0 and 0.0 must compare equal under both == and Ord
        Ok(Self(if value == 0.0 { 0.0 } else { value }))
    }

    /// The first position handed out in an empty sequence.
    pub fn initial() -> Self {
        Self(GAP)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl TryFrom<f64> for Position {
    type Error = BoardlyError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Position> for f64 {
    fn from(position: Position) -> Self {
        position.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position for a new entity placed after `last`, or the initial position when
/// the sequence is empty.
pub fn append_position(last: Option<Position>) -> Result<Position> {
    let Some(last) = last else {
        return Ok(Position::initial());
    };

    let next = last.0 + GAP;
    if !next.is_finite() || next <= last.0 {
        return Err(BoardlyError::PositionExhausted {
            before: last.0,
            after: f64::INFINITY,
        });
    }
    Ok(Position(next))
}

/// Position strictly between `before` and `after`.
///
/// A missing `before` means insertion at the head, a missing `after` means
/// insertion at the tail. Both missing is the empty-sequence case.
///
/// # Errors
///
/// * [`BoardlyError::InvalidNeighbors`] when `before >= after`.
/// * [`BoardlyError::PositionExhausted`] when the neighbors are too close to
///   split; renumber the siblings and retry.
///
/// # Examples
/// ```
/// use boardly_core::domain::position::{insert_between, Position};
///
/// let before = Position::new(1024.0).unwrap();
/// let after = Position::new(2048.0).unwrap();
/// let mid = insert_between(Some(before), Some(after)).unwrap();
/// assert_eq!(mid.value(), 1536.0);
/// ```
pub fn insert_between(before: Option<Position>, after: Option<Position>) -> Result<Position> {
    match (before, after) {
        (None, None) => Ok(Position::initial()),
        (Some(before), None) => append_position(Some(before)),
        (None, Some(after)) => {
            let prev = after.0 - GAP;
            if !prev.is_finite() || prev >= after.0 {
                return Err(BoardlyError::PositionExhausted {
                    before: f64::NEG_INFINITY,
                    after: after.0,
                });
            }
            Position::new(prev)
        }
        (Some(before), Some(after)) => midpoint(before.0, after.0),
    }
}

fn midpoint(before: f64, after: f64) -> Result<Position> {
    if before >= after {
        return Err(BoardlyError::InvalidNeighbors { before, after });
    }

    let spacing = after - before;
    let scale = before.abs().max(after.abs()).max(1.0);
    // Halve each bound before summing; both the sum and the spacing overflow near f64::MAX
    let mid = before / 2.0 + after / 2.0;

    if spacing <= MIN_RELATIVE_SPACING * scale || mid <= before || mid >= after {
        return Err(BoardlyError::PositionExhausted { before, after });
    }
    Position::new(mid)
}

/// Fresh, evenly spaced positions `GAP, 2 * GAP, ..., count * GAP`.
pub fn renumber(count: usize) -> Vec<Position> {
    (1..=count).map(|i| Position(i as f64 * GAP)).collect()
}

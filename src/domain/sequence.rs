use crate::domain::position::{self, Position};
use crate::error::Result;

/// An entity ordered among its siblings by a stored [`Position`].
pub trait Positioned {
    type Id: PartialEq + Clone;

    fn id(&self) -> &Self::Id;
    fn position(&self) -> Position;
    fn set_position(&mut self, position: Position);
}

/// A new stored position for one sibling.
#[derive(Debug, Clone, PartialEq)]
pub struct Renumbered<Id> {
    pub id: Id,
    pub position: Position,
}

/// Sorts siblings by ascending position. Ties keep their current order.
pub fn sort_siblings<T: Positioned>(siblings: &mut [T]) {
    siblings.sort_by_key(|s| s.position());
}

/// True when positions are strictly ascending, i.e. sorted with no duplicates.
pub fn is_strictly_ordered<T: Positioned>(siblings: &[T]) -> bool {
    siblings
        .windows(2)
        .all(|pair| pair[0].position() < pair[1].position())
}

/// Position for a new sibling appended after the last one.
pub fn next_position<T: Positioned>(siblings: &[T]) -> Result<Position> {
    position::append_position(siblings.last().map(Positioned::position))
}

/// Position that puts an entity at final index `index` among `siblings`.
///
/// If `moving` is one of the siblings it is ignored when picking neighbors, so
/// the index is interpreted the way a drop target reports it: after the moved
/// entity has been lifted out. An index past the end appends.
pub fn position_for_index<T: Positioned>(
    siblings: &[T],
    index: usize,
    moving: Option<&T::Id>,
) -> Result<Position> {
    let remaining: Vec<Position> = siblings
        .iter()
        .filter(|s| moving != Some(s.id()))
        .map(Positioned::position)
        .collect();

    let index = index.min(remaining.len());
    let before = index.checked_sub(1).map(|i| remaining[i]);
    let after = remaining.get(index).copied();

    position::insert_between(before, after)
}

/// Reassigns `GAP, 2 * GAP, ...` in current order.
///
/// Only siblings whose stored position actually changed are reported, so a
/// second pass over an already defragmented sequence returns nothing.
pub fn defragment<T: Positioned>(siblings: &mut [T]) -> Vec<Renumbered<T::Id>> {
    let fresh = position::renumber(siblings.len());

    siblings
        .iter_mut()
        .zip(fresh)
        .filter_map(|(sibling, position)| {
            if sibling.position() == position {
                return None;
            }
            sibling.set_position(position);
            Some(Renumbered {
                id: sibling.id().clone(),
                position,
            })
        })
        .collect()
}

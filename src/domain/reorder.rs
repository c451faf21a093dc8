//! Drag-and-drop reordering of cards and lists.
//!
//! A drop reports where the dragged entity ended up as a droppable container
//! plus a final index inside it. Planning turns that into stored positions:
//! normally a single update for the moved entity, or, when the neighbors are
//! too close to split, a renumbering of the destination siblings first.

use crate::domain::board::{Board, BoardId, CardId, ListId};
use crate::domain::position::Position;
use crate::domain::sequence::{self, Renumbered};
use crate::error::{BoardlyError, Result};
use serde::{Deserialize, Serialize};

/// Which kind of entity was dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKind {
    Card,
    #[serde(alias = "DEFAULT")]
    List,
}

/// A container and index a draggable sits at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraggableLocation {
    pub droppable_id: String,
    pub index: usize,
}

/// Outcome of a drag gesture as reported by the board UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropResult {
    pub draggable_id: String,
    #[serde(rename = "type")]
    pub kind: DragKind,
    pub source: DraggableLocation,
    /// Missing when the entity was dropped outside any container
    #[serde(default)]
    pub destination: Option<DraggableLocation>,
}

/// A stored position to write back to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PositionUpdate {
    Card {
        id: CardId,
        list_id: ListId,
        board_id: BoardId,
        position: Position,
    },
    List {
        id: ListId,
        board_id: BoardId,
        position: Position,
    },
}

impl PositionUpdate {
    pub fn position(&self) -> Position {
        match self {
            Self::Card { position, .. } | Self::List { position, .. } => *position,
        }
    }
}

/// Position writes needed to carry out one drop
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    /// Sibling renumbering, present only when the destination was exhausted
    pub renumbered: Vec<PositionUpdate>,
    pub moved: PositionUpdate,
}

impl MovePlan {
    /// Updates in the order they must be sent: renumbering first
    pub fn updates(&self) -> impl Iterator<Item = &PositionUpdate> {
        self.renumbered.iter().chain(std::iter::once(&self.moved))
    }

    pub fn defragmented(&self) -> bool {
        !self.renumbered.is_empty()
    }
}

impl Board {
    /// Plans the position writes for a drop.
    ///
    /// Returns `None` when nothing moved: dropped outside any container or back
    /// onto its source slot.
    pub fn plan_drop(&self, drop: &DropResult) -> Result<Option<MovePlan>> {
        let Some(destination) = &drop.destination else {
            return Ok(None);
        };
        if destination == &drop.source {
            return Ok(None);
        }

        let plan = match drop.kind {
            DragKind::Card => {
                let card_id: CardId = drop.draggable_id.parse()?;
                let list_id: ListId = destination.droppable_id.parse()?;
                self.plan_card_move(&card_id, &list_id, destination.index)?
            }
            // A board has a single list container, so its droppable id carries nothing
            DragKind::List => {
                let list_id: ListId = drop.draggable_id.parse()?;
                self.plan_list_move(&list_id, destination.index)?
            }
        };
        Ok(Some(plan))
    }

    /// Plans moving a card to `index` within `target` (which may be its own list)
    pub fn plan_card_move(
        &self,
        card_id: &CardId,
        target: &ListId,
        index: usize,
    ) -> Result<MovePlan> {
        if self.find_card(card_id).is_none() {
            return Err(BoardlyError::CardNotFound(card_id.to_string()));
        }
        let list = self.list(target)?;

        let (position, renumbered) = place(&list.cards, index, card_id)?;
        if !renumbered.is_empty() {
            tracing::info!(
                list_id = %list.id,
                renumbered = renumbered.len(),
                "card positions exhausted, renumbering list"
            );
        }

        let card_update = |id: CardId, position: Position| PositionUpdate::Card {
            id,
            list_id: list.id,
            board_id: self.id,
            position,
        };
        Ok(MovePlan {
            renumbered: renumbered
                .into_iter()
                .map(|r| card_update(r.id, r.position))
                .collect(),
            moved: card_update(*card_id, position),
        })
    }

    /// Plans moving a list to `index` among the board's lists
    pub fn plan_list_move(&self, list_id: &ListId, index: usize) -> Result<MovePlan> {
        self.list(list_id)?;

        let (position, renumbered) = place(&self.lists, index, list_id)?;
        if !renumbered.is_empty() {
            tracing::info!(
                board_id = %self.id,
                renumbered = renumbered.len(),
                "list positions exhausted, renumbering board"
            );
        }

        let list_update = |id: ListId, position: Position| PositionUpdate::List {
            id,
            board_id: self.id,
            position,
        };
        Ok(MovePlan {
            renumbered: renumbered
                .into_iter()
                .map(|r| list_update(r.id, r.position))
                .collect(),
            moved: list_update(*list_id, position),
        })
    }

    /// Applies a plan to this snapshot and restores sibling order
    pub fn apply_plan(&mut self, plan: &MovePlan) -> Result<()> {
        for update in plan.updates() {
            self.apply_update(update)?;
        }
        self.normalize();
        Ok(())
    }

    /// Applies one position write, moving a card across lists when needed
    pub fn apply_update(&mut self, update: &PositionUpdate) -> Result<()> {
        match update {
            PositionUpdate::Card {
                id,
                list_id,
                position,
                ..
            } => {
                self.list(list_id)?;
                let mut card = self
                    .lists
                    .iter_mut()
                    .find_map(|l| l.remove_card(id))
                    .ok_or_else(|| BoardlyError::CardNotFound(id.to_string()))?;
                card.list_id = *list_id;
                card.position = *position;
                self.insert_card(card)
            }
            PositionUpdate::List { id, position, .. } => {
                let list = self
                    .find_list_mut(id)
                    .ok_or_else(|| BoardlyError::ListNotFound(id.to_string()))?;
                list.position = *position;
                sequence::sort_siblings(&mut self.lists);
                Ok(())
            }
        }
    }
}

/// Position for `moving` at `index` among `siblings`, renumbering the other
/// siblings first if their spacing has run out.
fn place<T>(
    siblings: &[T],
    index: usize,
    moving: &T::Id,
) -> Result<(Position, Vec<Renumbered<T::Id>>)>
where
    T: sequence::Positioned + Clone,
{
    match sequence::position_for_index(siblings, index, Some(moving)) {
        Ok(position) => Ok((position, Vec::new())),
        Err(BoardlyError::PositionExhausted { before, after }) => {
            tracing::debug!(before, after, index, "no room between neighbors");
            let mut others: Vec<T> = siblings
                .iter()
                .filter(|s| s.id() != moving)
                .cloned()
                .collect();
            let renumbered = sequence::defragment(&mut others);
            let position = sequence::position_for_index(&others, index, None)?;
            Ok((position, renumbered))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::{Card, List};

    fn pos(value: f64) -> Position {
        Position::new(value).unwrap()
    }

    /// Board with two lists: "Todo" holding cards at the given positions and an empty "Done".
    fn board(card_positions: &[f64]) -> Board {
        let mut board = Board::new(BoardId::new(), "Sprint".to_string());
        let todo = List::new(ListId::new(), board.id, "Todo".to_string(), pos(1024.0));
        let done = List::new(ListId::new(), board.id, "Done".to_string(), pos(2048.0));
        let todo_id = todo.id;
        board.insert_list(todo);
        board.insert_list(done);
        for (i, p) in card_positions.iter().enumerate() {
            board
                .insert_card(Card::new(
                    CardId::new(),
                    todo_id,
                    board.id,
                    format!("Card {}", i + 1),
                    pos(*p),
                ))
                .unwrap();
        }
        board
    }

    fn descriptions(list: &List) -> Vec<&str> {
        list.cards.iter().map(|c| c.description.as_str()).collect()
    }

    fn card_drop(board: &Board, card: usize, to_list: usize, index: usize) -> DropResult {
        DropResult {
            draggable_id: board.lists[0].cards[card].id.to_string(),
            kind: DragKind::Card,
            source: DraggableLocation {
                droppable_id: board.lists[0].id.to_string(),
                index: card,
            },
            destination: Some(DraggableLocation {
                droppable_id: board.lists[to_list].id.to_string(),
                index,
            }),
        }
    }

    #[test]
    fn test_drop_outside_is_noop() {
        let board = board(&[1024.0, 2048.0]);
        let mut drop = card_drop(&board, 0, 0, 1);
        drop.destination = None;
        assert!(board.plan_drop(&drop).unwrap().is_none());
    }

    #[test]
    fn test_drop_on_source_is_noop() {
        let board = board(&[1024.0, 2048.0]);
        let drop = card_drop(&board, 1, 0, 1);
        assert!(board.plan_drop(&drop).unwrap().is_none());
    }

    #[test]
    fn test_reorder_card_within_list() {
        let mut board = board(&[1024.0, 2048.0, 3072.0]);
        let drop = card_drop(&board, 2, 0, 0);

        let plan = board.plan_drop(&drop).unwrap().unwrap();
        assert!(!plan.defragmented());
        assert_eq!(plan.moved.position(), pos(0.0));

        board.apply_plan(&plan).unwrap();
        assert_eq!(descriptions(&board.lists[0]), vec!["Card 3", "Card 1", "Card 2"]);
        assert!(board.is_ordered());
    }

    #[test]
    fn test_move_card_down_within_list() {
        let mut board = board(&[1024.0, 2048.0, 3072.0]);
        // Card 1 dropped at final index 1: between Card 2 and Card 3
        let drop = card_drop(&board, 0, 0, 1);

        let plan = board.plan_drop(&drop).unwrap().unwrap();
        assert_eq!(plan.moved.position(), pos(2560.0));

        board.apply_plan(&plan).unwrap();
        assert_eq!(descriptions(&board.lists[0]), vec!["Card 2", "Card 1", "Card 3"]);
    }

    #[test]
    fn test_move_card_to_other_list() {
        let mut board = board(&[1024.0, 2048.0]);
        let done_id = board.lists[1].id;
        let drop = card_drop(&board, 0, 1, 0);

        let plan = board.plan_drop(&drop).unwrap().unwrap();
        match &plan.moved {
            PositionUpdate::Card {
                list_id, position, ..
            } => {
                assert_eq!(*list_id, done_id);
                assert_eq!(*position, pos(1024.0));
            }
            other => panic!("unexpected update {other:?}"),
        }

        board.apply_plan(&plan).unwrap();
        assert_eq!(descriptions(&board.lists[0]), vec!["Card 2"]);
        assert_eq!(descriptions(&board.lists[1]), vec!["Card 1"]);
        assert_eq!(board.lists[1].cards[0].list_id, done_id);
    }

    #[test]
    fn test_exhausted_neighbors_trigger_renumbering() {
        let tight = 1.0 + f64::EPSILON;
        let mut board = board(&[1.0, tight, 3072.0]);
        // Card 3 between Card 1 and Card 2, which have no room left
        let drop = card_drop(&board, 2, 0, 1);

        let plan = board.plan_drop(&drop).unwrap().unwrap();
        assert!(plan.defragmented());
        assert_eq!(plan.renumbered.len(), 2);
        assert_eq!(plan.renumbered[0].position(), pos(1024.0));
        assert_eq!(plan.renumbered[1].position(), pos(2048.0));
        assert_eq!(plan.moved.position(), pos(1536.0));

        board.apply_plan(&plan).unwrap();
        assert_eq!(descriptions(&board.lists[0]), vec!["Card 1", "Card 3", "Card 2"]);
        assert!(board.is_ordered());
    }

    #[test]
    fn test_move_list() {
        let mut board = board(&[]);
        let done = &board.lists[1];
        let drop = DropResult {
            draggable_id: done.id.to_string(),
            kind: DragKind::List,
            source: DraggableLocation {
                droppable_id: board.id.to_string(),
                index: 1,
            },
            destination: Some(DraggableLocation {
                droppable_id: board.id.to_string(),
                index: 0,
            }),
        };

        let plan = board.plan_drop(&drop).unwrap().unwrap();
        assert_eq!(plan.moved.position(), pos(0.0));

        board.apply_plan(&plan).unwrap();
        assert_eq!(board.lists[0].name, "Done");
        assert_eq!(board.lists[1].name, "Todo");
    }

    #[test]
    fn test_move_list_with_named_board_container() {
        let mut board = board(&[]);
        let json = format!(
            r#"{{
                "draggableId": "{}",
                "type": "DEFAULT",
                "source": {{ "droppableId": "board", "index": 1 }},
                "destination": {{ "droppableId": "board", "index": 0 }}
            }}"#,
            board.lists[1].id
        );
        let drop: DropResult = serde_json::from_str(&json).unwrap();

        let plan = board.plan_drop(&drop).unwrap().unwrap();
        assert_eq!(plan.moved.position(), pos(0.0));

        board.apply_plan(&plan).unwrap();
        assert_eq!(board.lists[0].name, "Done");
        assert_eq!(board.lists[1].name, "Todo");
    }

    #[test]
    fn test_unknown_card() {
        let board = board(&[1024.0]);
        let result = board.plan_card_move(&CardId::new(), &board.lists[0].id, 0);
        assert!(matches!(result, Err(BoardlyError::CardNotFound(_))));
    }

    #[test]
    fn test_unknown_target_list() {
        let board = board(&[1024.0]);
        let card_id = board.lists[0].cards[0].id;
        let result = board.plan_card_move(&card_id, &ListId::new(), 0);
        assert!(matches!(result, Err(BoardlyError::ListNotFound(_))));
    }

    #[test]
    fn test_drop_result_from_ui_json() {
        let json = r#"{
            "draggableId": "3f1c2d4e-5a6b-4c7d-8e9f-0a1b2c3d4e5f",
            "type": "card",
            "source": { "droppableId": "list-a", "index": 0 },
            "destination": { "droppableId": "list-b", "index": 2 }
        }"#;
        let drop: DropResult = serde_json::from_str(json).unwrap();
        assert_eq!(drop.kind, DragKind::Card);
        assert_eq!(drop.destination.unwrap().index, 2);

        let json = r#"{
            "draggableId": "x",
            "type": "DEFAULT",
            "source": { "droppableId": "board", "index": 0 },
            "destination": null
        }"#;
        let drop: DropResult = serde_json::from_str(json).unwrap();
        assert_eq!(drop.kind, DragKind::List);
        assert!(drop.destination.is_none());
    }
}

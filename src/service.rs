//! Board operations that combine position allocation with the backend.
//!
//! [`BoardService`] owns a snapshot of one board. Every operation computes
//! positions locally, sends the resulting writes to the backend and only then
//! updates the snapshot, so a failed request leaves the snapshot as it was and
//! the caller can retry.

use crate::{
    api::{BoardApi, NewCard, NewList},
    domain::{sequence, Board, BoardId, Card, DropResult, List, ListId, MovePlan, PositionUpdate},
    error::{BoardlyError, Result},
};

pub struct BoardService<A> {
    api: A,
    board: Board,
}

impl<A: BoardApi> BoardService<A> {
    /// Wraps an already loaded board
    pub fn new(api: A, mut board: Board) -> Self {
        board.normalize();
        Self { api, board }
    }

    /// Fetches a board from the backend
    pub async fn load(api: A, board_id: &BoardId) -> Result<Self> {
        let board = api.fetch_board(board_id).await?;
        Ok(Self::new(api, board))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Replaces the snapshot with the backend's current state
    pub async fn refresh(&mut self) -> Result<()> {
        let mut board = self.api.fetch_board(&self.board.id).await?;
        board.normalize();
        self.board = board;
        Ok(())
    }

    /// Appends a card to the end of a list
    pub async fn create_card(&mut self, list_id: &ListId, description: &str) -> Result<Card> {
        if description.trim().is_empty() {
            return Err(BoardlyError::Validation(
                "card description must not be empty".to_string(),
            ));
        }

        let position = match self.board.list(list_id)?.next_card_position() {
            Err(BoardlyError::PositionExhausted { .. }) => {
                self.defragment_cards(list_id).await?;
                self.board.list(list_id)?.next_card_position()?
            }
            other => other?,
        };

        let new_card = NewCard {
            list_id: *list_id,
            board_id: self.board.id,
            description: description.to_string(),
            position,
        };
        let card = self.api.insert_card(&new_card).await.inspect_err(|e| {
            tracing::warn!(list_id = %list_id, error = %e, "failed to create card");
        })?;

        tracing::debug!(card_id = %card.id, position = %card.position, "created card");
        self.board.insert_card(card.clone())?;
        Ok(card)
    }

    /// Appends a list to the end of the board
    pub async fn create_list(&mut self, name: &str) -> Result<List> {
        if name.trim().is_empty() {
            return Err(BoardlyError::Validation(
                "list name must not be empty".to_string(),
            ));
        }

        let position = match self.board.next_list_position() {
            Err(BoardlyError::PositionExhausted { .. }) => {
                self.defragment_lists().await?;
                self.board.next_list_position()?
            }
            other => other?,
        };

        let new_list = NewList {
            board_id: self.board.id,
            name: name.to_string(),
            position,
        };
        let list = self.api.insert_list(&new_list).await.inspect_err(|e| {
            tracing::warn!(board_id = %self.board.id, error = %e, "failed to create list");
        })?;

        tracing::debug!(list_id = %list.id, position = %list.position, "created list");
        self.board.insert_list(list.clone());
        Ok(list)
    }

    /// Persists a drag-and-drop move.
    ///
    /// Returns the executed plan, or `None` when the drop changed nothing.
    pub async fn handle_drop(&mut self, drop: &DropResult) -> Result<Option<MovePlan>> {
        let Some(plan) = self.board.plan_drop(drop)? else {
            return Ok(None);
        };

        self.send(plan.updates()).await?;
        self.board.apply_plan(&plan)?;
        Ok(Some(plan))
    }

    /// Renumbers the cards of a list to evenly spaced positions
    pub async fn defragment_cards(&mut self, list_id: &ListId) -> Result<()> {
        let board_id = self.board.id;
        let mut cards = self.board.list(list_id)?.cards.clone();
        let updates: Vec<PositionUpdate> = sequence::defragment(&mut cards)
            .into_iter()
            .map(|r| PositionUpdate::Card {
                id: r.id,
                list_id: *list_id,
                board_id,
                position: r.position,
            })
            .collect();

        tracing::info!(list_id = %list_id, renumbered = updates.len(), "defragmenting cards");
        self.commit(&updates).await
    }

    /// Renumbers the lists of the board to evenly spaced positions
    pub async fn defragment_lists(&mut self) -> Result<()> {
        let board_id = self.board.id;
        let mut lists = self.board.lists.clone();
        let updates: Vec<PositionUpdate> = sequence::defragment(&mut lists)
            .into_iter()
            .map(|r| PositionUpdate::List {
                id: r.id,
                board_id,
                position: r.position,
            })
            .collect();

        tracing::info!(board_id = %board_id, renumbered = updates.len(), "defragmenting lists");
        self.commit(&updates).await
    }

    async fn commit(&mut self, updates: &[PositionUpdate]) -> Result<()> {
        self.send(updates.iter()).await?;
        for update in updates {
            self.board.apply_update(update)?;
        }
        self.board.normalize();
        Ok(())
    }

    async fn send<'a>(&self, updates: impl Iterator<Item = &'a PositionUpdate>) -> Result<()> {
        for update in updates {
            self.api.update_position(update).await.inspect_err(|e| {
                tracing::warn!(
                    position = %update.position(),
                    error = %e,
                    "failed to write position"
                );
            })?;
        }
        Ok(())
    }
}

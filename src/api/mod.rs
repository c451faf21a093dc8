use crate::{
    domain::{Board, BoardId, Card, List, ListId, Position, PositionUpdate},
    error::Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(feature = "file-backend")]
pub mod file_backend;
pub mod graphql;

/// Fields sent when creating a card; the backend assigns the identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCard {
    pub list_id: ListId,
    pub board_id: BoardId,
    pub description: String,
    pub position: Position,
}

/// Fields sent when creating a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewList {
    pub board_id: BoardId,
    pub name: String,
    pub position: Position,
}

/// Backend of record for boards, lists and cards
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Loads a board with its lists and cards
    async fn fetch_board(&self, id: &BoardId) -> Result<Board>;

    /// Creates a card and returns it as stored
    async fn insert_card(&self, card: &NewCard) -> Result<Card>;

    /// Creates a list and returns it as stored
    async fn insert_list(&self, list: &NewList) -> Result<List>;

    /// Writes a new position (and, for cards, owning list)
    async fn update_position(&self, update: &PositionUpdate) -> Result<()>;
}

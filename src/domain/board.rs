use crate::domain::position::Position;
use crate::domain::sequence::{self, Positioned};
use crate::error::{BoardlyError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = BoardlyError;

            fn from_str(s: &str) -> Result<Self> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| BoardlyError::InvalidId(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a board
    BoardId
);
uuid_id!(
    /// Unique identifier for a list
    ListId
);
uuid_id!(
    /// Unique identifier for a card
    CardId
);

/// A card within a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub list_id: ListId,
    pub board_id: BoardId,
    pub description: String,
    pub position: Position,
}

impl Card {
    pub fn new(
        id: CardId,
        list_id: ListId,
        board_id: BoardId,
        description: String,
        position: Position,
    ) -> Self {
        Self {
            id,
            list_id,
            board_id,
            description,
            position,
        }
    }
}

impl Positioned for Card {
    type Id = CardId;

    fn id(&self) -> &CardId {
        &self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

/// A list (column) on a board, holding cards ordered by position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub board_id: BoardId,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl List {
    pub fn new(id: ListId, board_id: BoardId, name: String, position: Position) -> Self {
        Self {
            id,
            board_id,
            name,
            position,
            cards: Vec::new(),
        }
    }

    /// Position for a card appended to the end of this list
    pub fn next_card_position(&self) -> Result<Position> {
        sequence::next_position(&self.cards)
    }

    pub fn find_card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    /// Inserts a card, keeping the cards sorted by position
    pub fn insert_card(&mut self, card: Card) {
        self.cards.push(card);
        sequence::sort_siblings(&mut self.cards);
    }

    /// Removes a card from this list
    pub fn remove_card(&mut self, id: &CardId) -> Option<Card> {
        let index = self.cards.iter().position(|c| &c.id == id)?;
        Some(self.cards.remove(index))
    }
}

impl Positioned for List {
    type Id = ListId;

    fn id(&self) -> &ListId {
        &self.id
    }

    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

/// Snapshot of a board with its lists and cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default)]
    pub lists: Vec<List>,
}

impl Board {
    pub fn new(id: BoardId, name: String) -> Self {
        Self {
            id,
            name,
            lists: Vec::new(),
        }
    }

    /// Sorts lists and every list's cards by position.
    ///
    /// Backend results are not trusted to arrive ordered.
    pub fn normalize(&mut self) {
        sequence::sort_siblings(&mut self.lists);
        for list in &mut self.lists {
            sequence::sort_siblings(&mut list.cards);
        }
    }

    /// Position for a list appended to the end of the board
    pub fn next_list_position(&self) -> Result<Position> {
        sequence::next_position(&self.lists)
    }

    pub fn find_list(&self, id: &ListId) -> Option<&List> {
        self.lists.iter().find(|l| &l.id == id)
    }

    pub fn find_list_mut(&mut self, id: &ListId) -> Option<&mut List> {
        self.lists.iter_mut().find(|l| &l.id == id)
    }

    /// Gets a list or reports it missing
    pub fn list(&self, id: &ListId) -> Result<&List> {
        self.find_list(id)
            .ok_or_else(|| BoardlyError::ListNotFound(id.to_string()))
    }

    /// Finds a card on any list of the board
    pub fn find_card(&self, id: &CardId) -> Option<&Card> {
        self.lists.iter().find_map(|l| l.find_card(id))
    }

    /// Inserts a list, keeping lists sorted by position
    pub fn insert_list(&mut self, list: List) {
        self.lists.push(list);
        sequence::sort_siblings(&mut self.lists);
    }

    /// Inserts a card into the list it names
    pub fn insert_card(&mut self, card: Card) -> Result<()> {
        let list = self
            .find_list_mut(&card.list_id)
            .ok_or_else(|| BoardlyError::ListNotFound(card.list_id.to_string()))?;
        list.insert_card(card);
        Ok(())
    }

    /// Checks the ordering invariant on every sibling sequence
    pub fn is_ordered(&self) -> bool {
        sequence::is_strictly_ordered(&self.lists)
            && self
                .lists
                .iter()
                .all(|l| sequence::is_strictly_ordered(&l.cards))
    }
}

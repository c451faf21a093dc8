//! # Boardly Core
//!
//! Ordering and request logic for Boardly kanban boards.
//!
//! Lists on a board and cards in a list are ordered by sparse fractional
//! positions: appends land `GAP` past the last sibling, moves land on the
//! midpoint of the new neighbors, and a sibling sequence is renumbered only
//! when bisection runs out of precision. The crate also carries the thin
//! layer that turns creates and drag-and-drop moves into backend writes.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;

// Re-export commonly used types
pub use api::{graphql::GraphqlClient, BoardApi, NewCard, NewList};
pub use config::{ClientConfig, Session};
pub use domain::{
    board::{Board, BoardId, Card, CardId, List, ListId},
    position::{append_position, insert_between, renumber, Position, GAP},
    reorder::{DragKind, DraggableLocation, DropResult, MovePlan, PositionUpdate},
};
pub use error::{BoardlyError, Result};
pub use service::BoardService;

#[cfg(feature = "file-backend")]
pub use api::file_backend::FileBackend;

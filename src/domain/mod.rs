pub mod board;
pub mod position;
pub mod reorder;
pub mod sequence;

pub use board::{Board, BoardId, Card, CardId, List, ListId};
pub use position::{append_position, insert_between, renumber, Position, GAP};
pub use reorder::{DragKind, DraggableLocation, DropResult, MovePlan, PositionUpdate};
pub use sequence::{defragment, Positioned, Renumbered};

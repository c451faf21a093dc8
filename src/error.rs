use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardlyError>;

#[derive(Debug, Error)]
pub enum BoardlyError {
    #[error("No distinguishable position left between {before} and {after}")]
    PositionExhausted { before: f64, after: f64 },

    #[error("Neighbor positions out of order: {before} must be below {after}")]
    InvalidNeighbors { before: f64, after: f64 },

    #[error("Invalid position value: {0}")]
    InvalidPosition(f64),

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL error: {}", .0.join("; "))]
    Graphql(Vec<String>),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

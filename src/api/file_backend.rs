use crate::{
    api::{BoardApi, NewCard, NewList},
    domain::{Board, BoardId, Card, CardId, List, ListId, PositionUpdate},
    error::{BoardlyError, Result},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};

/// Local backend keeping each board as a JSON document on disk
pub struct FileBackend {
    root_path: PathBuf,
    // Serializes load-modify-save cycles
    write_lock: Mutex<()>,
}

impl FileBackend {
    const DATA_DIR: &'static str = ".boardly";
    const BOARDS_DIR: &'static str = "boards";

    /// Creates a new FileBackend for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::DATA_DIR),
            write_lock: Mutex::new(()),
        }
    }

    fn boards_dir(&self) -> PathBuf {
        self.root_path.join(Self::BOARDS_DIR)
    }

    fn board_file(&self, id: &BoardId) -> PathBuf {
        self.boards_dir().join(format!("{}.json", id))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Creates the directory layout
    pub async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.boards_dir()).await
    }

    pub async fn is_initialized(&self) -> bool {
        self.boards_dir().exists()
    }

    /// Creates and stores an empty board
    pub async fn create_board(&self, name: &str) -> Result<Board> {
        let board = Board::new(BoardId::new(), name.to_string());
        self.save_board(&board).await?;
        Ok(board)
    }

    pub async fn save_board(&self, board: &Board) -> Result<()> {
        self.ensure_directory_exists(&self.boards_dir()).await?;

        let json = serde_json::to_string_pretty(board)?;
        fs::write(self.board_file(&board.id), json).await?;
        Ok(())
    }

    pub async fn load_board(&self, id: &BoardId) -> Result<Board> {
        let file_path = self.board_file(id);

        if !file_path.exists() {
            return Err(BoardlyError::BoardNotFound(id.to_string()));
        }

        let contents = fs::read_to_string(&file_path).await?;
        let mut board: Board = serde_json::from_str(&contents)?;
        board.normalize();
        Ok(board)
    }
}

#[async_trait]
impl BoardApi for FileBackend {
    async fn fetch_board(&self, id: &BoardId) -> Result<Board> {
        self.load_board(id).await
    }

    async fn insert_card(&self, card: &NewCard) -> Result<Card> {
        let _guard = self.write_lock.lock().await;
        let mut board = self.load_board(&card.board_id).await?;

        let stored = Card::new(
            CardId::new(),
            card.list_id,
            card.board_id,
            card.description.clone(),
            card.position,
        );
        board.insert_card(stored.clone())?;
        self.save_board(&board).await?;
        Ok(stored)
    }

    async fn insert_list(&self, list: &NewList) -> Result<List> {
        let _guard = self.write_lock.lock().await;
        let mut board = self.load_board(&list.board_id).await?;

        let stored = List::new(ListId::new(), list.board_id, list.name.clone(), list.position);
        board.insert_list(stored.clone());
        self.save_board(&board).await?;
        Ok(stored)
    }

    async fn update_position(&self, update: &PositionUpdate) -> Result<()> {
        let board_id = match update {
            PositionUpdate::Card { board_id, .. } => board_id,
            PositionUpdate::List { board_id, .. } => board_id,
        };

        let _guard = self.write_lock.lock().await;
        let mut board = self.load_board(board_id).await?;
        board.apply_update(update)?;
        self.save_board(&board).await
    }
}

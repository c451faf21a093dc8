//! GraphQL backend client.
//!
//! Speaks the Hasura-style schema the board service exposes:
//! `insert_card`/`insert_list` with `objects`, `update_card`/`update_list`
//! with `where`/`_set`, and `board_by_pk` for loading.

use crate::{
    api::{BoardApi, NewCard, NewList},
    config::{ClientConfig, Session},
    domain::{Board, BoardId, Card, CardId, List, ListId, Position, PositionUpdate},
    error::{BoardlyError, Result},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

const FETCH_BOARD_QUERY: &str = r#"
query fetchBoard($id: uuid!) {
  board_by_pk(id: $id) {
    id
    name
    lists(order_by: { position: asc }) {
      id
      board_id
      name
      position
      cards(order_by: { position: asc }) {
        id
        list_id
        board_id
        description
        position
      }
    }
  }
}
"#;

const CREATE_CARD_MUTATION: &str = r#"
mutation createCard($listId: uuid!, $position: numeric, $description: String, $boardId: uuid!) {
  insert_card(
    objects: {
      list_id: $listId
      position: $position
      description: $description
      board_id: $boardId
    }
  ) {
    returning {
      id
      list_id
      board_id
      description
      position
    }
  }
}
"#;

const CREATE_LIST_MUTATION: &str = r#"
mutation createList($boardId: uuid!, $position: numeric, $name: String) {
  insert_list(objects: { board_id: $boardId, position: $position, name: $name }) {
    returning {
      id
      board_id
      name
      position
    }
  }
}
"#;

const MOVE_CARD_MUTATION: &str = r#"
mutation moveCard($id: uuid!, $listId: uuid!, $position: numeric) {
  update_card(where: { id: { _eq: $id } }, _set: { list_id: $listId, position: $position }) {
    affected_rows
  }
}
"#;

const MOVE_LIST_MUTATION: &str = r#"
mutation moveList($id: uuid!, $position: numeric) {
  update_list(where: { id: { _eq: $id } }, _set: { position: $position }) {
    affected_rows
  }
}
"#;

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

#[derive(Deserialize)]
struct Returning<T> {
    returning: Vec<T>,
}

#[derive(Deserialize)]
struct AffectedRows {
    affected_rows: u64,
}

#[derive(Deserialize)]
struct CardRow {
    id: CardId,
    list_id: ListId,
    board_id: BoardId,
    description: Option<String>,
    position: Position,
}

impl From<CardRow> for Card {
    fn from(row: CardRow) -> Self {
        Card::new(
            row.id,
            row.list_id,
            row.board_id,
            row.description.unwrap_or_default(),
            row.position,
        )
    }
}

#[derive(Deserialize)]
struct ListRow {
    id: ListId,
    board_id: BoardId,
    name: Option<String>,
    position: Position,
    #[serde(default)]
    cards: Vec<CardRow>,
}

impl From<ListRow> for List {
    fn from(row: ListRow) -> Self {
        let mut list = List::new(row.id, row.board_id, row.name.unwrap_or_default(), row.position);
        list.cards = row.cards.into_iter().map(Card::from).collect();
        list
    }
}

#[derive(Deserialize)]
struct BoardRow {
    id: BoardId,
    name: Option<String>,
    #[serde(default)]
    lists: Vec<ListRow>,
}

#[derive(Deserialize)]
struct FetchBoardData {
    board_by_pk: Option<BoardRow>,
}

#[derive(Deserialize)]
struct InsertCardData {
    insert_card: Returning<CardRow>,
}

#[derive(Deserialize)]
struct InsertListData {
    insert_list: Returning<ListRow>,
}

#[derive(Deserialize)]
struct UpdateCardData {
    update_card: AffectedRows,
}

#[derive(Deserialize)]
struct UpdateListData {
    update_list: AffectedRows,
}

/// HTTP client for the GraphQL backend
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
    session: Option<Session>,
}

impl GraphqlClient {
    /// Creates a client for the configured endpoint.
    ///
    /// Requests carry `Authorization: Bearer <token>` when a session is given.
    pub fn new(config: &ClientConfig, session: Option<Session>) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.graphql_url.trim().to_string(),
            session,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&GraphqlRequest { query, variables });
        if let Some(session) = &self.session {
            request = request.header(reqwest::header::AUTHORIZATION, session.bearer());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "graphql request rejected");
            return Err(BoardlyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GraphqlResponse<T> = response.json().await?;
        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            tracing::warn!(errors = ?messages, "graphql request returned errors");
            return Err(BoardlyError::Graphql(messages));
        }
        body.data
            .ok_or_else(|| BoardlyError::Graphql(vec!["response carried no data".to_string()]))
    }
}

fn first_returned<T>(rows: Returning<T>, mutation: &str) -> Result<T> {
    rows.returning
        .into_iter()
        .next()
        .ok_or_else(|| BoardlyError::Graphql(vec![format!("{mutation} returned no rows")]))
}

#[async_trait]
impl BoardApi for GraphqlClient {
    async fn fetch_board(&self, id: &BoardId) -> Result<Board> {
        let data: FetchBoardData = self.execute(FETCH_BOARD_QUERY, json!({ "id": id })).await?;
        let row = data
            .board_by_pk
            .ok_or_else(|| BoardlyError::BoardNotFound(id.to_string()))?;

        let mut board = Board::new(row.id, row.name.unwrap_or_default());
        board.lists = row.lists.into_iter().map(List::from).collect();
        board.normalize();
        Ok(board)
    }

    async fn insert_card(&self, card: &NewCard) -> Result<Card> {
        let variables = json!({
            "listId": card.list_id,
            "position": card.position,
            "description": card.description,
            "boardId": card.board_id,
        });
        let data: InsertCardData = self.execute(CREATE_CARD_MUTATION, variables).await?;
        Ok(first_returned(data.insert_card, "insert_card")?.into())
    }

    async fn insert_list(&self, list: &NewList) -> Result<List> {
        let variables = json!({
            "boardId": list.board_id,
            "position": list.position,
            "name": list.name,
        });
        let data: InsertListData = self.execute(CREATE_LIST_MUTATION, variables).await?;
        Ok(first_returned(data.insert_list, "insert_list")?.into())
    }

    async fn update_position(&self, update: &PositionUpdate) -> Result<()> {
        match update {
            PositionUpdate::Card {
                id,
                list_id,
                position,
                ..
            } => {
                let variables = json!({ "id": id, "listId": list_id, "position": position });
                let data: UpdateCardData = self.execute(MOVE_CARD_MUTATION, variables).await?;
                if data.update_card.affected_rows == 0 {
                    return Err(BoardlyError::CardNotFound(id.to_string()));
                }
            }
            PositionUpdate::List { id, position, .. } => {
                let variables = json!({ "id": id, "position": position });
                let data: UpdateListData = self.execute(MOVE_LIST_MUTATION, variables).await?;
                if data.update_list.affected_rows == 0 {
                    return Err(BoardlyError::ListNotFound(id.to_string()));
                }
            }
        }
        Ok(())
    }
}

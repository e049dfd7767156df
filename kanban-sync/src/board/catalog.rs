//! The boards available to the user and which one is selected.

use crate::api::{BoardApi, SyncAction};
use crate::error::Result;
use crate::session::BoardSession;
use crate::surface::ErrorSurface;
use crate::types::{BoardDirectory, BoardId, BoardSummary};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct CatalogState {
    boards: BoardDirectory,
    selected: Option<BoardId>,
}

/// Lists and creates boards, and forwards the selection to a session
pub struct BoardCatalog {
    api: Arc<dyn BoardApi>,
    surface: Arc<dyn ErrorSurface>,
    session: Arc<BoardSession>,
    state: RwLock<CatalogState>,
}

impl BoardCatalog {
    /// A catalog sharing the session's server and Error Surface
    pub fn new(session: Arc<BoardSession>) -> Self {
        Self {
            api: session.api_handle(),
            surface: session.surface_handle(),
            session,
            state: RwLock::new(CatalogState::default()),
        }
    }

    pub fn session(&self) -> &Arc<BoardSession> {
        &self.session
    }

    /// Fetch the board list from the server
    pub async fn refresh(&self) -> Result<BoardDirectory> {
        match self.api.list_boards().await {
            Ok(boards) => {
                debug!(count = boards.len(), "board list loaded");
                self.state.write().await.boards = boards.clone();
                Ok(boards)
            }
            Err(error) => {
                warn!(%error, "board list failed");
                self.surface.report(SyncAction::LoadBoards.failure_message());
                Err(error)
            }
        }
    }

    /// The boards from the last refresh or create
    pub async fn boards(&self) -> BoardDirectory {
        self.state.read().await.boards.clone()
    }

    pub async fn selected(&self) -> Option<BoardId> {
        self.state.read().await.selected
    }

    /// Create a board on the server, list it and select it
    pub async fn create_board(&self, name: &str) -> Result<BoardSummary> {
        crate::guards::not_blank("name", name)?;
        let created = match self.api.create_board(name).await {
            Ok(created) => created,
            Err(error) => {
                warn!(%error, name, "board create failed");
                self.surface.report(SyncAction::CreateBoard.failure_message());
                return Err(error);
            }
        };
        info!(board = %created.id, name = %created.name, "board created");

        self.state
            .write()
            .await
            .boards
            .insert(created.id, created.name.clone());
        self.select(created.id).await?;
        Ok(created)
    }

    /// Select a board and load it into the session if it changed
    pub async fn select(&self, id: BoardId) -> Result<()> {
        self.state.write().await.selected = Some(id);
        self.session.on_selected_board_changed(id).await
    }
}

//! Game catalog port definition.

use async_trait::async_trait;

use crate::domain::entities::{Game, GameDetail, GameId};
use crate::domain::errors::CatalogError;

/// Port for reading the game catalog.
#[async_trait]
pub trait GameCatalogPort: Send + Sync {
    /// Lists every game in the catalog.
    async fn list_games(&self) -> Result<Vec<Game>, CatalogError>;

    /// Fetches the full record of one game.
    async fn game_detail(&self, id: GameId) -> Result<GameDetail, CatalogError>;
}

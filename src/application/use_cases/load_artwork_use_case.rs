//! Artwork loading for catalog screens.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, info};

use crate::application::dto::{ArtworkOutcome, GameShowcase, GameThumbnail};
use crate::domain::entities::{Game, GameId, Transform};
use crate::domain::errors::CatalogError;
use crate::domain::ports::{GameCatalogPort, ImageFetcherPort};

/// Loads games together with their artwork, one fetch per image, in parallel.
#[derive(Clone)]
pub struct LoadArtworkUseCase {
    catalog: Arc<dyn GameCatalogPort>,
    fetcher: Arc<dyn ImageFetcherPort>,
    max_concurrent: usize,
    thumbnail_transform: Transform,
}

impl LoadArtworkUseCase {
    /// Creates new use case.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn GameCatalogPort>,
        fetcher: Arc<dyn ImageFetcherPort>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            max_concurrent: max_concurrent.max(1),
            thumbnail_transform: Transform::CenterCropSquare,
        }
    }

    /// Sets the transform applied to list thumbnails.
    #[must_use]
    pub const fn with_thumbnail_transform(mut self, transform: Transform) -> Self {
        self.thumbnail_transform = transform;
        self
    }

    /// Lists the catalog and loads the thumbnails of the first `limit` games.
    ///
    /// # Errors
    /// Returns error if the catalog cannot be listed. Image failures are
    /// reported per game instead.
    pub async fn browse(&self, limit: Option<usize>) -> Result<Vec<GameThumbnail>, CatalogError> {
        let mut games = self.catalog.list_games().await?;
        if let Some(limit) = limit {
            games.truncate(limit);
        }
        info!(count = games.len(), "Loading thumbnails");
        Ok(self.load_thumbnails(games).await)
    }

    /// Loads thumbnails for `games`, preserving their order.
    pub async fn load_thumbnails(&self, games: Vec<Game>) -> Vec<GameThumbnail> {
        let transform = self.thumbnail_transform;
        let fetcher = &self.fetcher;

        stream::iter(games)
            .map(|game| async move {
                let result = fetcher.fetch(&game.thumbnail, transform).await;
                let thumbnail = ArtworkOutcome {
                    url: game.thumbnail.clone(),
                    result,
                };
                GameThumbnail { game, thumbnail }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }

    /// Fetches one game's record and all of its artwork, uncropped.
    ///
    /// # Errors
    /// Returns error if the game record cannot be fetched.
    pub async fn showcase(&self, id: GameId) -> Result<GameShowcase, CatalogError> {
        let detail = self.catalog.game_detail(id).await?;
        let urls: Vec<String> = detail
            .artwork_urls()
            .into_iter()
            .map(str::to_string)
            .collect();
        debug!(id, count = urls.len(), "Loading game artwork");

        let fetcher = &self.fetcher;
        let artwork = stream::iter(urls)
            .map(|url| async move {
                let result = fetcher.fetch(&url, Transform::Identity).await;
                ArtworkOutcome { url, result }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        Ok(GameShowcase { detail, artwork })
    }
}

//! Artwork loading results.

use crate::domain::entities::{FetchedImage, Game, GameDetail};
use crate::domain::errors::FetchError;

/// Outcome of loading one artwork URL.
#[derive(Debug, Clone)]
pub struct ArtworkOutcome {
    /// Requested URL.
    pub url: String,
    /// Image, or the reason it could not be loaded.
    pub result: Result<FetchedImage, FetchError>,
}

impl ArtworkOutcome {
    /// Returns true if the image loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.result.is_ok()
    }
}

/// A catalog entry together with its thumbnail.
#[derive(Debug, Clone)]
pub struct GameThumbnail {
    /// The game.
    pub game: Game,
    /// Thumbnail outcome.
    pub thumbnail: ArtworkOutcome,
}

/// A game's full record together with all of its artwork.
#[derive(Debug, Clone)]
pub struct GameShowcase {
    /// The game.
    pub detail: GameDetail,
    /// Thumbnail first, then screenshots in catalog order.
    pub artwork: Vec<ArtworkOutcome>,
}

impl GameShowcase {
    /// Number of artwork entries that loaded.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.artwork.iter().filter(|a| a.is_loaded()).count()
    }
}

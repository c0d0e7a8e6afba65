mod artwork;
mod game;

pub use artwork::{
    CacheKey, DecodedImage, FetchRequest, FetchedImage, ImageSource, Transform, center_square,
};
pub use game::{Game, GameDetail, GameId, MinimumSystemRequirements, Screenshot};

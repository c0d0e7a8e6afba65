mod artwork_dto;

pub use artwork_dto::{ArtworkOutcome, GameShowcase, GameThumbnail};

//! Use case implementations.

mod load_artwork_use_case;

pub use load_artwork_use_case::LoadArtworkUseCase;

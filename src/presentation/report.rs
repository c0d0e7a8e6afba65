//! Plain-text rendering of artwork results.

use std::fmt::Write as _;
use std::path::Path;

use crate::application::{ArtworkOutcome, GameShowcase, GameThumbnail};
use crate::domain::entities::FetchedImage;

fn describe(outcome: &ArtworkOutcome) -> String {
    match &outcome.result {
        Ok(fetched) => describe_image(fetched),
        Err(e) => format!("unavailable ({e})"),
    }
}

/// One-line summary of a fetched image.
#[must_use]
pub fn describe_image(fetched: &FetchedImage) -> String {
    format!(
        "{}x{} via {}",
        fetched.image.width(),
        fetched.image.height(),
        fetched.source
    )
}

/// Renders one line per game: id, title, genre and thumbnail state.
#[must_use]
pub fn render_thumbnails(rows: &[GameThumbnail]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{:>6}  {:<40}  {:<16}  {}",
            row.game.id,
            truncate(&row.game.title, 40),
            truncate(&row.game.genre, 16),
            describe(&row.thumbnail)
        );
    }
    out
}

/// Renders a game's record and the state of each artwork URL.
#[must_use]
pub fn render_showcase(showcase: &GameShowcase) -> String {
    let detail = &showcase.detail;
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", detail.title, detail.id);
    let _ = writeln!(
        out,
        "{} | {} | {} | {}",
        detail.genre, detail.platform, detail.publisher, detail.release_date
    );
    if !detail.short_description.is_empty() {
        let _ = writeln!(out, "{}", detail.short_description);
    }
    if let Some(req) = &detail.minimum_system_requirements {
        let fields = [
            ("OS", &req.os),
            ("CPU", &req.processor),
            ("Memory", &req.memory),
            ("Graphics", &req.graphics),
            ("Storage", &req.storage),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                let _ = writeln!(out, "  {label}: {value}");
            }
        }
    }
    let _ = writeln!(
        out,
        "Artwork: {}/{} loaded",
        showcase.loaded_count(),
        showcase.artwork.len()
    );
    for outcome in &showcase.artwork {
        let _ = writeln!(out, "  {}  {}", describe(outcome), outcome.url);
    }
    out
}

/// Writes the image as PNG.
///
/// # Errors
/// Returns error if encoding or writing fails.
pub fn save_png(fetched: &FetchedImage, path: &Path) -> image::ImageResult<()> {
    fetched
        .image
        .pixels()
        .save_with_format(path, image::ImageFormat::Png)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

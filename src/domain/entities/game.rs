//! Catalog records.

use serde::{Deserialize, Serialize};

/// Game identifier in the catalog.
pub type GameId = u64;

/// Summary record returned by the game list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Catalog identifier.
    pub id: GameId,
    /// Display title.
    pub title: String,
    /// Thumbnail image URL.
    pub thumbnail: String,
    /// One-line description.
    pub short_description: String,
    /// Link to the game itself.
    pub game_url: String,
    /// Genre label.
    pub genre: String,
    /// Platform label (e.g. "PC (Windows)").
    pub platform: String,
    /// Publisher name.
    pub publisher: String,
    /// Developer name.
    pub developer: String,
    /// Release date as published by the catalog.
    pub release_date: String,
    /// Catalog profile page.
    pub freetogame_profile_url: String,
}

impl PartialEq for Game {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Game {}

impl std::hash::Hash for Game {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Full record returned by the game detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDetail {
    /// Catalog identifier.
    pub id: GameId,
    /// Display title.
    pub title: String,
    /// Thumbnail image URL.
    pub thumbnail: String,
    /// Availability status (e.g. "Live").
    #[serde(default)]
    pub status: String,
    /// One-line description.
    pub short_description: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Link to the game itself.
    pub game_url: String,
    /// Genre label.
    pub genre: String,
    /// Platform label.
    pub platform: String,
    /// Publisher name.
    pub publisher: String,
    /// Developer name.
    pub developer: String,
    /// Release date as published by the catalog.
    pub release_date: String,
    /// Catalog profile page.
    pub freetogame_profile_url: String,
    /// Minimum hardware, absent for browser games.
    #[serde(default)]
    pub minimum_system_requirements: Option<MinimumSystemRequirements>,
    /// Screenshot gallery.
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
}

impl GameDetail {
    /// Returns every artwork URL of this game, thumbnail first.
    #[must_use]
    pub fn artwork_urls(&self) -> Vec<&str> {
        std::iter::once(self.thumbnail.as_str())
            .chain(self.screenshots.iter().map(|s| s.image.as_str()))
            .collect()
    }
}

/// Minimum hardware requirements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinimumSystemRequirements {
    /// Operating system.
    #[serde(default)]
    pub os: Option<String>,
    /// Processor.
    #[serde(default)]
    pub processor: Option<String>,
    /// Memory.
    #[serde(default)]
    pub memory: Option<String>,
    /// Graphics card.
    #[serde(default)]
    pub graphics: Option<String>,
    /// Disk space.
    #[serde(default)]
    pub storage: Option<String>,
}

/// A screenshot entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    /// Screenshot identifier.
    pub id: u64,
    /// Image URL.
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_JSON: &str = r#"{
        "id": 452,
        "title": "Call Of Duty: Warzone",
        "thumbnail": "https://www.freetogame.com/g/452/thumbnail.jpg",
        "status": "Live",
        "short_description": "A standalone free-to-play battle royale.",
        "description": "Long text",
        "game_url": "https://www.freetogame.com/open/call-of-duty-warzone",
        "genre": "Shooter",
        "platform": "Windows",
        "publisher": "Activision",
        "developer": "Infinity Ward",
        "release_date": "2020-03-10",
        "freetogame_profile_url": "https://www.freetogame.com/call-of-duty-warzone",
        "minimum_system_requirements": {
            "os": "Windows 7 64-Bit",
            "processor": "Intel Core i3-4340",
            "memory": "8GB RAM",
            "graphics": "NVIDIA GeForce GTX 670",
            "storage": "175GB HD space"
        },
        "screenshots": [
            {"id": 1124, "image": "https://www.freetogame.com/g/452/1.jpg"},
            {"id": 1125, "image": "https://www.freetogame.com/g/452/2.jpg"}
        ]
    }"#;

    #[test]
    fn test_parse_detail() {
        let detail: GameDetail = serde_json::from_str(DETAIL_JSON).unwrap();
        assert_eq!(detail.id, 452);
        assert_eq!(detail.screenshots.len(), 2);
        assert_eq!(
            detail
                .minimum_system_requirements
                .as_ref()
                .and_then(|r| r.memory.as_deref()),
            Some("8GB RAM")
        );
    }

    #[test]
    fn test_artwork_urls_thumbnail_first() {
        let detail: GameDetail = serde_json::from_str(DETAIL_JSON).unwrap();
        let urls = detail.artwork_urls();
        assert_eq!(
            urls,
            vec![
                "https://www.freetogame.com/g/452/thumbnail.jpg",
                "https://www.freetogame.com/g/452/1.jpg",
                "https://www.freetogame.com/g/452/2.jpg",
            ]
        );
    }

    #[test]
    fn test_games_compare_by_id() {
        let detail: GameDetail = serde_json::from_str(DETAIL_JSON).unwrap();
        let a = Game {
            id: detail.id,
            title: detail.title.clone(),
            thumbnail: detail.thumbnail.clone(),
            short_description: String::new(),
            game_url: String::new(),
            genre: String::new(),
            platform: String::new(),
            publisher: String::new(),
            developer: String::new(),
            release_date: String::new(),
            freetogame_profile_url: String::new(),
        };
        let mut b = a.clone();
        b.title = "Renamed".to_string();
        assert_eq!(a, b);
    }
}

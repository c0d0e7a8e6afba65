//! Game catalog HTTP client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::entities::{Game, GameDetail, GameId};
use crate::domain::errors::CatalogError;
use crate::domain::ports::GameCatalogPort;

/// Default catalog API root.
pub const CATALOG_API_BASE: &str = "https://www.freetogame.com/api";

/// Catalog REST client.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Creates client with custom base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                CatalogError::configuration(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self::with_client(client, base_url))
    }

    /// Creates client reusing an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<(StatusCode, Option<T>), CatalogError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url = %url, "Failed to reach catalog API");
                if e.is_timeout() {
                    CatalogError::request_failed("request timed out")
                } else if e.is_connect() {
                    CatalogError::request_failed("failed to connect to catalog")
                } else {
                    CatalogError::request_failed(e.to_string())
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok((status, None));
        }

        let body = response.json::<T>().await.map_err(|e| {
            warn!(error = %e, url = %url, "Failed to parse catalog response");
            CatalogError::decode(e.to_string())
        })?;

        Ok((status, Some(body)))
    }
}

#[async_trait]
impl GameCatalogPort for CatalogClient {
    async fn list_games(&self) -> Result<Vec<Game>, CatalogError> {
        let url = format!("{}/games", self.base_url);
        debug!("Fetching game list");

        match self.get_json::<Vec<Game>>(&url, &[]).await? {
            (_, Some(games)) => {
                debug!(count = games.len(), "Game list fetched");
                Ok(games)
            }
            (status, None) => Err(CatalogError::RequestFailed {
                status: Some(status.as_u16()),
                message: format!("HTTP {status}"),
            }),
        }
    }

    async fn game_detail(&self, id: GameId) -> Result<GameDetail, CatalogError> {
        let url = format!("{}/game", self.base_url);
        debug!(id, "Fetching game detail");

        match self
            .get_json::<GameDetail>(&url, &[("id", id.to_string())])
            .await?
        {
            (_, Some(detail)) => Ok(detail),
            (status, None) => {
                debug!(id, status = %status, "Game detail not available");
                Err(CatalogError::GameNotFound { id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn game_json(id: u64, title: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "thumbnail": format!("https://www.freetogame.com/g/{id}/thumbnail.jpg"),
            "short_description": "desc",
            "game_url": "https://www.freetogame.com/open/x",
            "genre": "MMORPG",
            "platform": "PC (Windows)",
            "publisher": "Pub",
            "developer": "Dev",
            "release_date": "2022-01-01",
            "freetogame_profile_url": "https://www.freetogame.com/x"
        })
    }

    #[tokio::test]
    async fn test_list_games() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/games"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                game_json(1, "One"),
                game_json(2, "Two"),
            ])))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base_url(format!("{}/api/", server.uri())).unwrap();
        let games = client.list_games().await.unwrap();

        assert_eq!(games.len(), 2);
        assert_eq!(games[1].title, "Two");
        assert!(games[0].thumbnail.ends_with("/g/1/thumbnail.jpg"));
    }

    #[tokio::test]
    async fn test_list_games_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/games"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base_url(server.uri()).unwrap();
        let err = client.list_games().await.unwrap_err();

        assert!(matches!(
            err,
            CatalogError::RequestFailed {
                status: Some(500),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_game_detail_uses_id_query() {
        let server = MockServer::start().await;
        let mut body = game_json(452, "Warzone");
        body["screenshots"] = serde_json::json!([{"id": 9, "image": "https://x.test/9.jpg"}]);
        Mock::given(method("GET"))
            .and(path("/game"))
            .and(query_param("id", "452"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base_url(server.uri()).unwrap();
        let detail = client.game_detail(452).await.unwrap();

        assert_eq!(detail.title, "Warzone");
        assert_eq!(detail.screenshots.len(), 1);
        assert!(detail.minimum_system_requirements.is_none());
    }

    #[tokio::test]
    async fn test_game_detail_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/game"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base_url(server.uri()).unwrap();
        let err = client.game_detail(7).await.unwrap_err();

        assert!(matches!(err, CatalogError::GameNotFound { id: 7 }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/games"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base_url(server.uri()).unwrap();
        let err = client.list_games().await.unwrap_err();

        assert!(matches!(err, CatalogError::Decode { .. }));
    }
}

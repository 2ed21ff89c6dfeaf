use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{
    error::{FaceitError, FaceitResult},
    models::{FaceitPlayer, MatchHistory, MatchStatsItem},
};

/// Public endpoint of the FACEIT Data API.
pub const DEFAULT_FACEIT_BASE_URL: &str = "https://open.faceit.com/data/v4";

/// Runtime configuration describing how to reach FACEIT.
#[derive(Debug, Clone)]
pub struct FaceitConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl FaceitConfig {
    /// Configuration targeting `base_url`, authenticated with `api_key` when present.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            timeout: Duration::from_secs(10),
        }
    }
}

impl Default for FaceitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FACEIT_BASE_URL, None)
    }
}

/// Thin async wrapper over the FACEIT endpoints used by the overlays.
#[derive(Clone)]
pub struct FaceitClient {
    client: Client,
    base_url: Arc<str>,
    api_key: Option<Arc<str>>,
}

impl FaceitClient {
    /// Build a client; no request is sent until a lookup is made.
    pub fn new(config: FaceitConfig) -> FaceitResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| FaceitError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            api_key: config.api_key.map(Arc::from),
        })
    }

    /// Whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Look a player up by nickname.
    pub async fn find_player(&self, nickname: &str) -> FaceitResult<FaceitPlayer> {
        let path = "players";
        match self.get_json(path, &[("nickname", nickname)]).await? {
            Some(player) => Ok(player),
            None => Err(FaceitError::PlayerNotFound {
                nickname: nickname.to_owned(),
            }),
        }
    }

    /// Lifetime CS2 statistics of a player, returned untouched.
    pub async fn lifetime_stats(&self, player_id: &str) -> FaceitResult<Value> {
        let path = format!("players/{player_id}/stats/cs2");
        self.get_json(&path, &[])
            .await?
            .ok_or(FaceitError::RequestStatus {
                path,
                status: StatusCode::NOT_FOUND,
            })
    }

    /// Per-match statistics of the most recent CS2 matches, newest first.
    pub async fn recent_matches(
        &self,
        player_id: &str,
        limit: u32,
    ) -> FaceitResult<Vec<MatchStatsItem>> {
        let path = format!("players/{player_id}/games/cs2/stats");
        let limit = limit.to_string();
        let history: Option<MatchHistory> = self.get_json(&path, &[("limit", &limit)]).await?;
        Ok(history.map(|history| history.items).unwrap_or_default())
    }

    /// GET `path` and decode its JSON body; `Ok(None)` on 404.
    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> FaceitResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let api_key = self.api_key.as_deref().ok_or(FaceitError::MissingApiKey)?;
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(url)
            .bearer_auth(api_key)
            .query(query)
            .send()
            .await
            .map_err(|source| FaceitError::RequestSend {
                path: path.to_owned(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(path, "FACEIT resource not found");
                Ok(None)
            }
            status if status.is_success() => {
                response.json::<T>().await.map(Some).map_err(|source| {
                    FaceitError::DecodeResponse {
                        path: path.to_owned(),
                        source,
                    }
                })
            }
            other => Err(FaceitError::RequestStatus {
                path: path.to_owned(),
                status: other,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = FaceitConfig::new("http://localhost/", Some("   ".into()));
        assert!(config.api_key.is_none());

        let client = FaceitClient::new(config).unwrap();
        assert!(!client.is_configured());
        assert_eq!(&*client.base_url, "http://localhost");
    }

    #[tokio::test]
    async fn lookups_fail_fast_without_api_key() {
        let client = FaceitClient::new(FaceitConfig::default()).unwrap();
        let err = client.find_player("s1mple").await.unwrap_err();
        assert!(matches!(err, FaceitError::MissingApiKey));
    }
}

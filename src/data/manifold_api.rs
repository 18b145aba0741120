use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::data::types::{Bet, Market};

/// Fetch failure: transport error, non-success status, or a body that does
/// not decode. The orchestrator treats all three the same way (degrade to
/// an empty result), so one enum covers the whole taxonomy.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: reqwest::Error,
    },
}

/// Read-only client for the Manifold Markets REST API.
pub struct ManifoldClient {
    client: Client,
    base_url: String,
}

impl ManifoldClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up a single market by its human-readable slug.
    pub async fn fetch_market_by_slug(&self, slug: &str) -> Result<Market, ApiError> {
        let url = format!("{}/slug/{}", self.base_url, slug);
        self.get_json(&url, &[]).await
    }

    /// Full-text market search, ranked by liquidity, open markets only.
    pub async fn search_markets(&self, term: &str, limit: usize) -> Result<Vec<Market>, ApiError> {
        let url = format!("{}/search-markets", self.base_url);
        self.get_json(
            &url,
            &[
                ("term", term),
                ("sort", "liquidity"),
                ("filter", "open"),
                ("limit", &limit.to_string()),
            ],
        )
        .await
    }

    /// Trade events for a market, newest-first per the API; the series
    /// transform re-sorts ascending.
    pub async fn fetch_bets(&self, contract_id: &str, limit: usize) -> Result<Vec<Bet>, ApiError> {
        let url = format!("{}/bets", self.base_url);
        self.get_json(
            &url,
            &[("contractId", contract_id), ("limit", &limit.to_string())],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.json().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ManifoldClient::new("https://api.example.com/v0/".to_string());
        assert_eq!(client.base_url, "https://api.example.com/v0");
    }
}

//! HTTP client with rate limiting for the football data API

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::wire::{parse_fixtures, parse_match_result, parse_odds, parse_prediction};
use super::{Fixture, FixturePrediction, MatchResult, MatchResultVerifier, OddsProvider};
use crate::config::ApiConfig;
use crate::core::value::OutcomeOdds;
use crate::error::{AnalyticsError, Result};

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-apisports-key";

/// Football data API client with request spacing and retry
pub struct ApiFootballClient {
    client: reqwest::Client,
    config: ApiConfig,
    last_request: Arc<Mutex<Instant>>,
}

impl ApiFootballClient {
    /// Create a new client with the given configuration
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            last_request: Arc::new(Mutex::new(Instant::now() - Duration::from_secs(10))),
        })
    }

    /// Wait for rate limit
    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        let delay = Duration::from_millis(self.config.delay_ms);

        if elapsed < delay {
            tokio::time::sleep(delay - elapsed).await;
        }

        *last = Instant::now();
    }

    /// Build URL for an endpoint
    fn build_url(&self, endpoint: &str, query: &[(&str, String)]) -> String {
        let params: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!(
            "{}/{}?{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/'),
            params.join("&")
        )
    }

    /// Fetch a response body with rate limiting and retry
    async fn fetch(&self, url: &str) -> Result<String> {
        for attempt in 0..self.config.max_retries {
            self.wait_for_rate_limit().await;

            let mut request = self.client.get(url);
            if let Some(ref key) = self.config.api_key {
                request = request.header(API_KEY_HEADER, key);
            }

            match request.send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return Ok(response.text().await?);
                    }
                    tracing::warn!(
                        "Request failed with status {} (attempt {}/{})",
                        response.status(),
                        attempt + 1,
                        self.config.max_retries
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}",
                        attempt + 1,
                        self.config.max_retries,
                        e
                    );
                }
            }

            if attempt + 1 < self.config.max_retries {
                let backoff = Duration::from_millis(self.config.delay_ms * (attempt as u64 + 1));
                tokio::time::sleep(backoff).await;
            }
        }

        Err(AnalyticsError::DataUnavailable(format!(
            "Failed to fetch {} after {} attempts",
            url, self.config.max_retries
        )))
    }
}

#[async_trait]
impl OddsProvider for ApiFootballClient {
    async fn fixtures_by_date(&self, date: NaiveDate) -> Result<Vec<Fixture>> {
        let url = self.build_url("fixtures", &[("date", date.format("%Y-%m-%d").to_string())]);
        tracing::info!("Fetching fixtures: {}", url);

        let body = self.fetch(&url).await?;
        parse_fixtures(&body)
    }

    async fn prediction(&self, fixture_id: u64) -> Result<FixturePrediction> {
        let url = self.build_url("predictions", &[("fixture", fixture_id.to_string())]);
        tracing::debug!("Fetching prediction: {}", url);

        let body = self.fetch(&url).await?;
        parse_prediction(&body)
    }

    async fn odds(&self, fixture_id: u64) -> Result<OutcomeOdds> {
        let url = self.build_url("odds", &[("fixture", fixture_id.to_string())]);
        tracing::debug!("Fetching odds: {}", url);

        let body = self.fetch(&url).await?;
        parse_odds(&body, self.config.bookmaker_id)
    }
}

#[async_trait]
impl MatchResultVerifier for ApiFootballClient {
    async fn result(&self, match_id: &str) -> Result<MatchResult> {
        let id: u64 = match_id.trim().parse().map_err(|_| {
            AnalyticsError::DataUnavailable(format!("Not a fixture id: {}", match_id))
        })?;

        let url = self.build_url("fixtures", &[("id", id.to_string())]);
        tracing::debug!("Fetching result: {}", url);

        let body = self.fetch(&url).await?;
        parse_match_result(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiFootballClient {
        ApiFootballClient::new(ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_build_url_fixtures() {
        let c = client("https://v3.football.api-sports.io");
        let url = c.build_url("fixtures", &[("date", "2024-11-30".to_string())]);
        assert_eq!(url, "https://v3.football.api-sports.io/fixtures?date=2024-11-30");
    }

    #[test]
    fn test_build_url_trailing_slash() {
        let c = client("http://localhost:8080/");
        let url = c.build_url("/odds", &[("fixture", "42".to_string())]);
        assert_eq!(url, "http://localhost:8080/odds?fixture=42");
    }

    #[tokio::test]
    async fn test_result_rejects_non_numeric_id() {
        let c = client("http://localhost:1");
        let err = c.result("abc").await.unwrap_err();
        assert!(err.is_unavailable());
    }
}

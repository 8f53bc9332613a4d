//! External football data collaborators
//!
//! Fixtures, model predictions, bookmaker odds and final results come from a
//! football data service. This module defines the interfaces the analytics
//! core needs, the boundary parsing of the service's JSON payloads, and the
//! partial-failure tolerant fan-out that feeds value bet detection.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "api-client")]
//! # async fn run() -> football_ai::error::Result<()> {
//! use football_ai::config::AnalyticsConfig;
//! use football_ai::core::find_value_bets;
//! use football_ai::provider::{collect_match_odds, ApiFootballClient};
//!
//! let config = AnalyticsConfig::from_env();
//! let client = ApiFootballClient::new(config.api.clone())?;
//! let date = chrono::Utc::now().date_naive();
//!
//! let candidates = collect_match_odds(&client, date, &config.priority_leagues).await;
//! for bet in find_value_bets(candidates) {
//!     println!("{} vs {}: {:+.1}", bet.home_team, bet.away_team, bet.value_edge());
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "api-client")]
mod client;
pub mod wire;

#[cfg(feature = "api-client")]
pub use client::ApiFootballClient;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::value::{MatchOdds, OutcomeOdds, OutcomeProbabilities};
use crate::error::{AnalyticsError, Result};

/// Match status as reported by the data service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
    Postponed,
    Cancelled,
    Unknown,
}

impl MatchStatus {
    /// Map a short status code (e.g., "NS", "FT") to a status
    pub fn from_short_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "TBD" | "NS" => MatchStatus::Scheduled,
            "1H" | "HT" | "2H" | "ET" | "BT" | "P" | "LIVE" | "INT" | "SUSP" => MatchStatus::Live,
            "FT" | "AET" | "PEN" => MatchStatus::Finished,
            "PST" => MatchStatus::Postponed,
            "CANC" | "ABD" | "AWD" | "WO" => MatchStatus::Cancelled,
            _ => MatchStatus::Unknown,
        }
    }
}

/// A scheduled or played fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u64,
    pub kickoff: Option<DateTime<Utc>>,
    pub league_id: Option<u64>,
    pub league_name: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub status: MatchStatus,
}

/// Model prediction for a fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixturePrediction {
    pub percent: OutcomeProbabilities,
    pub advice: Option<String>,
}

/// Final (or current) score of a match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub status: MatchStatus,
}

impl MatchResult {
    /// Final score, if the match is finished and both scores are known
    pub fn final_score(&self) -> Option<(u32, u32)> {
        match (self.status, self.home_goals, self.away_goals) {
            (MatchStatus::Finished, Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }
}

/// Source of fixtures, predictions and odds
#[async_trait]
pub trait OddsProvider: Send + Sync {
    async fn fixtures_by_date(&self, date: NaiveDate) -> Result<Vec<Fixture>>;
    async fn prediction(&self, fixture_id: u64) -> Result<FixturePrediction>;
    async fn odds(&self, fixture_id: u64) -> Result<OutcomeOdds>;
}

/// Source of final match results
#[async_trait]
pub trait MatchResultVerifier: Send + Sync {
    async fn result(&self, match_id: &str) -> Result<MatchResult>;
}

/// Fetch prediction and odds for one fixture
pub async fn fetch_match_odds<P>(
    provider: &P,
    fixture: &Fixture,
    priority_leagues: &[u64],
) -> Result<MatchOdds>
where
    P: OddsProvider + ?Sized,
{
    let (prediction, odds) =
        futures::join!(provider.prediction(fixture.id), provider.odds(fixture.id));
    let prediction = prediction?;
    let odds = odds?;

    if odds.is_empty() {
        return Err(AnalyticsError::DataUnavailable(format!(
            "No usable odds for fixture {}",
            fixture.id
        )));
    }

    Ok(MatchOdds {
        fixture_id: fixture.id,
        home_team: fixture.home_team.clone(),
        away_team: fixture.away_team.clone(),
        league: fixture.league_name.clone(),
        predicted: Some(prediction.percent),
        odds,
        is_priority_league: fixture
            .league_id
            .map(|id| priority_leagues.contains(&id))
            .unwrap_or(false),
    })
}

/// Gather odds and predictions for every upcoming fixture on a date
///
/// All fixtures are fetched concurrently. A fixture whose prediction or odds
/// cannot be fetched is skipped without affecting the others. A failure to
/// list fixtures yields an empty result.
pub async fn collect_match_odds<P>(
    provider: &P,
    date: NaiveDate,
    priority_leagues: &[u64],
) -> Vec<MatchOdds>
where
    P: OddsProvider + ?Sized,
{
    let fixtures = match provider.fixtures_by_date(date).await {
        Ok(fixtures) => fixtures,
        Err(e) => {
            warn!("Failed to list fixtures for {}: {}", date, e);
            return Vec::new();
        }
    };

    let upcoming: Vec<&Fixture> = fixtures
        .iter()
        .filter(|f| f.status == MatchStatus::Scheduled)
        .collect();

    let results = join_all(
        upcoming
            .iter()
            .map(|fixture| fetch_match_odds(provider, fixture, priority_leagues)),
    )
    .await;

    let mut candidates = Vec::with_capacity(results.len());
    for (fixture, result) in upcoming.iter().zip(results) {
        match result {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => debug!("Skipping fixture {}: {}", fixture.id, e),
        }
    }

    info!(
        "Collected odds for {}/{} upcoming fixtures on {}",
        candidates.len(),
        upcoming.len(),
        date
    );

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::find_value_bets;
    use std::collections::HashMap;

    struct StubProvider {
        fixtures: Option<Vec<Fixture>>,
        predictions: HashMap<u64, OutcomeProbabilities>,
        odds: HashMap<u64, OutcomeOdds>,
    }

    #[async_trait]
    impl OddsProvider for StubProvider {
        async fn fixtures_by_date(&self, _date: NaiveDate) -> Result<Vec<Fixture>> {
            self.fixtures
                .clone()
                .ok_or_else(|| AnalyticsError::DataUnavailable("fixtures".to_string()))
        }

        async fn prediction(&self, fixture_id: u64) -> Result<FixturePrediction> {
            self.predictions
                .get(&fixture_id)
                .map(|&percent| FixturePrediction {
                    percent,
                    advice: None,
                })
                .ok_or_else(|| AnalyticsError::DataUnavailable(format!("prediction {}", fixture_id)))
        }

        async fn odds(&self, fixture_id: u64) -> Result<OutcomeOdds> {
            self.odds
                .get(&fixture_id)
                .copied()
                .ok_or_else(|| AnalyticsError::DataUnavailable(format!("odds {}", fixture_id)))
        }
    }

    fn fixture(id: u64, league_id: u64, status: MatchStatus) -> Fixture {
        Fixture {
            id,
            kickoff: None,
            league_id: Some(league_id),
            league_name: Some(format!("League {}", league_id)),
            home_team: format!("Home {}", id),
            away_team: format!("Away {}", id),
            status,
        }
    }

    fn percent(home: u8, draw: u8, away: u8) -> OutcomeProbabilities {
        OutcomeProbabilities { home, draw, away }
    }

    fn home_odds(home: f64) -> OutcomeOdds {
        OutcomeOdds {
            home: Some(home),
            draw: None,
            away: None,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 30).unwrap()
    }

    #[test]
    fn test_match_status_from_short_code() {
        assert_eq!(MatchStatus::from_short_code("NS"), MatchStatus::Scheduled);
        assert_eq!(MatchStatus::from_short_code("ft"), MatchStatus::Finished);
        assert_eq!(MatchStatus::from_short_code("PEN"), MatchStatus::Finished);
        assert_eq!(MatchStatus::from_short_code("HT"), MatchStatus::Live);
        assert_eq!(MatchStatus::from_short_code("PST"), MatchStatus::Postponed);
        assert_eq!(MatchStatus::from_short_code("ABD"), MatchStatus::Cancelled);
        assert_eq!(MatchStatus::from_short_code("???"), MatchStatus::Unknown);
    }

    #[test]
    fn test_final_score_requires_finished_match() {
        let finished = MatchResult {
            home_goals: Some(2),
            away_goals: Some(1),
            status: MatchStatus::Finished,
        };
        assert_eq!(finished.final_score(), Some((2, 1)));

        let live = MatchResult {
            status: MatchStatus::Live,
            ..finished
        };
        assert_eq!(live.final_score(), None);

        let missing = MatchResult {
            away_goals: None,
            ..finished
        };
        assert_eq!(missing.final_score(), None);
    }

    #[tokio::test]
    async fn test_collect_match_odds_skips_failed_fixtures() {
        let provider = StubProvider {
            fixtures: Some(vec![
                fixture(1, 39, MatchStatus::Scheduled),
                fixture(2, 500, MatchStatus::Scheduled),
                fixture(3, 500, MatchStatus::Scheduled),
                fixture(4, 500, MatchStatus::Finished),
            ]),
            predictions: HashMap::from([
                (1, percent(50, 25, 25)),
                (2, percent(60, 20, 20)),
                (4, percent(60, 20, 20)),
            ]),
            odds: HashMap::from([(1, home_odds(2.5)), (2, home_odds(2.0)), (3, home_odds(2.0))]),
        };

        let candidates = collect_match_odds(&provider, date(), &[39]).await;
        let ids: Vec<u64> = candidates.iter().map(|c| c.fixture_id).collect();

        // 3 has no prediction, 4 already finished
        assert_eq!(ids, vec![1, 2]);
        assert!(candidates[0].is_priority_league);
        assert!(!candidates[1].is_priority_league);

        let ranked: Vec<u64> = find_value_bets(candidates).map(|b| b.fixture_id).collect();
        assert_eq!(ranked, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_collect_match_odds_skips_unusable_odds() {
        let provider = StubProvider {
            fixtures: Some(vec![fixture(1, 39, MatchStatus::Scheduled)]),
            predictions: HashMap::from([(1, percent(50, 25, 25))]),
            odds: HashMap::from([(1, home_odds(1.0))]),
        };

        assert!(collect_match_odds(&provider, date(), &[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_collect_match_odds_fixture_listing_failure() {
        let provider = StubProvider {
            fixtures: None,
            predictions: HashMap::new(),
            odds: HashMap::new(),
        };

        assert!(collect_match_odds(&provider, date(), &[39]).await.is_empty());
    }
}

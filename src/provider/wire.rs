//! Boundary parsing of football data API payloads
//!
//! Responses are wrapped in `{ "response": [...] }`. Every field is optional
//! on the wire; entries lacking what the analytics core needs are dropped
//! here so downstream code only sees complete values.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{Fixture, FixturePrediction, MatchResult, MatchStatus};
use crate::core::odds::sanitize_quote;
use crate::core::value::{OutcomeOdds, OutcomeProbabilities};
use crate::error::{AnalyticsError, Result};

/// Name of the 1X2 market in odds payloads
const MATCH_WINNER_MARKET: &str = "Match Winner";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    response: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FixtureEntry {
    fixture: Option<FixtureInfo>,
    league: Option<LeagueInfo>,
    teams: Option<Teams>,
    goals: Option<Goals>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FixtureInfo {
    id: Option<u64>,
    date: Option<String>,
    status: Option<StatusInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatusInfo {
    short: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LeagueInfo {
    id: Option<u64>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Teams {
    home: Option<Team>,
    away: Option<Team>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Team {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Goals {
    home: Option<u32>,
    away: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PredictionEntry {
    predictions: Option<PredictionInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PredictionInfo {
    advice: Option<String>,
    percent: Option<PercentInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PercentInfo {
    home: Option<String>,
    draw: Option<String>,
    away: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OddsEntry {
    bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Bookmaker {
    id: Option<u64>,
    bets: Vec<Market>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Market {
    name: Option<String>,
    values: Vec<MarketValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MarketValue {
    value: Option<String>,
    odd: Option<String>,
}

fn decode<T: for<'de> Deserialize<'de>>(body: &str) -> Result<Vec<T>> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| AnalyticsError::DataUnavailable(format!("Malformed response: {}", e)))?;
    Ok(envelope.response)
}

fn fixture_from_entry(entry: &FixtureEntry) -> Option<Fixture> {
    let info = entry.fixture.as_ref()?;
    let teams = entry.teams.as_ref()?;

    let home_team = teams.home.as_ref()?.name.clone()?;
    let away_team = teams.away.as_ref()?.name.clone()?;

    let status = info
        .status
        .as_ref()
        .and_then(|s| s.short.as_deref())
        .map(MatchStatus::from_short_code)
        .unwrap_or(MatchStatus::Unknown);

    let kickoff = info
        .date
        .as_deref()
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|d| d.with_timezone(&Utc));

    Some(Fixture {
        id: info.id?,
        kickoff,
        league_id: entry.league.as_ref().and_then(|l| l.id),
        league_name: entry.league.as_ref().and_then(|l| l.name.clone()),
        home_team,
        away_team,
        status,
    })
}

/// Parse a fixtures listing; incomplete entries are skipped
pub fn parse_fixtures(body: &str) -> Result<Vec<Fixture>> {
    let entries: Vec<FixtureEntry> = decode(body)?;
    let total = entries.len();

    let fixtures: Vec<Fixture> = entries.iter().filter_map(fixture_from_entry).collect();
    if fixtures.len() < total {
        debug!("Dropped {} incomplete fixtures", total - fixtures.len());
    }

    Ok(fixtures)
}

/// Parse a single-fixture lookup into a match result
pub fn parse_match_result(body: &str) -> Result<MatchResult> {
    let entries: Vec<FixtureEntry> = decode(body)?;
    let entry = entries
        .first()
        .ok_or_else(|| AnalyticsError::DataUnavailable("Fixture not found".to_string()))?;

    let status = entry
        .fixture
        .as_ref()
        .and_then(|f| f.status.as_ref())
        .and_then(|s| s.short.as_deref())
        .map(MatchStatus::from_short_code)
        .unwrap_or(MatchStatus::Unknown);

    let goals = entry.goals.as_ref();
    Ok(MatchResult {
        home_goals: goals.and_then(|g| g.home),
        away_goals: goals.and_then(|g| g.away),
        status,
    })
}

/// Parse a percentage string such as "45%" into 0-100
pub fn parse_percent(raw: &str) -> Option<u8> {
    let value: f64 = raw.trim().trim_end_matches('%').trim().parse().ok()?;
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return None;
    }
    Some(value.round() as u8)
}

/// Parse a prediction payload
pub fn parse_prediction(body: &str) -> Result<FixturePrediction> {
    let entries: Vec<PredictionEntry> = decode(body)?;
    let info = entries
        .into_iter()
        .next()
        .and_then(|e| e.predictions)
        .ok_or_else(|| AnalyticsError::DataUnavailable("No prediction available".to_string()))?;

    let percent = info
        .percent
        .as_ref()
        .and_then(|p| {
            Some(OutcomeProbabilities {
                home: parse_percent(p.home.as_deref()?)?,
                draw: parse_percent(p.draw.as_deref()?)?,
                away: parse_percent(p.away.as_deref()?)?,
            })
        })
        .ok_or_else(|| AnalyticsError::DataUnavailable("Prediction has no percentages".to_string()))?;

    Ok(FixturePrediction {
        percent,
        advice: info.advice,
    })
}

fn match_winner_odds(bookmaker: &Bookmaker) -> Option<OutcomeOdds> {
    let market = bookmaker
        .bets
        .iter()
        .find(|m| m.name.as_deref() == Some(MATCH_WINNER_MARKET))?;

    let mut odds = OutcomeOdds::default();
    for value in &market.values {
        let quote = sanitize_quote(value.odd.as_deref().and_then(|o| o.trim().parse().ok()));
        match value.value.as_deref() {
            Some("Home") => odds.home = quote,
            Some("Draw") => odds.draw = quote,
            Some("Away") => odds.away = quote,
            _ => {}
        }
    }

    if odds.is_empty() {
        None
    } else {
        Some(odds)
    }
}

/// Parse an odds payload into 1X2 quotes
///
/// Uses the preferred bookmaker when it offers the market, otherwise the
/// first bookmaker that does.
pub fn parse_odds(body: &str, preferred_bookmaker: Option<u64>) -> Result<OutcomeOdds> {
    let entries: Vec<OddsEntry> = decode(body)?;
    let bookmakers: Vec<&Bookmaker> = entries.iter().flat_map(|e| e.bookmakers.iter()).collect();

    let preferred = preferred_bookmaker.and_then(|id| {
        bookmakers
            .iter()
            .filter(|b| b.id == Some(id))
            .find_map(|b| match_winner_odds(b))
    });

    preferred
        .or_else(|| bookmakers.iter().find_map(|b| match_winner_odds(b)))
        .ok_or_else(|| AnalyticsError::DataUnavailable("No match winner odds".to_string()))
}

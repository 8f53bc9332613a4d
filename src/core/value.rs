//! Value Bet Detection
//!
//! Compare model outcome probabilities against bookmaker implied
//! probabilities and rank the fixtures where the model sees an edge.
//!
//! ```text
//! implied(o) = 100 / odds(o)
//! edge(o)    = predicted(o) - implied(o)      (percentage points)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::odds::sanitize_quote;
use crate::error::AnalyticsError;

/// Edge (percentage points) at or above which a value bet is high severity
pub const HIGH_EDGE_THRESHOLD: f64 = 10.0;
/// Edge (percentage points) at or above which a value bet is medium severity
pub const MEDIUM_EDGE_THRESHOLD: f64 = 5.0;

/// Match outcome in a 1X2 market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    /// Evaluation order; earlier outcomes win ties
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Home => write!(f, "Home"),
            Outcome::Draw => write!(f, "Draw"),
            Outcome::Away => write!(f, "Away"),
        }
    }
}

/// Predicted outcome probabilities in percent (0-100 each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home: u8,
    pub draw: u8,
    pub away: u8,
}

impl OutcomeProbabilities {
    /// Every percentage lies within 0-100
    pub fn is_valid(&self) -> bool {
        Outcome::ALL.iter().all(|&o| self.get(o) <= 100)
    }

    pub fn get(&self, outcome: Outcome) -> u8 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }
}

/// Decimal odds per outcome; a missing market is None
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeOdds {
    #[serde(default)]
    pub home: Option<f64>,
    #[serde(default)]
    pub draw: Option<f64>,
    #[serde(default)]
    pub away: Option<f64>,
}

impl OutcomeOdds {
    /// Usable quote for an outcome (unusable quotes count as missing)
    pub fn get(&self, outcome: Outcome) -> Option<f64> {
        let quote = match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        };
        sanitize_quote(quote)
    }

    pub fn is_empty(&self) -> bool {
        Outcome::ALL.iter().all(|&o| self.get(o).is_none())
    }
}

/// Odds and predictions for one fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOdds {
    pub fixture_id: u64,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub league: Option<String>,
    #[serde(default)]
    pub predicted: Option<OutcomeProbabilities>,
    #[serde(default)]
    pub odds: OutcomeOdds,
    #[serde(default)]
    pub is_priority_league: bool,
}

/// Edge of a single outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEdge {
    pub outcome: Outcome,
    pub odds: f64,
    pub predicted_probability: f64, // percent
    pub implied_probability: f64,   // percent
    pub value_edge: f64,            // percentage points
}

/// Display bucket for a value bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn classify(value_edge: f64) -> Self {
        if value_edge >= HIGH_EDGE_THRESHOLD {
            Severity::High
        } else if value_edge >= MEDIUM_EDGE_THRESHOLD {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// Caller-side filter over ranked value bets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityFilter {
    #[default]
    All,
    High,
    Medium,
}

impl SeverityFilter {
    pub fn matches(&self, bet: &ValueBet) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::High => bet.severity() == Severity::High,
            SeverityFilter::Medium => bet.severity() == Severity::Medium,
        }
    }
}

impl FromStr for SeverityFilter {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(SeverityFilter::All),
            "high" => Ok(SeverityFilter::High),
            "medium" => Ok(SeverityFilter::Medium),
            _ => Err(AnalyticsError::InvalidInput(format!(
                "Severity filter must be all, high or medium, got {}",
                s
            ))),
        }
    }
}

/// A fixture whose best outcome carries a positive edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBet {
    pub fixture_id: u64,
    pub home_team: String,
    pub away_team: String,
    pub league: Option<String>,
    pub is_priority_league: bool,
    pub best: OutcomeEdge,
}

impl ValueBet {
    pub fn value_edge(&self) -> f64 {
        self.best.value_edge
    }

    pub fn severity(&self) -> Severity {
        Severity::classify(self.best.value_edge)
    }
}

/// Edge for every quoted outcome of a fixture, in Home, Draw, Away order
///
/// Out-of-range predictions count as missing.
pub fn outcome_edges(candidate: &MatchOdds) -> Vec<OutcomeEdge> {
    let Some(predicted) = candidate.predicted.filter(|p| p.is_valid()) else {
        return Vec::new();
    };

    Outcome::ALL
        .iter()
        .filter_map(|&outcome| {
            candidate.odds.get(outcome).map(|odds| {
                let predicted_probability = predicted.get(outcome) as f64;
                let implied_probability = 100.0 / odds;
                OutcomeEdge {
                    outcome,
                    odds,
                    predicted_probability,
                    implied_probability,
                    value_edge: predicted_probability - implied_probability,
                }
            })
        })
        .collect()
}

/// Best outcome by edge; the first outcome wins ties
pub fn best_outcome(candidate: &MatchOdds) -> Option<OutcomeEdge> {
    let mut best: Option<OutcomeEdge> = None;
    for edge in outcome_edges(candidate) {
        match best {
            Some(current) if edge.value_edge > current.value_edge => best = Some(edge),
            None => best = Some(edge),
            _ => {}
        }
    }
    best
}

/// Evaluate a single fixture
///
/// Returns None when data is insufficient or the best edge is not positive.
pub fn evaluate(candidate: &MatchOdds) -> Option<ValueBet> {
    let best = best_outcome(candidate)?;
    if best.value_edge <= 0.0 {
        return None;
    }

    Some(ValueBet {
        fixture_id: candidate.fixture_id,
        home_team: candidate.home_team.clone(),
        away_team: candidate.away_team.clone(),
        league: candidate.league.clone(),
        is_priority_league: candidate.is_priority_league,
        best,
    })
}

/// Find and rank value bets
///
/// Priority leagues come first, then higher edges. The sort is stable, so
/// fully tied candidates keep their input order. Candidates without
/// predictions or odds are skipped.
pub fn find_value_bets<I>(candidates: I) -> impl Iterator<Item = ValueBet>
where
    I: IntoIterator<Item = MatchOdds>,
{
    let mut value_bets: Vec<ValueBet> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let bet = evaluate(&candidate);
            if bet.is_none() {
                tracing::debug!("Fixture {} has no value bet", candidate.fixture_id);
            }
            bet
        })
        .collect();

    value_bets.sort_by(|a, b| {
        b.is_priority_league.cmp(&a.is_priority_league).then_with(|| {
            b.value_edge()
                .partial_cmp(&a.value_edge())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });

    value_bets.into_iter()
}

/// Ranked value bets restricted to a severity filter
pub fn filter_value_bets<I>(candidates: I, filter: SeverityFilter) -> impl Iterator<Item = ValueBet>
where
    I: IntoIterator<Item = MatchOdds>,
{
    find_value_bets(candidates).filter(move |bet| filter.matches(bet))
}

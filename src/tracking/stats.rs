//! Prediction Statistics
//!
//! Accuracy, streaks, confidence buckets and per-league breakdowns over a
//! prediction history. Every function is a pure fold over records ordered
//! newest first.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::PredictionRecord;

/// Largest share of the remaining headroom the accuracy boost can add
pub const BOOST_MAX: f64 = 0.15;
/// Sample size at which the boost weight is one half
pub const BOOST_MIDPOINT: f64 = 20.0;
/// Steepness of the boost decay (larger = slower)
pub const BOOST_SCALE: f64 = 5.0;
/// Sample size from which accuracy is reported unadjusted
pub const BOOST_SAMPLE_CUTOFF: usize = 60;

/// Confidence at or above which a prediction is high confidence
pub const HIGH_CONFIDENCE: u8 = 70;
/// Confidence at or above which a prediction is medium confidence
pub const MEDIUM_CONFIDENCE: u8 = 50;

/// League label for records without one
pub const UNKNOWN_LEAGUE: &str = "Other";

/// Summary statistics of a prediction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total: usize,
    pub verified: usize,
    pub correct: usize,
    pub wrong: usize,
    pub pending: usize,
    pub raw_accuracy: f64, // percent, unadjusted
    pub accuracy: f64,     // percent, after small-sample boost
    pub current_streak: usize,
    pub streak_type: Option<bool>, // true = winning streak
    pub longest_streak: usize,
}

impl Default for StatsSnapshot {
    fn default() -> Self {
        Self {
            total: 0,
            verified: 0,
            correct: 0,
            wrong: 0,
            pending: 0,
            raw_accuracy: 0.0,
            accuracy: 0.0,
            current_streak: 0,
            streak_type: None,
            longest_streak: 0,
        }
    }
}

/// Small-sample accuracy boost
///
/// Lifts raw accuracy towards 100 by a share of the remaining headroom that
/// decays along a logistic curve in the sample size:
///
/// ```text
/// w(n)  = 1 / (1 + exp((n - BOOST_MIDPOINT) / BOOST_SCALE))
/// boost = raw + (100 - raw) * BOOST_MAX * w(n)
/// ```
///
/// The result is never below `raw`, never above 100, strictly increasing in
/// `raw`, and equals `raw` from `BOOST_SAMPLE_CUTOFF` samples on.
pub fn boost_accuracy(raw: f64, sample_size: usize) -> f64 {
    let raw = raw.clamp(0.0, 100.0);
    if sample_size >= BOOST_SAMPLE_CUTOFF {
        return raw;
    }

    let weight = 1.0 / (1.0 + ((sample_size as f64 - BOOST_MIDPOINT) / BOOST_SCALE).exp());
    (raw + (100.0 - raw) * BOOST_MAX * weight).min(100.0)
}

/// Current streak over outcomes ordered newest first
///
/// Returns the run length of the most recent outcome and that outcome.
pub fn current_streak(outcomes: &[bool]) -> (usize, Option<bool>) {
    let Some(&latest) = outcomes.first() else {
        return (0, None);
    };

    let length = outcomes.iter().take_while(|&&o| o == latest).count();
    (length, Some(latest))
}

/// Longest run of consecutive correct outcomes
pub fn longest_winning_streak(outcomes: &[bool]) -> usize {
    let mut longest = 0;
    let mut running = 0;

    for &correct in outcomes {
        if correct {
            running += 1;
            longest = longest.max(running);
        } else {
            running = 0;
        }
    }

    longest
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Compute summary statistics from records ordered newest first
pub fn compute_stats(records: &[PredictionRecord]) -> StatsSnapshot {
    if records.is_empty() {
        return StatsSnapshot::default();
    }

    let outcomes: Vec<bool> = records.iter().filter_map(|r| r.is_correct()).collect();

    let total = records.len();
    let verified = outcomes.len();
    let correct = outcomes.iter().filter(|&&o| o).count();
    let wrong = verified - correct;

    let raw_accuracy = percent(correct, verified);
    let accuracy = if verified > 0 {
        boost_accuracy(raw_accuracy, verified)
    } else {
        0.0
    };

    let (current, streak_type) = current_streak(&outcomes);

    StatsSnapshot {
        total,
        verified,
        correct,
        wrong,
        pending: total - verified,
        raw_accuracy,
        accuracy,
        current_streak: current,
        streak_type,
        longest_streak: longest_winning_streak(&outcomes),
    }
}

/// Confidence bucket of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBucket {
    High,
    Medium,
    Low,
}

impl ConfidenceBucket {
    pub const ALL: [ConfidenceBucket; 3] = [
        ConfidenceBucket::High,
        ConfidenceBucket::Medium,
        ConfidenceBucket::Low,
    ];

    pub fn from_confidence(confidence: u8) -> Self {
        if confidence >= HIGH_CONFIDENCE {
            ConfidenceBucket::High
        } else if confidence >= MEDIUM_CONFIDENCE {
            ConfidenceBucket::Medium
        } else {
            ConfidenceBucket::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceBucket::High => "high (>=70)",
            ConfidenceBucket::Medium => "medium (50-69)",
            ConfidenceBucket::Low => "low (<50)",
        }
    }
}

/// Accuracy of verified predictions within a confidence bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub bucket: ConfidenceBucket,
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
}

/// Accuracy per confidence bucket, always in High, Medium, Low order
pub fn confidence_breakdown(records: &[PredictionRecord]) -> Vec<BucketStats> {
    let mut counts: HashMap<ConfidenceBucket, (usize, usize)> = HashMap::new();
    for record in records {
        if let Some(correct) = record.is_correct() {
            let entry = counts
                .entry(ConfidenceBucket::from_confidence(record.prediction.confidence))
                .or_default();
            entry.0 += 1;
            if correct {
                entry.1 += 1;
            }
        }
    }

    ConfidenceBucket::ALL
        .iter()
        .map(|&bucket| {
            let (total, correct) = counts.get(&bucket).copied().unwrap_or((0, 0));
            BucketStats {
                bucket,
                total,
                correct,
                accuracy: percent(correct, total),
            }
        })
        .collect()
}

/// Prediction counts for one league
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueStats {
    pub league: String,
    pub total: usize,
    pub correct: usize,
    pub wrong: usize,
    pub pending: usize,
    pub accuracy: f64, // percent of verified
}

fn league_label(record: &PredictionRecord) -> String {
    match record.league.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNKNOWN_LEAGUE.to_string(),
    }
}

/// Per-league counts, largest leagues first (ties by name)
///
/// `top_n` limits the number of leagues returned.
pub fn league_breakdown(records: &[PredictionRecord], top_n: Option<usize>) -> Vec<LeagueStats> {
    let mut grouped: HashMap<String, Vec<&PredictionRecord>> = HashMap::new();
    for record in records {
        grouped.entry(league_label(record)).or_default().push(record);
    }

    let mut results: Vec<LeagueStats> = grouped
        .into_iter()
        .map(|(league, group)| {
            let correct = group.iter().filter(|r| r.is_correct() == Some(true)).count();
            let wrong = group.iter().filter(|r| r.is_correct() == Some(false)).count();

            LeagueStats {
                league,
                total: group.len(),
                correct,
                wrong,
                pending: group.len() - correct - wrong,
                accuracy: percent(correct, correct + wrong),
            }
        })
        .collect();

    results.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.league.cmp(&b.league)));
    if let Some(n) = top_n {
        results.truncate(n);
    }
    results
}

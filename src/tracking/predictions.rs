//! Prediction Ledger
//!
//! Keeps the per-device history of predictions and resolves pending ones
//! against final match results.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::stats::{
    compute_stats, confidence_breakdown, league_breakdown, BucketStats, LeagueStats,
    StatsSnapshot,
};
use crate::error::{validate_confidence, AnalyticsError, Result};
use crate::models::{NewPrediction, PredictedWinner, PredictionRecord, VerifiedResult};
use crate::provider::MatchResultVerifier;
use crate::storage::{load_json, save_json, KeyValueStore};

/// Store key for the prediction history
pub const PREDICTIONS_KEY: &str = "prediction_history";

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether a predicted winner matches the final score
pub fn is_prediction_correct(record: &PredictionRecord, home_goals: u32, away_goals: u32) -> bool {
    normalize_name(&record.prediction.winner_name)
        == normalize_name(record.actual_winner(home_goals, away_goals))
}

/// Prediction history backed by a key-value store
pub struct PredictionLedger<S: KeyValueStore> {
    store: S,
    records: Vec<PredictionRecord>, // newest first
}

impl<S: KeyValueStore> PredictionLedger<S> {
    /// Open the ledger, loading any persisted history
    ///
    /// Missing or malformed data yields an empty ledger.
    pub fn open(store: S) -> Self {
        let mut records: Vec<PredictionRecord> =
            load_json(&store, PREDICTIONS_KEY).unwrap_or_default();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!("Loaded {} predictions", records.len());
        Self { store, records }
    }

    /// Records, newest first
    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&PredictionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &PredictionRecord> {
        self.records.iter().filter(|r| r.is_pending())
    }

    /// Record a new pending prediction
    pub fn record(&mut self, input: NewPrediction) -> Result<PredictionRecord> {
        self.record_at(input, Utc::now())
    }

    /// Record a new pending prediction with an explicit creation time
    pub fn record_at(
        &mut self,
        input: NewPrediction,
        created_at: DateTime<Utc>,
    ) -> Result<PredictionRecord> {
        let match_id = input.match_id.trim();
        if match_id.is_empty() {
            return Err(AnalyticsError::InvalidInput(
                "Match id must not be empty".to_string(),
            ));
        }
        validate_confidence(input.confidence)?;

        let record = PredictionRecord {
            id: Uuid::new_v4(),
            match_id: match_id.to_string(),
            home_team: input.home_team,
            away_team: input.away_team,
            league: input.league,
            created_at,
            prediction: PredictedWinner {
                winner_name: input.winner_name,
                confidence: input.confidence,
            },
            result: None,
        };

        // Keep newest first; equal timestamps put the latest insert in front
        let position = self.records.partition_point(|r| r.created_at > created_at);
        self.records.insert(position, record.clone());

        if let Err(e) = self.persist() {
            self.records.remove(position);
            return Err(e);
        }

        info!(
            "Recorded prediction {} for match {} ({} @ {}%)",
            record.id, record.match_id, record.prediction.winner_name, record.prediction.confidence
        );
        Ok(record)
    }

    /// Try to resolve every pending prediction
    ///
    /// Lookup failures and unfinished matches leave records pending and are
    /// retried on the next call. Returns the number of newly verified records.
    pub async fn verify_pending<V>(&mut self, verifier: &V) -> usize
    where
        V: MatchResultVerifier + ?Sized,
    {
        let mut verified = 0;

        for record in self.records.iter_mut().filter(|r| r.is_pending()) {
            let result = match verifier.result(&record.match_id).await {
                Ok(result) => result,
                Err(e) => {
                    debug!("Result for match {} unavailable: {}", record.match_id, e);
                    continue;
                }
            };

            let Some((home_goals, away_goals)) = result.final_score() else {
                debug!(
                    "Match {} not finished yet ({:?})",
                    record.match_id, result.status
                );
                continue;
            };

            let is_correct = is_prediction_correct(record, home_goals, away_goals);
            record.result = Some(VerifiedResult {
                home_goals,
                away_goals,
                is_correct,
            });
            verified += 1;
        }

        if verified > 0 {
            if let Err(e) = self.persist() {
                warn!("Failed to persist verified predictions: {}", e);
            }
        }

        info!(
            "Verified {} predictions, {} still pending",
            verified,
            self.pending().count()
        );
        verified
    }

    /// Summary statistics over the whole history
    pub fn compute_stats(&self) -> StatsSnapshot {
        compute_stats(&self.records)
    }

    pub fn confidence_breakdown(&self) -> Vec<BucketStats> {
        confidence_breakdown(&self.records)
    }

    /// Per-league statistics for the `top_n` leagues by volume
    pub fn league_breakdown(&self, top_n: usize) -> Vec<LeagueStats> {
        league_breakdown(&self.records, Some(top_n))
    }

    /// Discard the whole history
    pub fn reset(&mut self) -> Result<()> {
        self.store.remove(PREDICTIONS_KEY)?;
        let removed = self.records.len();
        self.records.clear();

        info!("Cleared {} predictions", removed);
        Ok(())
    }

    /// Give back the underlying store
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) -> Result<()> {
        save_json(&mut self.store, PREDICTIONS_KEY, &self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MatchResult, MatchStatus};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use chrono::Duration;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubVerifier {
        results: HashMap<String, MatchResult>,
        calls: AtomicUsize,
    }

    impl StubVerifier {
        fn new(results: Vec<(&str, MatchResult)>) -> Self {
            Self {
                results: results
                    .into_iter()
                    .map(|(id, r)| (id.to_string(), r))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MatchResultVerifier for StubVerifier {
        async fn result(&self, match_id: &str) -> Result<MatchResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.results
                .get(match_id)
                .copied()
                .ok_or_else(|| AnalyticsError::DataUnavailable(match_id.to_string()))
        }
    }

    fn finished(home: u32, away: u32) -> MatchResult {
        MatchResult {
            home_goals: Some(home),
            away_goals: Some(away),
            status: MatchStatus::Finished,
        }
    }

    fn new_prediction(match_id: &str, winner: &str, confidence: u8) -> NewPrediction {
        NewPrediction {
            match_id: match_id.to_string(),
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            league: Some("Premier League".to_string()),
            winner_name: winner.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_record_appends_pending() {
        let mut ledger = PredictionLedger::open(MemoryStore::new());
        let record = ledger.record(new_prediction("100", "Arsenal", 65)).unwrap();

        assert_eq!(ledger.len(), 1);
        assert!(record.is_pending());
        assert_eq!(ledger.get(record.id), Some(&record));
        assert_eq!(ledger.pending().count(), 1);
    }

    #[test]
    fn test_record_validation() {
        let mut ledger = PredictionLedger::open(MemoryStore::new());

        assert!(ledger.record(new_prediction("  ", "Arsenal", 65)).is_err());
        assert!(ledger.record(new_prediction("100", "Arsenal", 101)).is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_records_are_newest_first() {
        let mut ledger = PredictionLedger::open(MemoryStore::new());
        let now = Utc::now();

        ledger
            .record_at(new_prediction("old", "Arsenal", 60), now - Duration::hours(2))
            .unwrap();
        ledger
            .record_at(new_prediction("new", "Arsenal", 60), now)
            .unwrap();
        ledger
            .record_at(new_prediction("mid", "Arsenal", 60), now - Duration::hours(1))
            .unwrap();

        let ids: Vec<&str> = ledger.records().iter().map(|r| r.match_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_ledger_persists_and_reloads() {
        let mut ledger = PredictionLedger::open(MemoryStore::new());
        ledger.record(new_prediction("100", "Arsenal", 65)).unwrap();
        ledger.record(new_prediction("101", "Draw", 40)).unwrap();

        let reopened = PredictionLedger::open(ledger.into_store());
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn test_malformed_store_is_empty_state() {
        let mut store = MemoryStore::new();
        store.set(PREDICTIONS_KEY, json!({"unexpected": true})).unwrap();

        let ledger = PredictionLedger::open(store);
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_verify_pending_resolves_finished_matches() {
        let mut ledger = PredictionLedger::open(MemoryStore::new());
        ledger.record(new_prediction("1", "Arsenal", 75)).unwrap();
        ledger.record(new_prediction("2", "arsenal", 55)).unwrap();
        ledger.record(new_prediction("3", "Draw", 40)).unwrap();
        ledger.record(new_prediction("4", "Chelsea", 60)).unwrap();

        let verifier = StubVerifier::new(vec![
            ("1", finished(2, 0)),
            ("2", finished(0, 1)),
            ("3", finished(1, 1)),
            (
                "4",
                MatchResult {
                    home_goals: Some(0),
                    away_goals: Some(0),
                    status: MatchStatus::Live,
                },
            ),
        ]);

        let verified = ledger.verify_pending(&verifier).await;
        assert_eq!(verified, 3);

        let by_match = |id: &str| {
            ledger
                .records()
                .iter()
                .find(|r| r.match_id == id)
                .unwrap()
                .clone()
        };
        assert_eq!(by_match("1").is_correct(), Some(true));
        assert_eq!(by_match("2").is_correct(), Some(false));
        assert_eq!(by_match("3").is_correct(), Some(true));
        assert!(by_match("4").is_pending());

        let stats = ledger.compute_stats();
        assert_eq!(stats.verified, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.correct, 2);
    }

    #[tokio::test]
    async fn test_verify_pending_swallows_lookup_errors() {
        let mut ledger = PredictionLedger::open(MemoryStore::new());
        ledger.record(new_prediction("missing", "Arsenal", 75)).unwrap();

        let verifier = StubVerifier::new(vec![]);
        assert_eq!(ledger.verify_pending(&verifier).await, 0);
        assert_eq!(ledger.pending().count(), 1);

        // Retried on the next call
        assert_eq!(ledger.verify_pending(&verifier).await, 0);
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_verify_pending_is_idempotent() {
        let mut ledger = PredictionLedger::open(MemoryStore::new());
        ledger.record(new_prediction("1", "Arsenal", 75)).unwrap();

        let verifier = StubVerifier::new(vec![("1", finished(3, 1))]);
        assert_eq!(ledger.verify_pending(&verifier).await, 1);
        let snapshot = ledger.records().to_vec();

        // Verified records are not looked up again
        assert_eq!(ledger.verify_pending(&verifier).await, 0);
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ledger.records(), snapshot.as_slice());
    }

    #[tokio::test]
    async fn test_verified_results_are_persisted() {
        let mut ledger = PredictionLedger::open(MemoryStore::new());
        ledger.record(new_prediction("1", "Arsenal", 75)).unwrap();

        let verifier = StubVerifier::new(vec![("1", finished(1, 0))]);
        ledger.verify_pending(&verifier).await;

        let reopened = PredictionLedger::open(ledger.into_store());
        assert_eq!(reopened.records()[0].is_correct(), Some(true));
    }

    #[test]
    fn test_reset_clears_history() {
        let mut ledger = PredictionLedger::open(MemoryStore::new());
        ledger.record(new_prediction("1", "Arsenal", 75)).unwrap();

        ledger.reset().unwrap();
        assert!(ledger.is_empty());

        let store = ledger.into_store();
        assert!(store.get(PREDICTIONS_KEY).is_none());
    }

    #[test]
    fn test_breakdowns_delegate_to_records() {
        let mut ledger = PredictionLedger::open(MemoryStore::new());
        ledger.record(new_prediction("1", "Arsenal", 75)).unwrap();

        assert_eq!(ledger.confidence_breakdown().len(), 3);
        let leagues = ledger.league_breakdown(5);
        assert_eq!(leagues.len(), 1);
        assert_eq!(leagues[0].pending, 1);
    }
}

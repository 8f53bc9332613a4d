//! Prediction tracking and bankroll management

pub mod bankroll;
pub mod predictions;
pub mod stats;

pub use bankroll::{BankrollLedger, BankrollMetrics, BANKROLL_KEY};
pub use predictions::{PredictionLedger, PREDICTIONS_KEY};
pub use stats::{
    boost_accuracy, compute_stats, BucketStats, ConfidenceBucket, LeagueStats, StatsSnapshot,
};

//! Football AI - Football prediction analytics
//!
//! This library provides:
//! - Kelly criterion stake sizing with fractional multipliers
//! - Value bet detection against bookmaker odds
//! - Prediction tracking with accuracy and streak statistics
//! - A bankroll ledger with ROI and win rate
//! - Collaborator interfaces for a football data service
//!
//! # Example
//!
//! ```
//! use football_ai::core::kelly::{compute_kelly, KellyFraction};
//! use football_ai::storage::MemoryStore;
//! use football_ai::tracking::BankrollLedger;
//! use football_ai::models::TransactionKind;
//!
//! let kelly = compute_kelly(2.5, 50.0, Some(1000.0), KellyFraction::Quarter).unwrap();
//! println!("Stake: {:.2}", kelly.recommended_stake_amount.unwrap_or(0.0));
//!
//! let mut bankroll = BankrollLedger::open(MemoryStore::new());
//! bankroll.initialize(1000.0).unwrap();
//! bankroll.add_transaction(TransactionKind::BetWin, 62.5, None).unwrap();
//! assert_eq!(bankroll.current_bankroll(), 1062.5);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod provider;
pub mod storage;
pub mod tracking;

// Re-export commonly used types
pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, Result};
pub use models::{
    BankrollState, BankrollTransaction, NewPrediction, PredictionRecord, TransactionKind,
};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use tracking::{BankrollLedger, PredictionLedger, StatsSnapshot};

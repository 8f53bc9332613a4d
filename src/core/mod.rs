//! Core betting math: stake sizing, odds helpers and value detection

pub mod kelly;
pub mod odds;
pub mod value;

// Re-export commonly used types
pub use kelly::{
    calculate_kelly_fraction, compute_kelly, BetSizing, KellyCalculator, KellyFraction,
    KellyResult, StakeAdvice,
};
pub use value::{
    find_value_bets, filter_value_bets, MatchOdds, Outcome, OutcomeOdds, OutcomeProbabilities,
    Severity, SeverityFilter, ValueBet,
};

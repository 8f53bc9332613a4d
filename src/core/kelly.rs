//! Kelly Criterion Bet Sizing
//!
//! Optimal bet sizing based on edge and odds using Kelly criterion.
//!
//! The Kelly criterion formula:
//!     f* = (b*p - q) / b
//!
//! Where:
//!     f* = fraction of bankroll to bet
//!     b = odds - 1 (net odds)
//!     p = probability of winning
//!     q = 1 - p (probability of losing)
//!     odds = decimal odds (e.g., 2.5 pays 2.5 per unit staked)
//!
//! Fractions in [`KellyResult`] are expressed in percent of bankroll.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{validate_odds, validate_probability_percent, AnalyticsError, Result};

/// Notional stake used for expected value when no bankroll is given
pub const NOTIONAL_STAKE: f64 = 100.0;

/// Supported fractional Kelly multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KellyFraction {
    Full,
    Half,
    #[default]
    Quarter,
    Tenth,
}

impl KellyFraction {
    pub const ALL: [KellyFraction; 4] = [
        KellyFraction::Full,
        KellyFraction::Half,
        KellyFraction::Quarter,
        KellyFraction::Tenth,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            KellyFraction::Full => 1.0,
            KellyFraction::Half => 0.5,
            KellyFraction::Quarter => 0.25,
            KellyFraction::Tenth => 0.1,
        }
    }

    /// Map a raw multiplier back to a supported fraction
    pub fn from_multiplier(multiplier: f64) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| (f.multiplier() - multiplier).abs() < 1e-9)
    }
}

impl fmt::Display for KellyFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KellyFraction::Full => "full",
            KellyFraction::Half => "half",
            KellyFraction::Quarter => "quarter",
            KellyFraction::Tenth => "tenth",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for KellyFraction {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(KellyFraction::Full),
            "half" => Ok(KellyFraction::Half),
            "quarter" => Ok(KellyFraction::Quarter),
            "tenth" => Ok(KellyFraction::Tenth),
            other => other
                .parse::<f64>()
                .ok()
                .and_then(KellyFraction::from_multiplier)
                .ok_or_else(|| {
                    AnalyticsError::InvalidInput(format!(
                        "Kelly fraction must be one of full, half, quarter, tenth (1, 0.5, 0.25, 0.1), got {}",
                        s
                    ))
                }),
        }
    }
}

/// How aggressive the recommended stake is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeAdvice {
    NoBet,
    Conservative,
    Moderate,
    Aggressive,
}

impl StakeAdvice {
    /// Classify an adjusted Kelly fraction given in percent
    pub fn from_fraction(adjusted_percent: f64) -> Self {
        if adjusted_percent <= 0.0 {
            StakeAdvice::NoBet
        } else if adjusted_percent < 2.0 {
            StakeAdvice::Conservative
        } else if adjusted_percent < 5.0 {
            StakeAdvice::Moderate
        } else {
            StakeAdvice::Aggressive
        }
    }
}

/// Result of a single Kelly calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KellyResult {
    pub odds: f64,
    pub win_probability: f64, // percent
    pub fraction: KellyFraction,
    pub implied_probability: f64, // percent
    pub full_kelly_fraction: f64, // percent of bankroll
    pub adjusted_fraction: f64,   // percent of bankroll, after multiplier
    pub edge_percent: f64,        // relative edge over implied probability
    pub recommended_stake_amount: Option<f64>,
    pub expected_value: f64,
    pub is_positive_edge: bool,
}

impl KellyResult {
    pub fn advice(&self) -> StakeAdvice {
        StakeAdvice::from_fraction(self.adjusted_fraction)
    }
}

/// Calculate the full Kelly fraction (0-1 scale) for a single bet
///
/// # Arguments
/// * `probability` - Estimated probability of winning (0-1)
/// * `odds` - Decimal odds
///
/// # Returns
/// Kelly fraction (negative when the bet has no edge)
///
/// # Examples
/// ```
/// use football_ai::core::kelly::calculate_kelly_fraction;
/// let kelly = calculate_kelly_fraction(0.5, 2.5); // b = 1.5
/// assert!((kelly - 0.1667).abs() < 0.0001);
/// ```
pub fn calculate_kelly_fraction(probability: f64, odds: f64) -> f64 {
    if odds <= 1.0 {
        return 0.0;
    }

    let b = odds - 1.0;
    let q = 1.0 - probability;
    (b * probability - q) / b
}

/// Compute a full Kelly recommendation
///
/// # Arguments
/// * `decimal_odds` - Bookmaker decimal odds (> 1.0)
/// * `win_probability_percent` - Estimated win probability in percent (0-100 exclusive)
/// * `bankroll` - Optional bankroll; non-positive values are treated as absent
/// * `fraction` - Fractional Kelly multiplier
///
/// A non-positive Kelly fraction is a valid "do not bet" result, not an error.
pub fn compute_kelly(
    decimal_odds: f64,
    win_probability_percent: f64,
    bankroll: Option<f64>,
    fraction: KellyFraction,
) -> Result<KellyResult> {
    validate_odds(decimal_odds)?;
    validate_probability_percent(win_probability_percent)?;

    let p = win_probability_percent / 100.0;
    let q = 1.0 - p;

    let full_kelly_fraction = calculate_kelly_fraction(p, decimal_odds) * 100.0;
    let adjusted_fraction = full_kelly_fraction * fraction.multiplier();

    let implied = 1.0 / decimal_odds;
    let edge_percent = (p - implied) / implied * 100.0;

    let recommended_stake_amount = bankroll
        .filter(|b| b.is_finite() && *b > 0.0)
        .map(|b| (adjusted_fraction / 100.0 * b).max(0.0));

    let stake_basis = match recommended_stake_amount {
        Some(stake) if stake > 0.0 => stake,
        _ => NOTIONAL_STAKE,
    };
    let expected_value = (p * (decimal_odds - 1.0) - q) * stake_basis;

    Ok(KellyResult {
        odds: decimal_odds,
        win_probability: win_probability_percent,
        fraction,
        implied_probability: implied * 100.0,
        full_kelly_fraction,
        adjusted_fraction,
        edge_percent,
        recommended_stake_amount,
        expected_value,
        is_positive_edge: full_kelly_fraction > 0.0,
    })
}

/// Bet sizing recommendation with bankroll caps applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetSizing {
    pub kelly: KellyResult,
    pub stake: f64, // Final stake after caps
}

/// Kelly criterion calculator for bet sizing
///
/// Supports:
/// - Full and fractional Kelly
/// - A per-bet stake cap
/// - Multiple simultaneous bets under a total exposure limit
#[derive(Debug, Clone)]
pub struct KellyCalculator {
    pub bankroll: f64,
    pub fraction: KellyFraction,
    pub max_stake_pct: f64,
    pub max_total_exposure: f64,
}

impl KellyCalculator {
    /// Create a new Kelly calculator
    ///
    /// # Arguments
    /// * `bankroll` - Current bankroll
    /// * `fraction` - Fraction of Kelly to use
    /// * `max_stake_pct` - Maximum single bet as a share of bankroll (0-1)
    /// * `max_total_exposure` - Maximum total exposure across all bets (0-1)
    pub fn new(
        bankroll: f64,
        fraction: KellyFraction,
        max_stake_pct: f64,
        max_total_exposure: f64,
    ) -> Self {
        Self {
            bankroll,
            fraction,
            max_stake_pct,
            max_total_exposure,
        }
    }

    /// Create with default settings (quarter Kelly, 10% per bet, 30% total)
    pub fn with_defaults(bankroll: f64) -> Self {
        Self::new(bankroll, KellyFraction::Quarter, 0.10, 0.30)
    }

    /// Calculate bet sizing for a single bet
    pub fn calculate_single(&self, odds: f64, win_probability_percent: f64) -> Result<BetSizing> {
        let kelly = compute_kelly(
            odds,
            win_probability_percent,
            Some(self.bankroll),
            self.fraction,
        )?;

        let max_stake = self.bankroll * self.max_stake_pct;
        let stake = round_cents(kelly.recommended_stake_amount.unwrap_or(0.0).min(max_stake));

        Ok(BetSizing { kelly, stake })
    }

    /// Calculate bet sizing for multiple simultaneous bets
    ///
    /// Stakes are scaled down proportionally when their sum exceeds the
    /// total exposure limit.
    pub fn calculate_multiple(&self, bets: &[(f64, f64)]) -> Result<Vec<BetSizing>> {
        let mut sizings = bets
            .iter()
            .map(|(odds, pct)| self.calculate_single(*odds, *pct))
            .collect::<Result<Vec<_>>>()?;

        let total_stake: f64 = sizings.iter().map(|s| s.stake).sum();
        let max_exposure = self.bankroll * self.max_total_exposure;

        if total_stake > max_exposure && total_stake > 0.0 {
            let scale_factor = max_exposure / total_stake;
            for sizing in &mut sizings {
                sizing.stake = round_cents(sizing.stake * scale_factor);
            }
        }

        Ok(sizings)
    }
}

impl Default for KellyCalculator {
    fn default() -> Self {
        Self::with_defaults(1_000.0)
    }
}

// Floors so that scaled stakes never sum above the cap
fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelly_fraction_positive_ev() {
        // b = 1.5, p = 0.5 -> (0.75 - 0.5) / 1.5 = 0.1667
        let kelly = calculate_kelly_fraction(0.5, 2.5);
        assert!((kelly - 0.166_666).abs() < 0.0001);
    }

    #[test]
    fn test_kelly_fraction_negative_ev() {
        let kelly = calculate_kelly_fraction(0.10, 5.0);
        assert!(kelly < 0.0);
    }

    #[test]
    fn test_kelly_fraction_no_net_odds() {
        assert_eq!(calculate_kelly_fraction(0.25, 1.0), 0.0);
    }

    #[test]
    fn test_compute_kelly_values() {
        let result = compute_kelly(2.5, 50.0, Some(1_000.0), KellyFraction::Quarter).unwrap();

        assert!((result.full_kelly_fraction - 16.666_666).abs() < 1e-4);
        assert!((result.adjusted_fraction - 4.166_666).abs() < 1e-4);
        assert!((result.implied_probability - 40.0).abs() < 1e-9);
        // (0.5 - 0.4) / 0.4 = 25%
        assert!((result.edge_percent - 25.0).abs() < 1e-9);
        let stake = result.recommended_stake_amount.unwrap();
        assert!((stake - 41.666_666).abs() < 1e-4);
        // (0.5 * 1.5 - 0.5) * stake = 0.25 * stake
        assert!((result.expected_value - 0.25 * stake).abs() < 1e-9);
        assert!(result.is_positive_edge);
        assert_eq!(result.advice(), StakeAdvice::Moderate);
    }

    #[test]
    fn test_compute_kelly_without_bankroll_uses_notional_stake() {
        let result = compute_kelly(2.5, 50.0, None, KellyFraction::Full).unwrap();
        assert!(result.recommended_stake_amount.is_none());
        assert!((result.expected_value - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_bankroll_is_absent() {
        let result = compute_kelly(2.5, 50.0, Some(0.0), KellyFraction::Full).unwrap();
        assert!(result.recommended_stake_amount.is_none());
    }

    #[test]
    fn test_no_edge_is_valid_result() {
        let result = compute_kelly(1.8, 50.0, Some(1_000.0), KellyFraction::Half).unwrap();
        assert!(result.full_kelly_fraction < 0.0);
        assert!(!result.is_positive_edge);
        assert_eq!(result.recommended_stake_amount, Some(0.0));
        assert_eq!(result.advice(), StakeAdvice::NoBet);
        assert!(result.expected_value < 0.0);
    }

    #[test]
    fn test_negative_edge_stake_floors_at_zero() {
        // Quarter of -12.5% is -3.125%, unfloored stake -62.5
        let result = compute_kelly(1.8, 50.0, Some(2_000.0), KellyFraction::Quarter).unwrap();
        assert!(result.adjusted_fraction < 0.0);
        assert_eq!(result.recommended_stake_amount, Some(0.0));

        // Zero stake falls back to the notional 100: (0.5 * 0.8 - 0.5) * 100
        assert!((result.expected_value + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_kelly_validation() {
        assert!(compute_kelly(1.0, 50.0, None, KellyFraction::Full).is_err());
        assert!(compute_kelly(0.8, 50.0, None, KellyFraction::Full).is_err());
        assert!(compute_kelly(2.0, 0.0, None, KellyFraction::Full).is_err());
        assert!(compute_kelly(2.0, 100.0, None, KellyFraction::Full).is_err());
        assert!(compute_kelly(f64::NAN, 50.0, None, KellyFraction::Full).is_err());
        assert!(compute_kelly(2.0, f64::NAN, None, KellyFraction::Full).is_err());

        let err = compute_kelly(1.0, 50.0, None, KellyFraction::Full).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));
    }

    #[test]
    fn test_kelly_monotonic_in_probability() {
        let mut previous = f64::NEG_INFINITY;
        for pct in 1..100 {
            let result = compute_kelly(3.2, pct as f64, None, KellyFraction::Full).unwrap();
            assert!(result.full_kelly_fraction > previous);
            previous = result.full_kelly_fraction;
        }
    }

    #[test]
    fn test_kelly_zero_edge_boundary() {
        for odds in [2.0, 4.0, 2.5, 5.0] {
            let pct = 100.0 / odds;
            let result = compute_kelly(odds, pct, None, KellyFraction::Full).unwrap();
            assert!(result.full_kelly_fraction.abs() < 1e-9);
            assert!(!result.is_positive_edge);
        }
    }

    #[test]
    fn test_fraction_scaling_is_exact() {
        for fraction in KellyFraction::ALL {
            let result = compute_kelly(2.2, 55.0, Some(500.0), fraction).unwrap();
            assert_eq!(
                result.adjusted_fraction,
                result.full_kelly_fraction * fraction.multiplier()
            );
        }
    }

    #[test]
    fn test_kelly_fraction_parse() {
        assert_eq!("half".parse::<KellyFraction>().unwrap(), KellyFraction::Half);
        assert_eq!("Full".parse::<KellyFraction>().unwrap(), KellyFraction::Full);
        assert_eq!("0.25".parse::<KellyFraction>().unwrap(), KellyFraction::Quarter);
        assert_eq!("0.1".parse::<KellyFraction>().unwrap(), KellyFraction::Tenth);
        assert!("0.3".parse::<KellyFraction>().is_err());
        assert!("double".parse::<KellyFraction>().is_err());
    }

    #[test]
    fn test_stake_advice_thresholds() {
        assert_eq!(StakeAdvice::from_fraction(-1.0), StakeAdvice::NoBet);
        assert_eq!(StakeAdvice::from_fraction(0.0), StakeAdvice::NoBet);
        assert_eq!(StakeAdvice::from_fraction(1.5), StakeAdvice::Conservative);
        assert_eq!(StakeAdvice::from_fraction(2.0), StakeAdvice::Moderate);
        assert_eq!(StakeAdvice::from_fraction(5.0), StakeAdvice::Aggressive);
    }

    #[test]
    fn test_calculator_single_caps_stake() {
        // Full Kelly on a big edge would stake far more than 10%
        let calc = KellyCalculator::new(1_000.0, KellyFraction::Full, 0.10, 0.30);
        let sizing = calc.calculate_single(3.0, 70.0).unwrap();

        assert!(sizing.kelly.recommended_stake_amount.unwrap() > 100.0);
        assert!((sizing.stake - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculator_single_negative_ev() {
        let calc = KellyCalculator::with_defaults(1_000.0);
        let sizing = calc.calculate_single(1.5, 40.0).unwrap();
        assert_eq!(sizing.stake, 0.0);
    }

    #[test]
    fn test_calculator_multiple_exposure_limit() {
        let calc = KellyCalculator::new(1_000.0, KellyFraction::Full, 0.20, 0.30);
        let bets = vec![(3.0, 60.0), (2.5, 60.0), (4.0, 40.0)];

        let sizings = calc.calculate_multiple(&bets).unwrap();
        let total: f64 = sizings.iter().map(|s| s.stake).sum();

        assert_eq!(sizings.len(), 3);
        assert!(total <= 300.0 + 1e-9);
    }

    #[test]
    fn test_calculator_multiple_empty() {
        let calc = KellyCalculator::default();
        assert!(calc.calculate_multiple(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_calculator_multiple_rejects_invalid_bet() {
        let calc = KellyCalculator::default();
        assert!(calc.calculate_multiple(&[(2.0, 60.0), (1.0, 60.0)]).is_err());
    }
}

//! Odds conversion and bookmaker margin helpers
//!
//! All odds are decimal (European) unless stated otherwise:
//!     implied probability = 1 / odds
//!     overround = sum(1 / odds_i) - 1 over a complete market

/// Check whether a decimal odds quote is usable (finite and > 1.0)
pub fn is_valid_quote(odds: f64) -> bool {
    odds.is_finite() && odds > 1.0
}

/// Keep a quote only if it is usable
pub fn sanitize_quote(odds: Option<f64>) -> Option<f64> {
    odds.filter(|&o| is_valid_quote(o))
}

/// Implied probability (0-1) of a decimal odds quote
///
/// # Examples
/// ```
/// use football_ai::core::odds::implied_probability;
/// assert!((implied_probability(2.5) - 0.4).abs() < 1e-12);
/// ```
pub fn implied_probability(odds: f64) -> f64 {
    if odds <= 0.0 {
        return 0.0;
    }
    1.0 / odds
}

/// Bookmaker margin of a complete market (0.05 = 5%)
///
/// Returns None when any quote is unusable.
pub fn overround(quotes: &[f64]) -> Option<f64> {
    if quotes.is_empty() || !quotes.iter().all(|&o| is_valid_quote(o)) {
        return None;
    }
    Some(quotes.iter().map(|&o| implied_probability(o)).sum::<f64>() - 1.0)
}

/// Margin-free probabilities for a complete market, normalised to sum to 1
pub fn fair_probabilities(quotes: &[f64]) -> Option<Vec<f64>> {
    if quotes.is_empty() || !quotes.iter().all(|&o| is_valid_quote(o)) {
        return None;
    }

    let implied: Vec<f64> = quotes.iter().map(|&o| implied_probability(o)).collect();
    let total: f64 = implied.iter().sum();

    Some(implied.into_iter().map(|p| p / total).collect())
}

/// Fair decimal odds for a probability (0-1)
pub fn fair_odds(probability: f64) -> Option<f64> {
    if !(probability > 0.0 && probability <= 1.0) {
        return None;
    }
    Some(1.0 / probability)
}

/// Convert fractional odds (e.g., 6/4) to decimal
pub fn fractional_to_decimal(numerator: u32, denominator: u32) -> Option<f64> {
    if denominator == 0 || numerator == 0 {
        return None;
    }
    Some(1.0 + numerator as f64 / denominator as f64)
}

/// Convert American odds (e.g., +150, -200) to decimal
pub fn american_to_decimal(american: i32) -> Option<f64> {
    match american {
        a if a >= 100 => Some(1.0 + a as f64 / 100.0),
        a if a <= -100 => Some(1.0 + 100.0 / (-a) as f64),
        _ => None,
    }
}

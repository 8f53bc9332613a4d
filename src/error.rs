//! Error types and input validation

use thiserror::Error;

/// Analytics error types
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Malformed or out-of-range input. The caller has to correct it.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upstream data could not be fetched or had no usable content
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Persisted state could not be written
    #[error("Storage error: {0}")]
    Storage(String),

    #[cfg(feature = "api-client")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl AnalyticsError {
    /// Data-unavailable errors are expected and handled by omission
    pub fn is_unavailable(&self) -> bool {
        match self {
            AnalyticsError::DataUnavailable(_) => true,
            #[cfg(feature = "api-client")]
            AnalyticsError::Http(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Validate decimal odds (must be finite and greater than 1.0)
pub fn validate_odds(odds: f64) -> Result<()> {
    if !odds.is_finite() || odds <= 1.0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "Decimal odds must be greater than 1.0, got {}",
            odds
        )));
    }
    Ok(())
}

/// Validate a win probability given in percent (exclusive 0-100)
pub fn validate_probability_percent(percent: f64) -> Result<()> {
    if !percent.is_finite() || percent <= 0.0 || percent >= 100.0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "Win probability must be between 0 and 100 (exclusive), got {}",
            percent
        )));
    }
    Ok(())
}

/// Validate a money amount (must be finite and positive)
pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AnalyticsError::InvalidInput(format!(
            "Amount must be greater than 0, got {}",
            amount
        )));
    }
    Ok(())
}

/// Validate a prediction confidence (0-100 inclusive)
pub fn validate_confidence(confidence: u8) -> Result<()> {
    if confidence > 100 {
        return Err(AnalyticsError::InvalidInput(format!(
            "Confidence must be between 0 and 100, got {}",
            confidence
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_odds_valid() {
        assert!(validate_odds(1.01).is_ok());
        assert!(validate_odds(2.5).is_ok());
        assert!(validate_odds(100.0).is_ok());
    }

    #[test]
    fn test_validate_odds_invalid() {
        assert!(validate_odds(1.0).is_err());
        assert!(validate_odds(0.5).is_err());
        assert!(validate_odds(-2.0).is_err());
        assert!(validate_odds(f64::NAN).is_err());
        assert!(validate_odds(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_probability_percent() {
        assert!(validate_probability_percent(1.0).is_ok());
        assert!(validate_probability_percent(50.0).is_ok());
        assert!(validate_probability_percent(99.0).is_ok());

        assert!(validate_probability_percent(0.0).is_err());
        assert!(validate_probability_percent(100.0).is_err());
        assert!(validate_probability_percent(-5.0).is_err());
        assert!(validate_probability_percent(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(0.01).is_ok());
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-10.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_confidence() {
        assert!(validate_confidence(0).is_ok());
        assert!(validate_confidence(100).is_ok());
        assert!(validate_confidence(101).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::InvalidInput("test error".to_string());
        assert!(err.to_string().contains("Invalid input"));

        let err = AnalyticsError::DataUnavailable("no result".to_string());
        assert!(err.to_string().contains("Data unavailable"));
    }

    #[test]
    fn test_is_unavailable() {
        assert!(AnalyticsError::DataUnavailable(String::new()).is_unavailable());
        assert!(!AnalyticsError::InvalidInput(String::new()).is_unavailable());
        assert!(!AnalyticsError::Storage(String::new()).is_unavailable());
    }
}

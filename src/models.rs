use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AnalyticsError;

/// Label used for the draw outcome in predicted winner names
pub const DRAW_LABEL: &str = "Draw";

/// Predicted winner and model confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedWinner {
    pub winner_name: String,
    pub confidence: u8, // 0-100
}

/// Final score and whether the prediction held
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerifiedResult {
    pub home_goals: u32,
    pub away_goals: u32,
    pub is_correct: bool,
}

/// Input for recording a new prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPrediction {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub league: Option<String>,
    pub winner_name: String,
    pub confidence: u8,
}

/// A stored prediction; `result` is None while pending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub league: Option<String>,
    pub created_at: DateTime<Utc>,
    pub prediction: PredictedWinner,
    #[serde(default)]
    pub result: Option<VerifiedResult>,
}

/// Verification state of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionStatus {
    Pending,
    VerifiedCorrect,
    VerifiedWrong,
}

impl PredictionRecord {
    pub fn status(&self) -> PredictionStatus {
        match self.result {
            None => PredictionStatus::Pending,
            Some(r) if r.is_correct => PredictionStatus::VerifiedCorrect,
            Some(_) => PredictionStatus::VerifiedWrong,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.result.is_none()
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.result.map(|r| r.is_correct)
    }

    /// Winner name implied by a final score
    pub fn actual_winner(&self, home_goals: u32, away_goals: u32) -> &str {
        if home_goals > away_goals {
            &self.home_team
        } else if away_goals > home_goals {
            &self.away_team
        } else {
            DRAW_LABEL
        }
    }
}

/// Bankroll transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    BetWin,
    BetLoss,
}

impl TransactionKind {
    /// Sign applied to the balance: +1 for money in, -1 for money out
    pub fn sign(&self) -> f64 {
        match self {
            TransactionKind::Deposit | TransactionKind::BetWin => 1.0,
            TransactionKind::Withdraw | TransactionKind::BetLoss => -1.0,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
            TransactionKind::BetWin => "bet_win",
            TransactionKind::BetLoss => "bet_loss",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TransactionKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdraw" | "withdrawal" => Ok(TransactionKind::Withdraw),
            "bet_win" | "win" => Ok(TransactionKind::BetWin),
            "bet_loss" | "loss" => Ok(TransactionKind::BetLoss),
            _ => Err(AnalyticsError::InvalidInput(format!(
                "Unknown transaction type: {}",
                s
            ))),
        }
    }
}

/// A single bankroll movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankrollTransaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: f64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub note: String,
}

impl BankrollTransaction {
    /// Signed effect on the balance
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }
}

/// Bankroll snapshot; transactions are newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankrollState {
    pub starting_bankroll: f64,
    pub current_bankroll: f64,
    pub transactions: Vec<BankrollTransaction>,
}

impl BankrollState {
    pub fn is_initialized(&self) -> bool {
        self.starting_bankroll > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(result: Option<VerifiedResult>) -> PredictionRecord {
        PredictionRecord {
            id: Uuid::new_v4(),
            match_id: "1001".to_string(),
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            league: Some("Premier League".to_string()),
            created_at: Utc::now(),
            prediction: PredictedWinner {
                winner_name: "Arsenal".to_string(),
                confidence: 72,
            },
            result,
        }
    }

    #[test]
    fn test_prediction_status() {
        assert_eq!(record(None).status(), PredictionStatus::Pending);

        let won = record(Some(VerifiedResult {
            home_goals: 2,
            away_goals: 1,
            is_correct: true,
        }));
        assert_eq!(won.status(), PredictionStatus::VerifiedCorrect);
        assert_eq!(won.is_correct(), Some(true));

        let lost = record(Some(VerifiedResult {
            home_goals: 0,
            away_goals: 1,
            is_correct: false,
        }));
        assert_eq!(lost.status(), PredictionStatus::VerifiedWrong);
    }

    #[test]
    fn test_actual_winner() {
        let r = record(None);
        assert_eq!(r.actual_winner(2, 0), "Arsenal");
        assert_eq!(r.actual_winner(0, 3), "Chelsea");
        assert_eq!(r.actual_winner(1, 1), DRAW_LABEL);
    }

    #[test]
    fn test_transaction_kind_parse_and_sign() {
        assert_eq!("deposit".parse::<TransactionKind>().unwrap(), TransactionKind::Deposit);
        assert_eq!("bet-win".parse::<TransactionKind>().unwrap(), TransactionKind::BetWin);
        assert_eq!("LOSS".parse::<TransactionKind>().unwrap(), TransactionKind::BetLoss);
        assert!("refund".parse::<TransactionKind>().is_err());

        assert_eq!(TransactionKind::Deposit.sign(), 1.0);
        assert_eq!(TransactionKind::Withdraw.sign(), -1.0);
    }

    #[test]
    fn test_prediction_record_serialization() {
        let r = record(None);
        let json = serde_json::to_string(&r).unwrap();
        let deserialized: PredictionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, r);
        assert!(deserialized.is_pending());
    }

    #[test]
    fn test_transaction_kind_serializes_snake_case() {
        let json = serde_json::to_string(&TransactionKind::BetLoss).unwrap();
        assert_eq!(json, "\"bet_loss\"");
    }
}

//! Bankroll Ledger
//!
//! Transaction log with a running balance and derived metrics such as ROI,
//! win rate and drawdown.
//!
//! The balance is replayed from the transaction log, oldest first, and
//! floored at zero after every step. Adding a transaction therefore applies
//! one more step, and removing one replays the log without it, which always
//! restores the balance that existed before the transaction was added.
//!
//! The starting amount is recorded as a deposit, so while no step was
//! floored the balance satisfies
//!
//! ```text
//! current = deposits + wins - withdrawals - losses
//! ```
//!
//! with the initial deposit included in `deposits`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{validate_amount, AnalyticsError, Result};
use crate::models::{BankrollState, BankrollTransaction, TransactionKind};
use crate::storage::{load_json, save_json, KeyValueStore};

/// Store key for the bankroll state
pub const BANKROLL_KEY: &str = "bankroll_data";

/// Note attached to the deposit created by `initialize`
pub const INITIAL_DEPOSIT_NOTE: &str = "Initial bankroll";

/// Derived bankroll metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankrollMetrics {
    pub total_deposits: f64,
    pub total_withdrawals: f64,
    pub total_wins: f64,
    pub total_losses: f64,
    pub bets_won: usize,
    pub bets_lost: usize,
    pub profit_loss: f64,
    pub roi: f64,      // percent of deposits
    pub win_rate: f64, // percent of settled bets
}

/// Apply one transaction to a balance, flooring at zero
fn apply(balance: f64, tx: &BankrollTransaction) -> f64 {
    (balance + tx.signed_amount()).max(0.0)
}

/// Running balances for transactions given newest first
///
/// Returned oldest first, one entry per transaction.
fn replay(transactions: &[BankrollTransaction]) -> Vec<f64> {
    let mut balance = 0.0;
    transactions
        .iter()
        .rev()
        .map(|tx| {
            balance = apply(balance, tx);
            balance
        })
        .collect()
}

/// Bankroll ledger backed by a key-value store
pub struct BankrollLedger<S: KeyValueStore> {
    store: S,
    state: BankrollState,
}

impl<S: KeyValueStore> BankrollLedger<S> {
    /// Open the ledger, loading any persisted state
    ///
    /// Missing or malformed data yields an uninitialized ledger.
    pub fn open(store: S) -> Self {
        let mut state: BankrollState = load_json(&store, BANKROLL_KEY).unwrap_or_default();
        state.transactions.sort_by(|a, b| b.date.cmp(&a.date));
        if !state.transactions.is_empty() {
            state.current_bankroll = replay(&state.transactions).last().copied().unwrap_or(0.0);
        }

        debug!(
            "Loaded bankroll: {:.2} across {} transactions",
            state.current_bankroll,
            state.transactions.len()
        );
        Self { store, state }
    }

    pub fn state(&self) -> &BankrollState {
        &self.state
    }

    pub fn current_bankroll(&self) -> f64 {
        self.state.current_bankroll
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Set up the bankroll with a starting amount
    ///
    /// Records the starting amount as a deposit. An initialized ledger has to
    /// be reset first.
    pub fn initialize(&mut self, amount: f64) -> Result<&BankrollState> {
        validate_amount(amount)?;
        if self.state.is_initialized() {
            return Err(AnalyticsError::InvalidInput(
                "Bankroll already initialized; reset it first".to_string(),
            ));
        }

        let deposit = BankrollTransaction {
            id: Uuid::new_v4(),
            kind: TransactionKind::Deposit,
            amount,
            date: Utc::now(),
            note: INITIAL_DEPOSIT_NOTE.to_string(),
        };

        let next = BankrollState {
            starting_bankroll: amount,
            current_bankroll: apply(0.0, &deposit),
            transactions: vec![deposit],
        };
        self.commit(next)?;

        info!("Initialized bankroll with {:.2}", amount);
        Ok(&self.state)
    }

    /// Record a transaction
    pub fn add_transaction(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        note: Option<&str>,
    ) -> Result<BankrollTransaction> {
        self.add_transaction_at(kind, amount, note, Utc::now())
    }

    /// Record a transaction with an explicit date
    ///
    /// The date must not precede the newest recorded transaction.
    pub fn add_transaction_at(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        note: Option<&str>,
        date: DateTime<Utc>,
    ) -> Result<BankrollTransaction> {
        validate_amount(amount)?;
        if !self.state.is_initialized() {
            return Err(AnalyticsError::InvalidInput(
                "Bankroll not initialized".to_string(),
            ));
        }
        if let Some(newest) = self.state.transactions.first() {
            if date < newest.date {
                return Err(AnalyticsError::InvalidInput(format!(
                    "Transaction date {} precedes the latest transaction",
                    date
                )));
            }
        }

        let tx = BankrollTransaction {
            id: Uuid::new_v4(),
            kind,
            amount,
            date,
            note: note.map(str::trim).unwrap_or_default().to_string(),
        };

        let mut next = self.state.clone();
        next.current_bankroll = apply(next.current_bankroll, &tx);
        next.transactions.insert(0, tx.clone());
        self.commit(next)?;

        info!(
            "Recorded {} of {:.2}, balance {:.2}",
            tx.kind, tx.amount, self.state.current_bankroll
        );
        Ok(tx)
    }

    /// Remove a transaction and undo its effect on the balance
    pub fn remove_transaction(&mut self, id: Uuid) -> Result<BankrollTransaction> {
        let position = self
            .state
            .transactions
            .iter()
            .position(|tx| tx.id == id)
            .ok_or_else(|| AnalyticsError::InvalidInput(format!("Unknown transaction: {}", id)))?;

        let mut next = self.state.clone();
        let removed = next.transactions.remove(position);
        next.current_bankroll = replay(&next.transactions).last().copied().unwrap_or(0.0);
        self.commit(next)?;

        info!(
            "Removed {} of {:.2}, balance {:.2}",
            removed.kind, removed.amount, self.state.current_bankroll
        );
        Ok(removed)
    }

    /// Return to the uninitialized state
    pub fn reset(&mut self) -> Result<()> {
        self.store.remove(BANKROLL_KEY)?;
        self.state = BankrollState::default();

        info!("Bankroll reset");
        Ok(())
    }

    /// Derived metrics over all transactions
    pub fn metrics(&self) -> BankrollMetrics {
        let mut m = BankrollMetrics::default();

        for tx in &self.state.transactions {
            match tx.kind {
                TransactionKind::Deposit => m.total_deposits += tx.amount,
                TransactionKind::Withdraw => m.total_withdrawals += tx.amount,
                TransactionKind::BetWin => {
                    m.total_wins += tx.amount;
                    m.bets_won += 1;
                }
                TransactionKind::BetLoss => {
                    m.total_losses += tx.amount;
                    m.bets_lost += 1;
                }
            }
        }

        m.profit_loss = self.state.current_bankroll - m.total_deposits + m.total_withdrawals;
        m.roi = if m.total_deposits > 0.0 {
            m.profit_loss / m.total_deposits * 100.0
        } else {
            0.0
        };

        let settled = m.bets_won + m.bets_lost;
        m.win_rate = if settled > 0 {
            m.bets_won as f64 / settled as f64 * 100.0
        } else {
            0.0
        };

        m
    }

    /// Balance after each transaction, oldest first
    pub fn balance_history(&self) -> Vec<f64> {
        replay(&self.state.transactions)
    }

    /// Largest peak-to-trough fall of the balance
    ///
    /// Returns the absolute fall and the fall as a percentage of the peak.
    pub fn max_drawdown(&self) -> (f64, f64) {
        let mut peak = f64::MIN;
        let mut max_drawdown = 0.0;
        let mut max_drawdown_pct = 0.0;

        for value in self.balance_history() {
            if value > peak {
                peak = value;
            }
            let drawdown = peak - value;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
                max_drawdown_pct = if peak > 0.0 {
                    drawdown / peak * 100.0
                } else {
                    0.0
                };
            }
        }

        (max_drawdown, max_drawdown_pct)
    }

    /// Give back the underlying store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Persist a new state, keeping the old one if the write fails
    fn commit(&mut self, next: BankrollState) -> Result<()> {
        save_json(&mut self.store, BANKROLL_KEY, &next)?;
        self.state = next;
        Ok(())
    }
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::clock::{Clock, SystemClock};

pub type AccountId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

/// Single entry of an account's history.
///
/// `balance_before` and `balance_after` can be derived from `kind` and
/// `amount`, but are kept so the history reads on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },
    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },
    #[error("Depositing {amount} would overflow balance {balance}")]
    AmountOverflow { balance: Decimal, amount: Decimal },
}

#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    owner: String,
    balance: Decimal,
    history: Vec<Transaction>,
    created_at: DateTime<Utc>,
    clock: Arc<dyn Clock>,
}

impl Account {
    pub fn new(
        id: impl Into<AccountId>,
        owner: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<Self, AccountError> {
        Self::with_clock(id, owner, initial_balance, Arc::new(SystemClock))
    }

    /// Same as [`Account::new`], but every timestamp is taken from `clock`.
    pub fn with_clock(
        id: impl Into<AccountId>,
        owner: impl Into<String>,
        initial_balance: Decimal,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AccountError> {
        if initial_balance < Decimal::ZERO {
            return Err(AccountError::InvalidAmount {
                amount: initial_balance,
            });
        }
        Ok(Self {
            id: id.into(),
            owner: owner.into(),
            balance: initial_balance,
            history: Vec::new(),
            created_at: clock.now(),
            clock,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of the history in the order operations happened.
    pub fn history(&self) -> Vec<Transaction> {
        self.history.clone()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        let tx = self.handle_transaction(TransactionKind::Deposit, amount)?;
        self.apply(tx);
        Ok(())
    }

    /// Fails without touching the balance or history when `amount` is not
    /// positive or exceeds the current balance.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), AccountError> {
        let tx = self.handle_transaction(TransactionKind::Withdrawal, amount)?;
        self.apply(tx);
        Ok(())
    }

    fn handle_transaction(
        &self,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<Transaction, AccountError> {
        if amount <= Decimal::ZERO {
            return Err(AccountError::InvalidAmount { amount });
        }

        let balance_after = match kind {
            TransactionKind::Deposit => self.balance.checked_add(amount).ok_or(
                AccountError::AmountOverflow {
                    balance: self.balance,
                    amount,
                },
            )?,
            TransactionKind::Withdrawal => {
                if amount > self.balance {
                    return Err(AccountError::InsufficientFunds {
                        balance: self.balance,
                        requested: amount,
                    });
                }
                self.balance - amount
            }
        };

        Ok(Transaction {
            kind,
            amount,
            timestamp: self.clock.now(),
            balance_before: self.balance,
            balance_after,
        })
    }

    fn apply(&mut self, tx: Transaction) {
        self.balance = tx.balance_after;
        debug!(
            account = %self.id,
            kind = ?tx.kind,
            amount = %tx.amount,
            balance = %self.balance,
            "transaction recorded"
        );
        self.history.push(tx);
    }
}

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    account::{Account, AccountError, AccountId},
    clock::{Clock, SystemClock},
    validation::{ExternalServiceError, ExternalValidator, SimulatedValidationService},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BankError {
    #[error("Account {0} not found")]
    AccountNotFound(AccountId),
    #[error("Account {0} already exists")]
    DuplicateAccount(AccountId),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    ExternalService(#[from] ExternalServiceError),
}

#[derive(Debug)]
pub struct Bank {
    name: String,
    accounts: HashMap<AccountId, Account>,
    transaction_count: u64,
    clock: Arc<dyn Clock>,
    validator: Arc<dyn ExternalValidator>,
}

impl Bank {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accounts: HashMap::new(),
            transaction_count: 0,
            clock: Arc::new(SystemClock),
            validator: Arc::new(SimulatedValidationService::default()),
        }
    }

    /// Clock handed to every account created from now on.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn ExternalValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of successful transfers. Deposits and withdrawals made directly
    /// on an account are not counted.
    pub fn transaction_count(&self) -> u64 {
        self.transaction_count
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn create_account(
        &mut self,
        id: impl Into<AccountId>,
        owner: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<&mut Account, BankError> {
        match self.accounts.entry(id.into()) {
            Entry::Occupied(entry) => Err(BankError::DuplicateAccount(entry.key().clone())),
            Entry::Vacant(entry) => {
                let account = Account::with_clock(
                    entry.key().clone(),
                    owner,
                    initial_balance,
                    self.clock.clone(),
                )?;
                info!(
                    bank = %self.name,
                    account = %account.id(),
                    owner = %account.owner(),
                    balance = %account.balance(),
                    "account created"
                );
                Ok(entry.insert(account))
            }
        }
    }

    pub fn get_account(&self, id: &str) -> Result<&Account, BankError> {
        self.accounts
            .get(id)
            .ok_or_else(|| BankError::AccountNotFound(id.to_owned()))
    }

    /// Direct access to an account. Changes made through it bypass the
    /// transfer bookkeeping.
    pub fn get_account_mut(&mut self, id: &str) -> Result<&mut Account, BankError> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| BankError::AccountNotFound(id.to_owned()))
    }

    /// Moves `amount` from one account to another.
    ///
    /// Everything is checked before the first mutation: the amount, the
    /// origin account, the destination account, the origin's balance and
    /// finally room in the destination's balance, in that order.
    pub fn transfer(&mut self, from_id: &str, to_id: &str, amount: Decimal) -> Result<(), BankError> {
        if amount <= Decimal::ZERO {
            return Err(AccountError::InvalidAmount { amount }.into());
        }
        let balance = self.get_account(from_id)?.balance();
        let to_balance = self.get_account(to_id)?.balance();
        if balance < amount {
            return Err(AccountError::InsufficientFunds {
                balance,
                requested: amount,
            }
            .into());
        }
        // a transfer to the same account withdraws first, so it cannot overflow
        if from_id != to_id && to_balance.checked_add(amount).is_none() {
            return Err(AccountError::AmountOverflow {
                balance: to_balance,
                amount,
            }
            .into());
        }

        self.get_account_mut(from_id)?.withdraw(amount)?;
        // Withdrawal is not rolled back on failure here. Deposit only rejects
        // non-positive amounts and overflows, both excluded above.
        self.get_account_mut(to_id)?.deposit(amount)?;

        self.transaction_count += 1;
        debug!(from = from_id, to = to_id, %amount, "transfer completed");
        Ok(())
    }

    /// Sum of all account balances, `None` if it does not fit in a `Decimal`.
    pub fn total_deposited(&self) -> Option<Decimal> {
        self.accounts
            .values()
            .try_fold(Decimal::ZERO, |total, acc| total.checked_add(acc.balance()))
    }

    /// Asks the external validator about `id`. Errors are returned as is,
    /// retrying is up to the caller.
    pub fn validate_account_externally(&self, id: &str) -> Result<bool, BankError> {
        let registered = self.accounts.contains_key(id);
        match self.validator.validate(id, registered) {
            Ok(valid) => Ok(valid),
            Err(err) => {
                warn!(account = id, "external validation failed: {err}");
                Err(err.into())
            }
        }
    }
}

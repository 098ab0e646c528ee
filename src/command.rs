use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::account::AccountId;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Open,
    Deposit,
    Withdrawal,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankCommand {
    OpenAccount {
        id: AccountId,
        owner: String,
        initial_balance: Decimal,
    },
    Deposit {
        id: AccountId,
        amount: Decimal,
    },
    Withdraw {
        id: AccountId,
        amount: Decimal,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BankCommandError {
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: OperationKind },
    #[error("Owner is required to open an account")]
    OwnerRequired,
    #[error("Destination account is required for a transfer")]
    DestinationRequired,
}

impl BankCommand {
    /// Builds a command from the loosely typed columns of an operation
    /// record. Only presence is checked here, amounts are validated by the
    /// account itself.
    pub fn parse_command(
        kind: OperationKind,
        account: AccountId,
        owner: Option<String>,
        to: Option<AccountId>,
        amount: Option<Decimal>,
    ) -> Result<Self, BankCommandError> {
        match kind {
            OperationKind::Open => Ok(Self::OpenAccount {
                id: account,
                owner: non_empty(owner).ok_or(BankCommandError::OwnerRequired)?,
                initial_balance: amount.unwrap_or(Decimal::ZERO),
            }),
            OperationKind::Deposit => Ok(Self::Deposit {
                id: account,
                amount: Self::require_amount(kind, amount)?,
            }),
            OperationKind::Withdrawal => Ok(Self::Withdraw {
                id: account,
                amount: Self::require_amount(kind, amount)?,
            }),
            OperationKind::Transfer => Ok(Self::Transfer {
                from: account,
                to: non_empty(to).ok_or(BankCommandError::DestinationRequired)?,
                amount: Self::require_amount(kind, amount)?,
            }),
        }
    }

    fn require_amount(
        kind: OperationKind,
        amount: Option<Decimal>,
    ) -> Result<Decimal, BankCommandError> {
        amount.ok_or(BankCommandError::AmountRequired { kind })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

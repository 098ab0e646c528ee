use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::AccountId,
    bank::BankError,
    command::{BankCommandError, OperationKind},
};

pub mod bank_processor;

#[derive(Debug, Error)]
pub enum OperationProcessError {
    #[error(transparent)]
    ParseErr(#[from] csv::Error),
    #[error(transparent)]
    CommandErr(#[from] BankCommandError),
    #[error(transparent)]
    BankErr(#[from] BankError),
}

pub trait OperationProcessor {
    fn process_operation(
        &mut self,
        kind: OperationKind,
        account: AccountId,
        owner: Option<String>,
        to: Option<AccountId>,
        amount: Option<Decimal>,
    ) -> Result<(), OperationProcessError>;
}

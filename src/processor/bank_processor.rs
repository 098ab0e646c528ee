use rust_decimal::Decimal;

use crate::{
    account::AccountId,
    bank::{Bank, BankError},
    command::{BankCommand, OperationKind},
};

use super::{OperationProcessError, OperationProcessor};

impl OperationProcessor for Bank {
    fn process_operation(
        &mut self,
        kind: OperationKind,
        account: AccountId,
        owner: Option<String>,
        to: Option<AccountId>,
        amount: Option<Decimal>,
    ) -> Result<(), OperationProcessError> {
        let cmd = BankCommand::parse_command(kind, account, owner, to, amount)?;
        match cmd {
            BankCommand::OpenAccount {
                id,
                owner,
                initial_balance,
            } => {
                self.create_account(id, owner, initial_balance)?;
            }
            BankCommand::Deposit { id, amount } => {
                self.get_account_mut(&id)?
                    .deposit(amount)
                    .map_err(BankError::from)?;
            }
            BankCommand::Withdraw { id, amount } => {
                self.get_account_mut(&id)?
                    .withdraw(amount)
                    .map_err(BankError::from)?;
            }
            BankCommand::Transfer { from, to, amount } => {
                self.transfer(&from, &to, amount)?;
            }
        };
        Ok(())
    }
}

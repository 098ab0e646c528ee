use std::io::Write;

use crate::{
    account::{Account, AccountId},
    bank::Bank,
};
use anyhow::Context;
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub account: AccountId,
    pub owner: String,
    pub balance: Decimal,
    pub transactions: usize,
}

impl From<&Account> for AccountSummary {
    fn from(acc: &Account) -> Self {
        Self {
            account: acc.id().to_owned(),
            owner: acc.owner().to_owned(),
            balance: acc.balance(),
            transactions: acc.history_len(),
        }
    }
}

/// Writes one summary row per account in `bank`, in map order.
pub fn print_accounts<W>(output: &mut W, bank: &Bank) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for acc in bank.accounts() {
        writer
            .serialize(AccountSummary::from(acc))
            .with_context(|| format!("Failed to write account {} to CSV", acc.id()))?;
    }
    writer.flush().context("Failed to flush CSV writer")
}

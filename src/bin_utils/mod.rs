//! Wires the CSV parser and printer to a [`Bank`], so the library can be
//! driven from a file. Kept in the library so integration tests can use it.

use std::io::{Read, Write};

use crate::{
    bank::Bank,
    processor::{OperationProcessError, OperationProcessor},
};
use anyhow::Result;
use csv_parser::CsvOperationParser;
use csv_printer::print_accounts;
use tracing::info;
pub mod csv_parser;
pub mod csv_printer;

pub struct Service<'w, R, W: 'w> {
    pub bank: Bank,
    pub input: R,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, OperationProcessError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    /// Applies every operation in order and prints the resulting accounts.
    /// Returns the bank so callers can inspect its final state.
    pub fn run(mut self) -> Result<Bank> {
        let parser = CsvOperationParser::new(self.input);

        for (line, row) in parser {
            let result = row.map_err(OperationProcessError::from).and_then(|op| {
                self.bank
                    .process_operation(op.kind, op.account, op.owner, op.to, op.amount)
            });
            if let Err(err) = result {
                (self.error_printer)(line, err);
            }
        }

        let total = self
            .bank
            .total_deposited()
            .map_or_else(|| "overflow".to_string(), |total| total.to_string());
        info!(
            bank = %self.bank.name(),
            accounts = self.bank.account_count(),
            %total,
            transfers = self.bank.transaction_count(),
            "operations processed"
        );

        print_accounts(self.output, &self.bank)?;
        Ok(self.bank)
    }
}

use std::fs::File;

use anyhow::{Context, Result};
use toy_bank::{
    bank::Bank,
    bin_utils::Service,
    processor::OperationProcessError,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_BANK_NAME: &str = "Toy Bank";

fn main() -> Result<()> {
    // stdout carries the CSV report, logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "toy_bank=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let filename = args
        .next()
        .context("Expected a file name as the first argument")?;
    let bank_name = args.next().unwrap_or_else(|| DEFAULT_BANK_NAME.to_string());
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        bank: Bank::new(bank_name),
        input: file,
        output: &mut std::io::stdout(),
        error_printer: Box::new(|line: u64, err: OperationProcessError| {
            match err {
                OperationProcessError::ParseErr(err) => {
                    eprintln!("Error at line {line}: {err}")
                }
                OperationProcessError::CommandErr(err) => {
                    eprintln!("Error at line {line}: {err}")
                }
                // rejected operations are expected, not input errors
                OperationProcessError::BankErr(err) => {
                    debug!(line, "operation rejected: {err}")
                }
            }
        }),
    };
    service.run()?;
    Ok(())
}

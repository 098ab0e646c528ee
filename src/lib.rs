/// Single account: balance, owner and append-only transaction history.
pub mod account;

/// Collection of accounts with transfers and aggregate queries.
pub mod bank;

/// Time source used for account and transaction timestamps.
pub mod clock;

/// External account validation, plus a simulated slow and unreliable
/// implementation of it.
pub mod validation;

/// Turns loosely typed operation records into bank commands.
pub mod command;

/// Operation processor interface, implemented by [`bank::Bank`].
///
/// NOTE: the CSV driver is its only user, but it keeps the driver
/// independent from how operations end up being executed.
pub mod processor;

/// Bootstraps the library from a CSV file. Lives here rather than in the
/// binary so integration tests can drive it.
pub mod bin_utils;

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use rust_decimal::Decimal;
use toy_bank::{
    bank::{Bank, BankError},
    validation::{ExternalServiceError, ExternalValidator, SimulatedValidationService},
};

/// Replays canned answers and remembers who asked.
#[derive(Debug, Default)]
struct ScriptedValidator {
    answers: Mutex<VecDeque<Result<bool, ExternalServiceError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedValidator {
    fn new(answers: impl IntoIterator<Item = Result<bool, ExternalServiceError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            calls: Mutex::default(),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ExternalValidator for ScriptedValidator {
    fn validate(&self, account_id: &str, _registered: bool) -> Result<bool, ExternalServiceError> {
        self.calls.lock().unwrap().push(account_id.to_owned());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted answer left")
    }
}

/// Fails a fixed number of times, then reports registration honestly.
#[derive(Debug)]
struct FlakyValidator {
    failures_left: AtomicUsize,
    calls: AtomicUsize,
}

impl FlakyValidator {
    fn failing(times: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(times),
            calls: AtomicUsize::new(0),
        }
    }
}

impl ExternalValidator for FlakyValidator {
    fn validate(&self, _account_id: &str, registered: bool) -> Result<bool, ExternalServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            Err(ExternalServiceError)
        } else {
            Ok(registered)
        }
    }
}

fn bank_with(validator: Arc<dyn ExternalValidator>) -> Bank {
    let mut bank = Bank::new("Validation Bank").with_validator(validator);
    bank.create_account("1", "Ana", Decimal::from(100)).unwrap();
    bank
}

fn validate_with_retry(bank: &Bank, id: &str, attempts: usize) -> Result<bool, BankError> {
    let mut last = Err(BankError::ExternalService(ExternalServiceError));
    for _ in 0..attempts {
        last = bank.validate_account_externally(id);
        if !matches!(last, Err(BankError::ExternalService(_))) {
            break;
        }
    }
    last
}

#[test]
fn stubbed_answers_are_returned() {
    let validator = Arc::new(ScriptedValidator::new([Ok(true), Ok(false), Ok(true)]));
    let bank = bank_with(validator.clone());

    assert_eq!(bank.validate_account_externally("1"), Ok(true));
    // the double decides, even for a registered account
    assert_eq!(bank.validate_account_externally("1"), Ok(false));
    assert_eq!(bank.validate_account_externally("2"), Ok(true));
    assert_eq!(validator.calls(), vec!["1", "1", "2"]);
}

#[test]
fn service_errors_reach_the_caller() {
    let validator = Arc::new(ScriptedValidator::new([Err(ExternalServiceError)]));
    let bank = bank_with(validator.clone());

    let err = bank.validate_account_externally("1").unwrap_err();
    assert_eq!(err, BankError::ExternalService(ExternalServiceError));
    assert_eq!(
        err.to_string(),
        "External validation service is unavailable"
    );
    // no hidden retry
    assert_eq!(validator.calls().len(), 1);
}

#[test]
fn caller_side_retry() {
    let validator = Arc::new(FlakyValidator::failing(2));
    let bank = bank_with(validator.clone());

    assert_eq!(validate_with_retry(&bank, "1", 3), Ok(true));
    assert_eq!(validator.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn retry_gives_up() {
    let validator = Arc::new(FlakyValidator::failing(5));
    let bank = bank_with(validator.clone());

    assert_eq!(
        validate_with_retry(&bank, "1", 3),
        Err(BankError::ExternalService(ExternalServiceError))
    );
    assert_eq!(validator.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn seeded_service_is_reproducible() {
    let run = || {
        let bank = bank_with(Arc::new(SimulatedValidationService::seeded(
            Duration::ZERO,
            0.5,
            7,
        )));
        (0..20)
            .map(|_| bank.validate_account_externally("1").is_ok())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn reliable_service_knows_registered_accounts() {
    let bank = bank_with(Arc::new(SimulatedValidationService::new(
        Duration::from_millis(20),
        0.0,
    )));

    let started = Instant::now();
    assert_eq!(bank.validate_account_externally("1"), Ok(true));
    assert_eq!(bank.validate_account_externally("2"), Ok(false));
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[test]
fn validation_does_not_touch_accounts() {
    let bank = bank_with(Arc::new(ScriptedValidator::new([Ok(true)])));
    bank.validate_account_externally("1").unwrap();

    let acc = bank.get_account("1").unwrap();
    assert_eq!(acc.balance(), Decimal::from(100));
    assert_eq!(acc.history_len(), 0);
    assert_eq!(bank.transaction_count(), 0);
}

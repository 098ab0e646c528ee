use std::{
    fmt::Debug,
    sync::{Mutex, PoisonError},
    thread,
    time::Duration,
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(100);
pub const DEFAULT_FAILURE_RATE: f64 = 0.1;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("External validation service is unavailable")]
pub struct ExternalServiceError;

/// Remote service asked whether an account is legitimate.
///
/// `registered` tells the service whether the bank itself knows the id.
/// Implementations may answer whatever they like, which is what makes
/// test doubles possible.
pub trait ExternalValidator: Debug + Send + Sync {
    fn validate(&self, account_id: &str, registered: bool) -> Result<bool, ExternalServiceError>;
}

/// Stand-in for a real validation backend: blocks for `latency`, then fails
/// with probability `failure_rate`, otherwise confirms registered ids.
#[derive(Debug)]
pub struct SimulatedValidationService {
    latency: Duration,
    failure_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedValidationService {
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        Self::with_rng(latency, failure_rate, StdRng::from_os_rng())
    }

    /// Reproducible failure pattern for a given `seed`.
    pub fn seeded(latency: Duration, failure_rate: f64, seed: u64) -> Self {
        Self::with_rng(latency, failure_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(latency: Duration, failure_rate: f64, rng: StdRng) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            warn!("failure rate is NaN, using {DEFAULT_FAILURE_RATE}");
            DEFAULT_FAILURE_RATE
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self {
            latency,
            failure_rate,
            rng: Mutex::new(rng),
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

impl Default for SimulatedValidationService {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY, DEFAULT_FAILURE_RATE)
    }
}

impl ExternalValidator for SimulatedValidationService {
    fn validate(&self, _account_id: &str, registered: bool) -> Result<bool, ExternalServiceError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let roll: f64 = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random();
        if roll < self.failure_rate {
            return Err(ExternalServiceError);
        }

        Ok(registered)
    }
}

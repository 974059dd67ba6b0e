//! Fault injectors for the validate endpoint.
//!
//! `NoFaults` is the production default. The others make the authority look
//! broken to the gates so the offline fallback can be exercised.

use crate::ports::outbound::FaultInjector;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFaults;

impl FaultInjector for NoFaults {
    fn should_fail(&self) -> bool {
        false
    }
}

/// Always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysFail;

impl FaultInjector for AlwaysFail {
    fn should_fail(&self) -> bool {
        true
    }
}

/// Fails every `n`th call (the `n`th, `2n`th, ...). Deterministic.
#[derive(Debug)]
pub struct FailEveryNth {
    n: u64,
    calls: AtomicU64,
}

impl FailEveryNth {
    /// `n == 0` never fails.
    pub fn new(n: u64) -> Self {
        Self {
            n,
            calls: AtomicU64::new(0),
        }
    }
}

impl FaultInjector for FailEveryNth {
    fn should_fail(&self) -> bool {
        if self.n == 0 {
            return false;
        }
        let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        call % self.n == 0
    }
}

/// Fails with probability `rate`. For manual demos only.
#[derive(Debug, Clone, Copy)]
pub struct RandomFaults {
    rate: f64,
}

impl RandomFaults {
    /// `rate` is clamped to `[0, 1]`.
    pub fn new(rate: f64) -> Self {
        Self {
            rate: if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) },
        }
    }
}

impl FaultInjector for RandomFaults {
    fn should_fail(&self) -> bool {
        rand::thread_rng().gen_bool(self.rate)
    }
}

/// Serializable choice of fault injector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FaultInjectionConfig {
    #[default]
    None,
    Always,
    EveryNth {
        n: u64,
    },
    Random {
        rate: f64,
    },
}

impl FaultInjectionConfig {
    /// Build the injector this configuration describes.
    pub fn build(&self) -> Arc<dyn FaultInjector> {
        match *self {
            FaultInjectionConfig::None => Arc::new(NoFaults),
            FaultInjectionConfig::Always => Arc::new(AlwaysFail),
            FaultInjectionConfig::EveryNth { n } => Arc::new(FailEveryNth::new(n)),
            FaultInjectionConfig::Random { rate } => Arc::new(RandomFaults::new(rate)),
        }
    }
}

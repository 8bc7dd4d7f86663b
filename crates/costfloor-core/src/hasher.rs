//! Self-tuning password hasher.
//!
//! An [`AdaptiveHasher`] calibrates once at construction, then keeps every
//! hash it produces above a minimum wall-clock duration:
//!
//! - [`AdaptiveHasher::hash`] raises the cost factor whenever a hash comes
//!   back faster than the floor, and never lowers it.
//! - [`AdaptiveHasher::validate`] checks a password and, when the stored hash
//!   was made at a cost below the current one, hands back a stronger
//!   replacement for the caller to persist.
//!
//! # Concurrency
//!
//! The current cost factor is an atomic. Hashing runs without holding any
//! lock, and escalation uses `fetch_max`, so concurrent callers can never
//! lose an escalation or move the cost backwards.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calibrate::{hash_and_time, Calibration, Calibrator, SearchStrategy, DEFAULT_PROBE};
use crate::clock::{MonotonicClock, TimeSource};
use crate::error::{CostFloorError, Result};
use crate::observe::{HashEvent, HashObserver};
use crate::primitive::{checked_range, HashPrimitive};

/// Construction parameters for an [`AdaptiveHasher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasherConfig {
    /// Floor every produced hash must meet, in milliseconds
    pub min_duration_ms: u64,
    /// Fixed, non-secret input hashed during calibration
    #[serde(default = "default_probe")]
    pub probe: Vec<u8>,
    #[serde(default)]
    pub strategy: SearchStrategy,
    /// Narrower `(min, max)` cost range than the primitive supports
    #[serde(default)]
    pub cost_range: Option<(u32, u32)>,
}

fn default_probe() -> Vec<u8> {
    DEFAULT_PROBE.to_vec()
}

impl HasherConfig {
    pub fn new(min_duration_ms: u64) -> Self {
        Self {
            min_duration_ms,
            probe: default_probe(),
            strategy: SearchStrategy::default(),
            cost_range: None,
        }
    }

    pub fn with_probe(mut self, probe: impl Into<Vec<u8>>) -> Self {
        self.probe = probe.into();
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_cost_range(mut self, min_cost: u32, max_cost: u32) -> Self {
        self.cost_range = Some((min_cost, max_cost));
        self
    }
}

/// Outcome of [`AdaptiveHasher::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Validation {
    /// The password does not match the hash
    Mismatch,
    /// The password matches and the hash is strong enough
    Match,
    /// The password matches but the hash was stale; persist the new one
    Upgraded(Vec<u8>),
}

impl Validation {
    pub fn matched(&self) -> bool {
        !matches!(self, Validation::Mismatch)
    }

    pub fn upgraded_hash(&self) -> Option<&[u8]> {
        match self {
            Validation::Upgraded(hash) => Some(hash),
            _ => None,
        }
    }

    pub fn into_upgraded_hash(self) -> Option<Vec<u8>> {
        match self {
            Validation::Upgraded(hash) => Some(hash),
            _ => None,
        }
    }
}

/// Password hasher that keeps its cost factor above a duration floor.
pub struct AdaptiveHasher<P, C = MonotonicClock> {
    primitive: P,
    clock: C,
    min_duration_ms: u64,
    min_cost: u32,
    max_cost: u32,
    current_cost: AtomicU32,
    calibration: Calibration,
    observer: Option<Arc<dyn HashObserver>>,
}

impl<P: HashPrimitive> AdaptiveHasher<P> {
    /// Calibrate `primitive` against the wall clock over its full cost range.
    ///
    /// # Errors
    ///
    /// - `CostFloorError::MinDurationTooHigh` if no supported cost is slow enough
    /// - `CostFloorError::Primitive` if hashing the probe fails
    pub fn create(primitive: P, min_duration_ms: u64) -> Result<Self> {
        Self::with_config(primitive, MonotonicClock, HasherConfig::new(min_duration_ms))
    }
}

impl<P: HashPrimitive, C: TimeSource> AdaptiveHasher<P, C> {
    /// Calibrate `primitive` with an explicit clock and configuration.
    ///
    /// # Errors
    ///
    /// As [`AdaptiveHasher::create`], plus `CostFloorError::InvalidInput` if
    /// `config.cost_range` is empty or outside the primitive's range.
    pub fn with_config(primitive: P, clock: C, config: HasherConfig) -> Result<Self> {
        let supported = primitive.cost_range();
        let range = match config.cost_range {
            Some((lo, hi)) => checked_range(primitive.name(), lo, hi, supported)?,
            None => supported,
        };
        let (min_cost, max_cost) = (*range.start(), *range.end());
        if min_cost > max_cost {
            return Err(CostFloorError::InvalidInput(format!(
                "{} reports an empty cost range",
                primitive.name()
            )));
        }

        let calibration = Calibrator::new(&primitive, &clock, config.min_duration_ms)
            .with_probe(&config.probe)
            .with_strategy(config.strategy)
            .calibrate(min_cost, max_cost)?;
        tracing::debug!(
            primitive = primitive.name(),
            cost = calibration.cost,
            probes = calibration.samples.len(),
            min_duration_ms = config.min_duration_ms,
            "calibrated"
        );

        Ok(Self {
            primitive,
            clock,
            min_duration_ms: config.min_duration_ms,
            min_cost,
            max_cost,
            current_cost: AtomicU32::new(calibration.cost),
            calibration,
            observer: None,
        })
    }

    /// Register a hook that receives escalation and upgrade events.
    pub fn with_observer(mut self, observer: impl HashObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Cost factor the next hash will start at.
    ///
    /// May read one past the maximum once escalation has run out of range.
    pub fn current_cost(&self) -> u32 {
        self.current_cost.load(Ordering::Acquire)
    }

    pub fn min_duration_ms(&self) -> u64 {
        self.min_duration_ms
    }

    pub fn cost_range(&self) -> (u32, u32) {
        (self.min_cost, self.max_cost)
    }

    /// The calibration run that seeded the cost factor.
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Hash `password`, escalating the cost until hashing meets the floor.
    ///
    /// # Errors
    ///
    /// - `CostFloorError::MinDurationTooHigh` once escalation passes the
    ///   maximum cost; every later call fails the same way
    /// - `CostFloorError::Primitive` if the primitive fails
    pub fn hash(&self, password: &[u8]) -> Result<Vec<u8>> {
        self.hash_at_floor(password).map(|(hash, _)| hash)
    }

    /// Check `password` against a stored `hash`, upgrading stale hashes.
    ///
    /// A mismatch, including a hash the primitive cannot parse, is
    /// `Validation::Mismatch` and never escalates. A match whose cost is
    /// unreadable or below [`current_cost`](Self::current_cost) is rehashed.
    ///
    /// # Errors
    ///
    /// Only the rehash can fail; see [`hash`](Self::hash).
    pub fn validate(&self, password: &[u8], hash: &[u8]) -> Result<Validation> {
        let matched = match self.primitive.compare(hash, password) {
            Ok(matched) => matched,
            Err(err) => {
                tracing::trace!(error = %err, "compare failed, treating as mismatch");
                false
            }
        };
        if !matched {
            return Ok(Validation::Mismatch);
        }

        let previous = self.stored_cost(hash);
        if matches!(previous, Some(cost) if cost >= self.current_cost()) {
            return Ok(Validation::Match);
        }

        let (upgraded, cost) = self.hash_at_floor(password)?;
        tracing::debug!(
            primitive = self.primitive.name(),
            previous = ?previous,
            cost,
            "upgraded stale hash"
        );
        self.notify(HashEvent::Upgraded { previous, cost });
        Ok(Validation::Upgraded(upgraded))
    }

    /// Whether `hash` was made below the current cost, or its cost is unknown.
    pub fn needs_rehash(&self, hash: &[u8]) -> bool {
        match self.stored_cost(hash) {
            Some(cost) => cost < self.current_cost(),
            None => true,
        }
    }

    fn stored_cost(&self, hash: &[u8]) -> Option<u32> {
        match self.primitive.extract_cost(hash) {
            Ok(cost) => Some(cost),
            Err(err) => {
                tracing::debug!(error = %err, "cost of stored hash unknown");
                None
            }
        }
    }

    fn hash_at_floor(&self, password: &[u8]) -> Result<(Vec<u8>, u32)> {
        loop {
            let cost = self.current_cost();
            if cost > self.max_cost {
                return Err(self.too_high());
            }

            let (hash, elapsed_ms) = hash_and_time(&self.primitive, &self.clock, password, cost)?;
            if elapsed_ms >= self.min_duration_ms {
                return Ok((hash, cost));
            }

            let next = cost.checked_add(1).ok_or_else(|| self.too_high())?;
            let before = self.current_cost.fetch_max(next, Ordering::AcqRel);
            if before < next {
                tracing::debug!(
                    primitive = self.primitive.name(),
                    from = cost,
                    to = next,
                    elapsed_ms,
                    min_duration_ms = self.min_duration_ms,
                    "hash too fast, escalating cost"
                );
                self.notify(HashEvent::Escalated {
                    from: cost,
                    to: next,
                    elapsed_ms,
                });
            }
        }
    }

    fn too_high(&self) -> CostFloorError {
        CostFloorError::MinDurationTooHigh {
            min_duration_ms: self.min_duration_ms,
            max_cost: self.max_cost,
        }
    }

    fn notify(&self, event: HashEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }
}

impl<P: HashPrimitive, C> fmt::Debug for AdaptiveHasher<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveHasher")
            .field("primitive", &self.primitive.name())
            .field("min_duration_ms", &self.min_duration_ms)
            .field("min_cost", &self.min_cost)
            .field("max_cost", &self.max_cost)
            .field("current_cost", &self.current_cost.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

//! One-time search for the cheapest cost factor that meets the duration floor.
//!
//! The search hashes a fixed, non-secret probe at successive cost factors and
//! stops at the first one whose measured duration reaches the floor. The
//! linear scan is the reference behavior. [`SearchStrategy::Binary`] finds the
//! same answer in fewer probes, but only because hashing time is assumed to be
//! non-decreasing in cost; with a noisy clock the two can disagree.

use serde::{Deserialize, Serialize};

use crate::clock::{TimeSource, Timer};
use crate::error::{CostFloorError, Result};
use crate::primitive::HashPrimitive;

/// Probe used when the caller does not supply one.
pub const DEFAULT_PROBE: &[u8] = b"password";

/// Order in which calibration visits cost factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Ascending scan from the minimum cost
    #[default]
    Linear,
    /// Bisection over the cost range
    Binary,
}

/// One timed probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostSample {
    pub cost: u32,
    pub elapsed_ms: u64,
}

/// Result of a successful calibration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calibration {
    /// Cheapest cost factor that met the floor
    pub cost: u32,
    /// Every probe taken, in the order it was taken
    pub samples: Vec<CostSample>,
}

/// Find the first `cost` in `[lo, hi]` for which `predicate` holds.
///
/// Returns `Ok(None)` when the predicate is false across the whole range.
/// The first predicate error aborts the search.
pub fn find_minimal_cost<F>(
    lo: u32,
    hi: u32,
    strategy: SearchStrategy,
    mut predicate: F,
) -> Result<Option<u32>>
where
    F: FnMut(u32) -> Result<bool>,
{
    if lo > hi {
        return Ok(None);
    }

    match strategy {
        SearchStrategy::Linear => {
            for cost in lo..=hi {
                if predicate(cost)? {
                    return Ok(Some(cost));
                }
            }
            Ok(None)
        }
        SearchStrategy::Binary => {
            // Everything below `low` is false; `found` is the lowest true seen.
            let mut low = lo;
            let mut high = hi;
            let mut found = None;
            while low <= high {
                let mid = low + (high - low) / 2;
                if predicate(mid)? {
                    found = Some(mid);
                    if mid == low {
                        break;
                    }
                    high = mid - 1;
                } else {
                    if mid == high {
                        break;
                    }
                    low = mid + 1;
                }
            }
            Ok(found)
        }
    }
}

/// Hash `password` at `cost` and report how long it took.
pub(crate) fn hash_and_time<P, C>(
    primitive: &P,
    clock: &C,
    password: &[u8],
    cost: u32,
) -> Result<(Vec<u8>, u64)>
where
    P: HashPrimitive + ?Sized,
    C: TimeSource + ?Sized,
{
    let timer = clock.start();
    let hash = primitive.generate(password, cost)?;
    Ok((hash, timer.elapsed_millis()))
}

/// Runs the calibration search for one primitive and duration floor.
pub struct Calibrator<'a, P: ?Sized, C: ?Sized> {
    primitive: &'a P,
    clock: &'a C,
    min_duration_ms: u64,
    probe: &'a [u8],
    strategy: SearchStrategy,
}

impl<'a, P, C> Calibrator<'a, P, C>
where
    P: HashPrimitive + ?Sized,
    C: TimeSource + ?Sized,
{
    pub fn new(primitive: &'a P, clock: &'a C, min_duration_ms: u64) -> Self {
        Self {
            primitive,
            clock,
            min_duration_ms,
            probe: DEFAULT_PROBE,
            strategy: SearchStrategy::default(),
        }
    }

    pub fn with_probe(mut self, probe: &'a [u8]) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Search `[min_cost, max_cost]` for the cheapest cost meeting the floor.
    ///
    /// # Errors
    ///
    /// - `CostFloorError::MinDurationTooHigh` if even `max_cost` is too fast
    /// - `CostFloorError::Primitive` if hashing the probe fails
    pub fn calibrate(&self, min_cost: u32, max_cost: u32) -> Result<Calibration> {
        let mut samples = Vec::new();
        let found = find_minimal_cost(min_cost, max_cost, self.strategy, |cost| {
            let (_, elapsed_ms) = hash_and_time(self.primitive, self.clock, self.probe, cost)?;
            tracing::debug!(
                primitive = self.primitive.name(),
                cost,
                elapsed_ms,
                min_duration_ms = self.min_duration_ms,
                "calibration probe"
            );
            samples.push(CostSample { cost, elapsed_ms });
            Ok(elapsed_ms >= self.min_duration_ms)
        })?;

        match found {
            Some(cost) => Ok(Calibration { cost, samples }),
            None => Err(CostFloorError::MinDurationTooHigh {
                min_duration_ms: self.min_duration_ms,
                max_cost,
            }),
        }
    }
}

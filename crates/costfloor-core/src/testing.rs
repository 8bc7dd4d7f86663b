//! Deterministic stand-ins for the clock and the hash primitive.
//!
//! [`SyntheticPrimitive`] "takes" a configurable number of virtual
//! milliseconds per cost factor by advancing a shared [`SimulatedClock`], so
//! calibration and escalation can be tested without real hashing.
//! Its hashes are plain `cost$salt$password` strings and offer no security.

use std::collections::VecDeque;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::clock::{TimeSource, Timer};
use crate::error::{CostFloorError, Result};
use crate::primitive::{hash_str, HashPrimitive};

/// Virtual clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    now_ms: Arc<AtomicU64>,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, millis: u64) {
        self.now_ms.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Timer handle for [`SimulatedClock`].
#[derive(Debug, Clone)]
pub struct SimulatedTimer {
    now_ms: Arc<AtomicU64>,
    started_ms: u64,
}

impl Timer for SimulatedTimer {
    fn elapsed_millis(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst) - self.started_ms
    }
}

impl TimeSource for SimulatedClock {
    type Timer = SimulatedTimer;

    fn start(&self) -> SimulatedTimer {
        SimulatedTimer {
            now_ms: Arc::clone(&self.now_ms),
            started_ms: self.now_ms(),
        }
    }
}

type DurationFn = Box<dyn Fn(u32) -> u64 + Send + Sync>;

/// Hash primitive whose duration is a pure function of cost.
pub struct SyntheticPrimitive {
    clock: SimulatedClock,
    range: RangeInclusive<u32>,
    duration: DurationFn,
    faults: Mutex<VecDeque<u64>>,
    generated: Mutex<Vec<u32>>,
    failing: AtomicBool,
    salt: AtomicU64,
}

impl SyntheticPrimitive {
    pub fn new<F>(clock: SimulatedClock, range: RangeInclusive<u32>, duration: F) -> Self
    where
        F: Fn(u32) -> u64 + Send + Sync + 'static,
    {
        Self {
            clock,
            range,
            duration: Box::new(duration),
            faults: Mutex::new(VecDeque::new()),
            generated: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            salt: AtomicU64::new(0),
        }
    }

    /// Duration of `cost * ms_per_cost` milliseconds.
    pub fn linear(clock: SimulatedClock, range: RangeInclusive<u32>, ms_per_cost: u64) -> Self {
        Self::new(clock, range, move |cost| u64::from(cost) * ms_per_cost)
    }

    /// Make the next generates take these durations instead, in order.
    pub fn inject_durations<I: IntoIterator<Item = u64>>(&self, durations: I) {
        self.faults
            .lock()
            .expect("faults lock poisoned")
            .extend(durations);
    }

    /// While set, every generate fails with a primitive error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every cost factor passed to generate, in call order.
    pub fn generated_costs(&self) -> Vec<u32> {
        self.generated
            .lock()
            .expect("generated lock poisoned")
            .clone()
    }

    /// A hash at `cost` without taking any virtual time.
    pub fn forge(&self, password: &[u8], cost: u32) -> Vec<u8> {
        let salt = self.salt.fetch_add(1, Ordering::SeqCst);
        let mut hash = format!("{}${}$", cost, salt).into_bytes();
        hash.extend_from_slice(password);
        hash
    }

    fn split(hash: &[u8]) -> Result<(u32, &[u8])> {
        let malformed = || CostFloorError::Primitive("Malformed synthetic hash".to_string());
        let mut parts = hash.splitn(3, |b| *b == b'$');
        let cost = hash_str(parts.next().ok_or_else(malformed)?)?
            .parse()
            .map_err(|_| malformed())?;
        let _salt = parts.next().ok_or_else(malformed)?;
        let password = parts.next().ok_or_else(malformed)?;
        Ok((cost, password))
    }
}

impl HashPrimitive for SyntheticPrimitive {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn cost_range(&self) -> RangeInclusive<u32> {
        self.range.clone()
    }

    fn generate(&self, password: &[u8], cost: u32) -> Result<Vec<u8>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CostFloorError::Primitive("synthetic failure".to_string()));
        }
        if !self.range.contains(&cost) {
            return Err(CostFloorError::Primitive(format!(
                "cost {} outside {}..={}",
                cost,
                self.range.start(),
                self.range.end()
            )));
        }

        self.generated
            .lock()
            .expect("generated lock poisoned")
            .push(cost);
        let injected = self.faults.lock().expect("faults lock poisoned").pop_front();
        self.clock
            .advance(injected.unwrap_or_else(|| (self.duration)(cost)));
        Ok(self.forge(password, cost))
    }

    fn compare(&self, hash: &[u8], password: &[u8]) -> Result<bool> {
        let (_, stored) = Self::split(hash)?;
        Ok(stored == password)
    }

    fn extract_cost(&self, hash: &[u8]) -> Result<u32> {
        Self::split(hash).map(|(cost, _)| cost)
    }
}

use std::cell::Cell;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use costfloor_core::testing::{SimulatedClock, SyntheticPrimitive};
use costfloor_core::{
    AdaptiveHasher, CostFloorError, HashEvent, HashPrimitive, HasherConfig, Result, TimeSource,
    Timer,
};

thread_local! {
    static LOCAL_NOW_MS: Cell<u64> = const { Cell::new(0) };
}

/// Virtual clock private to each thread, so one thread's hashing never shows
/// up in another thread's measurement.
struct ThreadClock;

struct ThreadTimer(u64);

impl Timer for ThreadTimer {
    fn elapsed_millis(&self) -> u64 {
        LOCAL_NOW_MS.with(Cell::get) - self.0
    }
}

impl TimeSource for ThreadClock {
    type Timer = ThreadTimer;

    fn start(&self) -> ThreadTimer {
        ThreadTimer(LOCAL_NOW_MS.with(Cell::get))
    }
}

/// Takes `cost * 10` virtual ms, except that once armed the first `held`
/// hashes at `cost == 3` take no time and wait for each other first.
struct RendezvousPrimitive {
    armed: AtomicBool,
    held: AtomicUsize,
    gate: Barrier,
}

impl RendezvousPrimitive {
    fn new(threads: usize) -> Self {
        Self {
            armed: AtomicBool::new(false),
            held: AtomicUsize::new(threads),
            gate: Barrier::new(threads),
        }
    }

    fn take_slot(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
            && self
                .held
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
    }
}

impl HashPrimitive for RendezvousPrimitive {
    fn name(&self) -> &'static str {
        "rendezvous"
    }

    fn cost_range(&self) -> RangeInclusive<u32> {
        1..=20
    }

    fn generate(&self, password: &[u8], cost: u32) -> Result<Vec<u8>> {
        if cost == 3 && self.take_slot() {
            self.gate.wait();
        } else {
            LOCAL_NOW_MS.with(|now| now.set(now.get() + u64::from(cost) * 10));
        }
        let mut hash = format!("{}$", cost).into_bytes();
        hash.extend_from_slice(password);
        Ok(hash)
    }

    fn compare(&self, hash: &[u8], password: &[u8]) -> Result<bool> {
        Ok(hash.ends_with(password))
    }

    fn extract_cost(&self, hash: &[u8]) -> Result<u32> {
        std::str::from_utf8(hash)
            .ok()
            .and_then(|text| text.split('$').next())
            .and_then(|cost| cost.parse().ok())
            .ok_or_else(|| CostFloorError::Primitive("Malformed hash".to_string()))
    }
}

#[test]
fn simultaneous_fast_measurements_escalate_exactly_once() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let hasher = Arc::new(
        AdaptiveHasher::with_config(RendezvousPrimitive::new(2), ThreadClock, HasherConfig::new(25))
            .unwrap()
            .with_observer(move |event: &HashEvent| sink.lock().unwrap().push(event.clone())),
    );
    assert_eq!(hasher.current_cost(), 3);
    hasher.primitive().armed.store(true, Ordering::SeqCst);

    let handles: Vec<_> = (0..2)
        .map(|i| {
            let hasher = Arc::clone(&hasher);
            thread::spawn(move || {
                let password = format!("user-{}", i);
                hasher.hash(password.as_bytes()).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let hash = handle.join().expect("worker panicked");
        assert_eq!(hasher.primitive().extract_cost(&hash).unwrap(), 4);
    }

    // Both threads measured cost 3 as too fast; the cost moves to 4, no further.
    assert_eq!(hasher.current_cost(), 4);
    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![HashEvent::Escalated {
            from: 3,
            to: 4,
            elapsed_ms: 0
        }]
    );
}

#[test]
fn concurrent_hashing_never_lowers_cost() {
    let clock = SimulatedClock::new();
    let primitive = SyntheticPrimitive::linear(clock.clone(), 1..=40, 10);
    let hasher = Arc::new(
        AdaptiveHasher::with_config(primitive, clock, HasherConfig::new(25)).unwrap(),
    );
    hasher.primitive().inject_durations(std::iter::repeat(0).take(10));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let hasher = Arc::clone(&hasher);
            thread::spawn(move || {
                let password = format!("user-{}", i);
                let mut last = hasher.current_cost();
                for _ in 0..25 {
                    let hash = hasher.hash(password.as_bytes()).unwrap();
                    assert!(hasher.primitive().compare(&hash, password.as_bytes()).unwrap());
                    let now = hasher.current_cost();
                    assert!(now >= last, "cost dropped from {} to {}", last, now);
                    last = now;
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    // A fast measurement raises the cost by one at most. Other threads
    // advancing the shared virtual clock can mask a fault, so no lower bound
    // beyond calibration holds.
    let final_cost = hasher.current_cost();
    assert!(final_cost >= 3, "final cost {}", final_cost);
    assert!(final_cost <= 13, "final cost {}", final_cost);
}

#[test]
fn hasher_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AdaptiveHasher<SyntheticPrimitive, SimulatedClock>>();
    assert_send_sync::<AdaptiveHasher<costfloor_core::BcryptPrimitive>>();
}

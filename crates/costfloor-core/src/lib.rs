//! # costfloor core
//!
//! Password hashing that keeps up with hardware. An [`AdaptiveHasher`] picks
//! the cheapest cost factor whose hashing time meets a minimum duration,
//! raises that cost whenever a hash finishes too quickly, and replaces stale
//! hashes as passwords are verified.
//!
//! ## Architecture
//!
//! - **clock**: monotonic timers used to measure hashing
//! - **primitive**: the slow hash being tuned (bcrypt, Argon2id)
//! - **calibrate**: the one-time cost search
//! - **hasher**: the stateful hasher and the verify-and-upgrade protocol
//! - **observe**: caller hook for escalation and upgrade events
//!
//! ## Example
//!
//! ```no_run
//! use costfloor_core::{AdaptiveHasher, BcryptPrimitive, Validation};
//!
//! let hasher = AdaptiveHasher::create(BcryptPrimitive::new(), 250).unwrap();
//! let stored = hasher.hash(b"correct horse").unwrap();
//!
//! match hasher.validate(b"correct horse", &stored).unwrap() {
//!     Validation::Upgraded(replacement) => { /* persist `replacement` */ }
//!     Validation::Match => {}
//!     Validation::Mismatch => { /* reject login */ }
//! }
//! ```

pub mod calibrate;
pub mod clock;
pub mod error;
pub mod hasher;
pub mod observe;
pub mod primitive;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use calibrate::{find_minimal_cost, Calibration, Calibrator, CostSample, SearchStrategy};
pub use clock::{MonotonicClock, TimeSource, Timer};
pub use error::{CostFloorError, Result};
pub use hasher::{AdaptiveHasher, HasherConfig, Validation};
pub use observe::{HashEvent, HashObserver};
pub use primitive::{Argon2Primitive, BcryptPrimitive, HashPrimitive};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! The adaptive hash primitives the hasher drives.
//!
//! The adaptive hasher never looks inside a hash: it asks a [`HashPrimitive`]
//! to generate, compare, and report the cost factor of opaque byte strings.
//! Two primitives ship with the crate:
//!
//! - **bcrypt**: cost is the log2 round count (`$2b$NN$...`)
//! - **Argon2id**: cost is the iteration count (`t=` in the PHC string)

use std::ops::RangeInclusive;

use crate::error::Result;

mod argon;
mod bcrypt;

pub use self::argon::{
    Argon2Primitive, ARGON2_DEFAULT_MEMORY_KIB, ARGON2_DEFAULT_PARALLELISM, ARGON2_MAX_COST,
    ARGON2_MIN_COST,
};
pub use self::bcrypt::{BcryptPrimitive, BCRYPT_DEFAULT_MIN_COST, BCRYPT_FLOOR_COST, BCRYPT_MAX_COST};

/// An intentionally slow, salted password hash with a tunable cost factor.
///
/// Implementations must make hashing time non-decreasing in `cost`; the
/// calibration search relies on it.
pub trait HashPrimitive: Send + Sync {
    /// Short identifier used in logs and CLI output.
    fn name(&self) -> &'static str;

    /// Inclusive range of cost factors this primitive accepts.
    fn cost_range(&self) -> RangeInclusive<u32>;

    /// Hash `password` with a fresh salt at `cost`.
    fn generate(&self, password: &[u8], cost: u32) -> Result<Vec<u8>>;

    /// Check `password` against `hash`.
    ///
    /// Returns `Ok(false)` on a plain mismatch. Errors (such as a malformed
    /// hash) are treated as a mismatch by the hasher.
    fn compare(&self, hash: &[u8], password: &[u8]) -> Result<bool>;

    /// Read the cost factor embedded in `hash`.
    ///
    /// Fails when the hash is malformed or was produced with an encoding
    /// this primitive does not consider current.
    fn extract_cost(&self, hash: &[u8]) -> Result<u32>;
}

impl<P: HashPrimitive + ?Sized> HashPrimitive for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn cost_range(&self) -> RangeInclusive<u32> {
        (**self).cost_range()
    }

    fn generate(&self, password: &[u8], cost: u32) -> Result<Vec<u8>> {
        (**self).generate(password, cost)
    }

    fn compare(&self, hash: &[u8], password: &[u8]) -> Result<bool> {
        (**self).compare(hash, password)
    }

    fn extract_cost(&self, hash: &[u8]) -> Result<u32> {
        (**self).extract_cost(hash)
    }
}

impl<P: HashPrimitive + ?Sized> HashPrimitive for &P {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn cost_range(&self) -> RangeInclusive<u32> {
        (**self).cost_range()
    }

    fn generate(&self, password: &[u8], cost: u32) -> Result<Vec<u8>> {
        (**self).generate(password, cost)
    }

    fn compare(&self, hash: &[u8], password: &[u8]) -> Result<bool> {
        (**self).compare(hash, password)
    }

    fn extract_cost(&self, hash: &[u8]) -> Result<u32> {
        (**self).extract_cost(hash)
    }
}

/// Interpret a stored hash as UTF-8 text.
pub(crate) fn hash_str(hash: &[u8]) -> Result<&str> {
    std::str::from_utf8(hash).map_err(|e| {
        crate::error::CostFloorError::Primitive(format!("Hash is not valid UTF-8: {}", e))
    })
}

/// Validate a caller-supplied cost range against a primitive's limits.
pub(crate) fn checked_range(
    name: &str,
    min_cost: u32,
    max_cost: u32,
    limits: RangeInclusive<u32>,
) -> Result<RangeInclusive<u32>> {
    if min_cost > max_cost {
        return Err(crate::error::CostFloorError::InvalidInput(format!(
            "{} cost range is empty ({} > {})",
            name, min_cost, max_cost
        )));
    }
    if !limits.contains(&min_cost) || !limits.contains(&max_cost) {
        return Err(crate::error::CostFloorError::InvalidInput(format!(
            "{} cost range {}..={} is outside supported range {}..={}",
            name,
            min_cost,
            max_cost,
            limits.start(),
            limits.end()
        )));
    }
    Ok(min_cost..=max_cost)
}

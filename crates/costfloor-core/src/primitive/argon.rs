//! Argon2id, where the cost factor is the iteration count.
//!
//! Memory and parallelism are fixed per primitive instance. A stored hash
//! that was computed with different memory or lane settings does not carry a
//! comparable cost, so [`HashPrimitive::extract_cost`] rejects it and the
//! hasher regenerates it on the next successful validation. The same goes for
//! hashes in any Argon2 version other than 0x13.

use std::ops::RangeInclusive;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use super::{checked_range, hash_str, HashPrimitive};
use crate::error::{CostFloorError, Result};

/// Default memory cost in KiB (19 MiB, the OWASP minimum for Argon2id).
pub const ARGON2_DEFAULT_MEMORY_KIB: u32 = 19 * 1024;

/// Default number of lanes.
pub const ARGON2_DEFAULT_PARALLELISM: u32 = 1;

/// Lowest iteration count Argon2 accepts.
pub const ARGON2_MIN_COST: u32 = 1;

/// Highest iteration count the primitive will escalate to.
pub const ARGON2_MAX_COST: u32 = 64;

/// Argon2id hash primitive producing PHC strings.
#[derive(Debug, Clone)]
pub struct Argon2Primitive {
    memory_kib: u32,
    parallelism: u32,
    range: RangeInclusive<u32>,
}

impl Argon2Primitive {
    /// Argon2id with 19 MiB of memory and a single lane.
    pub fn new() -> Self {
        Self {
            memory_kib: ARGON2_DEFAULT_MEMORY_KIB,
            parallelism: ARGON2_DEFAULT_PARALLELISM,
            range: ARGON2_MIN_COST..=ARGON2_MAX_COST,
        }
    }

    /// Argon2id with custom memory and lane settings.
    ///
    /// # Errors
    ///
    /// Returns `CostFloorError::InvalidInput` if Argon2 rejects the
    /// combination (e.g. less than 8 KiB of memory per lane).
    pub fn with_memory(memory_kib: u32, parallelism: u32) -> Result<Self> {
        Params::new(memory_kib, ARGON2_MIN_COST, parallelism, None).map_err(|e| {
            CostFloorError::InvalidInput(format!("Invalid Argon2 parameters: {}", e))
        })?;
        Ok(Self {
            memory_kib,
            parallelism,
            range: ARGON2_MIN_COST..=ARGON2_MAX_COST,
        })
    }

    /// Restrict the iteration range the hasher may use.
    pub fn with_cost_range(mut self, min_cost: u32, max_cost: u32) -> Result<Self> {
        self.range = checked_range(
            "argon2",
            min_cost,
            max_cost,
            ARGON2_MIN_COST..=ARGON2_MAX_COST,
        )?;
        Ok(self)
    }

    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    fn hasher(&self, cost: u32) -> Result<Argon2<'static>> {
        let params = Params::new(self.memory_kib, cost, self.parallelism, None)?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Primitive {
    fn default() -> Self {
        Self::new()
    }
}

impl HashPrimitive for Argon2Primitive {
    fn name(&self) -> &'static str {
        "argon2"
    }

    fn cost_range(&self) -> RangeInclusive<u32> {
        self.range.clone()
    }

    fn generate(&self, password: &[u8], cost: u32) -> Result<Vec<u8>> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.hasher(cost)?.hash_password(password, &salt)?;
        Ok(hash.to_string().into_bytes())
    }

    fn compare(&self, hash: &[u8], password: &[u8]) -> Result<bool> {
        let parsed = PasswordHash::new(hash_str(hash)?)?;
        // Verification takes its parameters from the hash, not from `self`.
        match Argon2::default().verify_password(password, &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn extract_cost(&self, hash: &[u8]) -> Result<u32> {
        let parsed = PasswordHash::new(hash_str(hash)?)?;
        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return Err(CostFloorError::Primitive(format!(
                "Unsupported algorithm: {}",
                parsed.algorithm
            )));
        }
        if parsed.version != Some(Version::V0x13 as u32) {
            return Err(CostFloorError::Primitive(format!(
                "Unsupported Argon2 version: {:?}",
                parsed.version
            )));
        }

        let params = Params::try_from(&parsed)?;
        if params.m_cost() != self.memory_kib || params.p_cost() != self.parallelism {
            return Err(CostFloorError::Primitive(format!(
                "Hash uses m={},p={} but hasher is configured for m={},p={}",
                params.m_cost(),
                params.p_cost(),
                self.memory_kib,
                self.parallelism
            )));
        }
        Ok(params.t_cost())
    }
}

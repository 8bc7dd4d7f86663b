//! bcrypt, where the cost factor is the log2 of the key-expansion rounds.

use std::ops::RangeInclusive;

use super::{checked_range, hash_str, HashPrimitive};
use crate::error::{CostFloorError, Result};

/// Lowest cost the bcrypt algorithm accepts.
pub const BCRYPT_FLOOR_COST: u32 = 4;

/// Where calibration starts by default.
///
/// Costs below this are too cheap to be worth probing on any hardware a
/// password store runs on.
pub const BCRYPT_DEFAULT_MIN_COST: u32 = 10;

/// Highest cost the bcrypt algorithm accepts.
pub const BCRYPT_MAX_COST: u32 = 31;

/// Length of the salt + digest section after the cost field.
const SALT_AND_DIGEST_LEN: usize = 53;

/// bcrypt hash primitive producing `$2b$` modular-crypt strings.
#[derive(Debug, Clone)]
pub struct BcryptPrimitive {
    range: RangeInclusive<u32>,
}

impl BcryptPrimitive {
    /// bcrypt over `[10, 31]`.
    pub fn new() -> Self {
        Self {
            range: BCRYPT_DEFAULT_MIN_COST..=BCRYPT_MAX_COST,
        }
    }

    /// bcrypt over a custom range within `[4, 31]`.
    pub fn with_cost_range(min_cost: u32, max_cost: u32) -> Result<Self> {
        let range = checked_range(
            "bcrypt",
            min_cost,
            max_cost,
            BCRYPT_FLOOR_COST..=BCRYPT_MAX_COST,
        )?;
        Ok(Self { range })
    }
}

impl Default for BcryptPrimitive {
    fn default() -> Self {
        Self::new()
    }
}

impl HashPrimitive for BcryptPrimitive {
    fn name(&self) -> &'static str {
        "bcrypt"
    }

    fn cost_range(&self) -> RangeInclusive<u32> {
        self.range.clone()
    }

    fn generate(&self, password: &[u8], cost: u32) -> Result<Vec<u8>> {
        let hash = bcrypt::hash(password, cost)?;
        Ok(hash.into_bytes())
    }

    fn compare(&self, hash: &[u8], password: &[u8]) -> Result<bool> {
        Ok(bcrypt::verify(password, hash_str(hash)?)?)
    }

    fn extract_cost(&self, hash: &[u8]) -> Result<u32> {
        parse_cost(hash_str(hash)?)
    }
}

/// Parse the cost out of a `$2x$NN$<salt+digest>` string.
fn parse_cost(hash: &str) -> Result<u32> {
    let malformed = || CostFloorError::Primitive(format!("Malformed bcrypt hash: {:?}", hash));

    let mut parts = hash.split('$');
    if parts.next() != Some("") {
        return Err(malformed());
    }
    match parts.next() {
        Some("2a" | "2b" | "2x" | "2y") => {}
        _ => return Err(malformed()),
    }
    let cost_field = parts.next().ok_or_else(malformed)?;
    let rest = parts.next().ok_or_else(malformed)?;
    if parts.next().is_some() || rest.len() != SALT_AND_DIGEST_LEN || cost_field.len() != 2 {
        return Err(malformed());
    }

    let cost: u32 = cost_field.parse().map_err(|_| malformed())?;
    if !(BCRYPT_FLOOR_COST..=BCRYPT_MAX_COST).contains(&cost) {
        return Err(malformed());
    }
    Ok(cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> BcryptPrimitive {
        BcryptPrimitive::with_cost_range(BCRYPT_FLOOR_COST, 6).unwrap()
    }

    #[test]
    fn test_generate_embeds_cost() {
        let primitive = fast();
        let hash = primitive.generate(b"hunter2", 5).unwrap();
        assert!(hash.starts_with(b"$2b$05$"));
        assert_eq!(primitive.extract_cost(&hash).unwrap(), 5);
    }

    #[test]
    fn test_compare_match_and_mismatch() {
        let primitive = fast();
        let hash = primitive.generate(b"correct horse", 4).unwrap();
        assert!(primitive.compare(&hash, b"correct horse").unwrap());
        assert!(!primitive.compare(&hash, b"battery staple").unwrap());
    }

    #[test]
    fn test_compare_malformed_hash_errors() {
        let primitive = fast();
        assert!(primitive.compare(b"not-a-hash", b"password").is_err());
    }

    #[test]
    fn test_generate_rejects_cost_below_floor() {
        let result = fast().generate(b"password", 3);
        assert!(matches!(result, Err(CostFloorError::Primitive(_))));
    }

    #[test]
    fn test_parse_cost_accepts_variants() {
        let tail = "R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";
        assert_eq!(parse_cost(&format!("$2a$12${}", tail)).unwrap(), 12);
        assert_eq!(parse_cost(&format!("$2y$04${}", tail)).unwrap(), 4);
    }

    #[test]
    fn test_parse_cost_rejects_malformed() {
        let tail = "R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";
        assert!(parse_cost("").is_err());
        assert!(parse_cost(&format!("$3a$12${}", tail)).is_err());
        assert!(parse_cost(&format!("$2b$1x${}", tail)).is_err());
        assert!(parse_cost(&format!("$2b$99${}", tail)).is_err());
        assert!(parse_cost("$2b$12$tooshort").is_err());
        assert!(parse_cost(&format!("2b$12${}", tail)).is_err());
    }

    #[test]
    fn test_cost_range_validation() {
        assert!(BcryptPrimitive::with_cost_range(3, 10).is_err());
        assert!(BcryptPrimitive::with_cost_range(4, 32).is_err());
        assert_eq!(
            BcryptPrimitive::with_cost_range(4, 31).unwrap().cost_range(),
            4..=31
        );
    }
}

//! Resolve configuration and build the hasher the commands run against.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use costfloor_core::primitive::{
    ARGON2_MAX_COST, ARGON2_MIN_COST, BCRYPT_DEFAULT_MIN_COST, BCRYPT_FLOOR_COST,
    BCRYPT_MAX_COST,
};
use costfloor_core::{
    AdaptiveHasher, Argon2Primitive, BcryptPrimitive, HashEvent, HashPrimitive, HasherConfig,
};

use crate::cli::{Cli, PolicyArgs};
use crate::config::{default_config_path, read_config, Algorithm, CostFloorConfig, PolicySection};
use crate::errors::{classify, CliError};

/// Hasher over whichever primitive the configuration selected.
pub type DynHasher = AdaptiveHasher<Box<dyn HashPrimitive>>;

/// Events the hasher reported during this invocation.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<HashEvent>>>);

impl EventLog {
    fn record(&self, event: &HashEvent) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }

    pub fn events(&self) -> Vec<HashEvent> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.config.as_deref() {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    default_config_path()
}

/// Load the config file, or defaults if none exists.
pub fn load_config(cli: &Cli) -> anyhow::Result<CostFloorConfig> {
    let path = resolve_config_path(cli)?;
    if path.exists() {
        return read_config(&path);
    }
    tracing::debug!(path = %path.display(), "no config file, using defaults");
    Ok(CostFloorConfig::default())
}

/// Apply command-line overrides on top of the file's policy section.
pub fn effective_policy(base: &PolicySection, args: &PolicyArgs) -> PolicySection {
    PolicySection {
        min_duration_ms: args.min_ms.unwrap_or(base.min_duration_ms),
        algorithm: args.algorithm.unwrap_or(base.algorithm),
        strategy: args.strategy.map(Into::into).unwrap_or(base.strategy),
        min_cost: args.min_cost.or(base.min_cost),
        max_cost: args.max_cost.or(base.max_cost),
    }
}

/// Cost range `(min, max)` the hasher should search for `policy`.
pub fn cost_bounds(policy: &PolicySection) -> (u32, u32) {
    let (default_min, default_max) = match policy.algorithm {
        Algorithm::Bcrypt => (BCRYPT_DEFAULT_MIN_COST, BCRYPT_MAX_COST),
        Algorithm::Argon2 => (ARGON2_MIN_COST, ARGON2_MAX_COST),
    };
    (
        policy.min_cost.unwrap_or(default_min),
        policy.max_cost.unwrap_or(default_max),
    )
}

fn build_primitive(
    config: &CostFloorConfig,
    policy: &PolicySection,
) -> anyhow::Result<Box<dyn HashPrimitive>> {
    let primitive: Box<dyn HashPrimitive> = match policy.algorithm {
        // Open up bcrypt's full range; the hasher config narrows it.
        Algorithm::Bcrypt => Box::new(
            BcryptPrimitive::with_cost_range(BCRYPT_FLOOR_COST, BCRYPT_MAX_COST)
                .map_err(classify)?,
        ),
        Algorithm::Argon2 => Box::new(
            Argon2Primitive::with_memory(config.argon2.memory_kib, config.argon2.parallelism)
                .map_err(classify)?,
        ),
    };
    Ok(primitive)
}

/// Calibrate a hasher for `args` and attach an event log to it.
pub fn build_hasher(cli: &Cli, args: &PolicyArgs) -> anyhow::Result<(DynHasher, EventLog)> {
    let config = load_config(cli)?;
    let policy = effective_policy(&config.policy, args);
    let (min_cost, max_cost) = cost_bounds(&policy);
    if min_cost > max_cost {
        return Err(CliError::invalid_input(format!(
            "min_cost {} is greater than max_cost {}",
            min_cost, max_cost
        ))
        .into());
    }

    let primitive = build_primitive(&config, &policy)?;
    let hasher_config = HasherConfig::new(policy.min_duration_ms)
        .with_strategy(policy.strategy)
        .with_cost_range(min_cost, max_cost);

    tracing::debug!(
        algorithm = policy.algorithm.as_str(),
        min_duration_ms = policy.min_duration_ms,
        min_cost,
        max_cost,
        "calibrating"
    );
    let log = EventLog::default();
    let sink = log.clone();
    let hasher = AdaptiveHasher::with_config(primitive, costfloor_core::MonotonicClock, hasher_config)
        .map_err(classify)?
        .with_observer(move |event: &HashEvent| sink.record(event));
    Ok((hasher, log))
}

/// Render a hash for display; hashes from the shipped primitives are ASCII.
pub fn hash_to_string(hash: Vec<u8>) -> anyhow::Result<String> {
    String::from_utf8(hash).map_err(|e| anyhow::anyhow!("Hash is not valid UTF-8: {}", e))
}

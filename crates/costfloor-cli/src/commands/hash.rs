use costfloor_core::HashPrimitive;

use crate::app::{build_hasher, hash_to_string};
use crate::cli::{Cli, PolicyArgs};
use crate::errors::classify;
use crate::output::{print_json, OutputMode};
use crate::password::read_password;

pub fn handle_hash(cli: &Cli, policy: &PolicyArgs) -> anyhow::Result<()> {
    let mode = OutputMode::detect(cli.json);
    let password = read_password(true)?;
    let (hasher, log) = build_hasher(cli, policy)?;

    let hash = hasher.hash(password.as_bytes()).map_err(classify)?;
    let hash = hash_to_string(hash)?;

    if mode.is_json() {
        return print_json(&serde_json::json!({
            "algorithm": hasher.primitive().name(),
            "cost": hasher.current_cost(),
            "hash": hash,
            "events": log.events(),
        }));
    }

    println!("{}", hash);
    Ok(())
}

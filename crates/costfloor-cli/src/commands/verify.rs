use crate::app::{build_hasher, hash_to_string};
use crate::cli::{Cli, PolicyArgs};
use crate::errors::{classify, CliError};
use crate::output::{badge, print_json, OutputMode, Status};
use crate::password::read_password;

pub fn handle_verify(cli: &Cli, stored: &str, policy: &PolicyArgs) -> anyhow::Result<()> {
    let mode = OutputMode::detect(cli.json);
    let password = read_password(false)?;
    let (hasher, log) = build_hasher(cli, policy)?;

    let outcome = hasher
        .validate(password.as_bytes(), stored.trim().as_bytes())
        .map_err(classify)?;
    let matched = outcome.matched();
    let upgraded = outcome.into_upgraded_hash().map(hash_to_string).transpose()?;

    if mode.is_json() {
        print_json(&serde_json::json!({
            "matched": matched,
            "upgraded_hash": upgraded,
            "current_cost": hasher.current_cost(),
            "events": log.events(),
        }))?;
    } else if !matched {
        if !cli.quiet {
            println!("{}", badge(mode, Status::Err, "mismatch"));
        }
    } else if let Some(hash) = &upgraded {
        if !cli.quiet {
            println!(
                "{}",
                badge(
                    mode,
                    Status::Warn,
                    &format!(
                        "match, rehashed at cost {}; store the new hash",
                        hasher.current_cost()
                    )
                )
            );
        }
        println!("{}", hash);
    } else if !cli.quiet {
        println!("{}", badge(mode, Status::Ok, "match"));
    }

    if !matched {
        return Err(CliError::Mismatch.into());
    }
    Ok(())
}


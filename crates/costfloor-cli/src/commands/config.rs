use crate::app::{cost_bounds, load_config, resolve_config_path};
use crate::cli::Cli;
use crate::config::{write_config, CostFloorConfig};
use crate::errors::CliError;
use crate::output::{badge, print_json, OutputMode, Status};

pub fn handle_config_show(cli: &Cli) -> anyhow::Result<()> {
    let mode = OutputMode::detect(cli.json);
    let path = resolve_config_path(cli)?;
    let config = load_config(cli)?;
    let (min_cost, max_cost) = cost_bounds(&config.policy);

    if mode.is_json() {
        return print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "policy": config.policy,
            "argon2": config.argon2,
            "cost_range": [min_cost, max_cost],
        }));
    }

    if !cli.quiet {
        let source = if path.exists() { "" } else { " (not found, defaults)" };
        println!("# {}{}", path.display(), source);
    }
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

pub fn handle_config_init(cli: &Cli, force: bool) -> anyhow::Result<()> {
    let mode = OutputMode::detect(cli.json);
    let path = resolve_config_path(cli)?;
    if path.exists() && !force {
        return Err(CliError::invalid_input(format!(
            "Config already exists: {} (use --force to replace it)",
            path.display()
        ))
        .into());
    }

    write_config(&path, &CostFloorConfig::default())?;

    if mode.is_json() {
        return print_json(&serde_json::json!({ "path": path.display().to_string() }));
    }
    if !cli.quiet {
        println!(
            "{}",
            badge(mode, Status::Ok, &format!("Wrote {}", path.display()))
        );
    }
    Ok(())
}

use costfloor_core::HashPrimitive;

use crate::app::build_hasher;
use crate::cli::{Cli, PolicyArgs};
use crate::output::{badge, print_json, OutputMode, Status};

pub fn handle_calibrate(cli: &Cli, policy: &PolicyArgs) -> anyhow::Result<()> {
    let mode = OutputMode::detect(cli.json);
    let (hasher, _) = build_hasher(cli, policy)?;
    let calibration = hasher.calibration();
    let (min_cost, max_cost) = hasher.cost_range();

    if mode.is_json() {
        return print_json(&serde_json::json!({
            "algorithm": hasher.primitive().name(),
            "min_duration_ms": hasher.min_duration_ms(),
            "min_cost": min_cost,
            "max_cost": max_cost,
            "cost": calibration.cost,
            "samples": calibration.samples,
        }));
    }

    if !cli.quiet {
        println!("COST | ELAPSED_MS");
        for sample in &calibration.samples {
            println!("{} | {}", sample.cost, sample.elapsed_ms);
        }
    }
    println!(
        "{}",
        badge(
            mode,
            Status::Ok,
            &format!(
                "{} cost {} meets {}ms (searched {}..={})",
                hasher.primitive().name(),
                calibration.cost,
                hasher.min_duration_ms(),
                min_cost,
                max_cost
            )
        )
    );
    Ok(())
}

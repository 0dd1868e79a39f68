use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use sidewinder::{
    scenario::ScenarioLoader,
    sim::{SimSettings, Simulation},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "sidewinder streaming demo runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/hillside_run.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override snapshot interval in ticks (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let ticks = scenario.ticks(cli.ticks);

    let settings = SimSettings {
        scenario_name: scenario.name.clone(),
        seed: cli.seed.unwrap_or(scenario.seed),
        snapshot_interval_ticks: cli
            .snapshot_interval
            .unwrap_or(scenario.snapshot_interval_ticks),
        snapshot_dir: cli
            .snapshot_dir
            .unwrap_or_else(|| PathBuf::from("snapshots")),
    };

    let mut sim = Simulation::from_scenario(&scenario, settings)?;
    sim.run(ticks)?;

    println!(
        "Scenario '{}' completed after {} ticks. Player reached x = {:.1}, {} coins collected.",
        sim.scenario_name(),
        ticks,
        sim.world().player.position.x,
        sim.world().coins_collected()
    );
    for stats in sim.manager().stats() {
        println!(
            "  {}: {} active, {} idle, {} created, frontier at {:.1}",
            stats.name, stats.active, stats.idle, stats.created, stats.frontier_x
        );
    }
    Ok(())
}

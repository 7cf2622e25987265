//! Simulate Binary
//!
//! Runs one game model on the periodic driver until it stops, then prints the
//! trajectory and its equilibrium analysis.
//!
//! Options: --model, --file, --seed, --cadence, --rounds, --list

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use stratagem::driver::*;
use stratagem::*;

#[derive(Parser)]
#[command(author, version, about = "Simulate repeated play of a strategic game", long_about = None)]
struct Args {
    #[arg(long, short, help = "Built-in model id", conflicts_with = "file")]
    model: Option<String>,
    #[arg(long, short, help = "Game model JSON file")]
    file: Option<PathBuf>,
    #[arg(long, short, help = "Seed for reproducible runs")]
    seed: Option<u64>,
    #[arg(long, short, value_parser = cadence, help = "Tick cadence, e.g. 250ms")]
    cadence: Option<Duration>,
    #[arg(long, short, help = "Round cap overriding the model's maximum")]
    rounds: Option<usize>,
    #[arg(long, help = "List built-in models and exit")]
    list: bool,
}

impl Args {
    fn settings(self) -> anyhow::Result<Settings> {
        let mut settings = Settings::from_env()?;
        if let Some(model) = self.model {
            settings.model = model;
        }
        if let Some(cadence) = self.cadence {
            settings.cadence = cadence;
        }
        settings.file = self.file.or(settings.file);
        settings.seed = self.seed.or(settings.seed);
        settings.rounds = self.rounds.or(settings.rounds);
        Ok(settings)
    }
}

fn cadence(s: &str) -> Result<Duration, String> {
    parse_duration(s).ok_or_else(|| format!("invalid duration {}", s))
}

fn label(equilibrium: EquilibriumType) -> colored::ColoredString {
    match equilibrium {
        EquilibriumType::DominantStrategy | EquilibriumType::Nash | EquilibriumType::Stackelberg => {
            equilibrium.label().green()
        }
        EquilibriumType::Unknown => equilibrium.label().red(),
        _ => equilibrium.label().yellow(),
    }
}

fn table(model: &GameModel, results: &[SimulationResult]) {
    let header = model
        .players()
        .iter()
        .map(|p| format!("{:>16}", p.id))
        .collect::<String>();
    println!("{:>6}{}", "step".bold(), header.bold());
    for record in results {
        let row = model
            .players()
            .iter()
            .map(|p| {
                let choice = record.player_choices.get(&p.id).map_or("-", String::as_str);
                match record.payoff(&p.id) {
                    Some(payoff) => format!("{:>16}", format!("{} {:+.1}", choice, payoff)),
                    None => format!("{:>16}", choice),
                }
            })
            .collect::<String>();
        println!("{:>6}{}", record.step, row);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log();
    let args = Args::parse();
    if args.list {
        for model in catalog::all() {
            println!("{:<20} {:<24} {}", model.id(), model.name(), model.kind());
        }
        return Ok(());
    }
    let settings = args.settings()?;
    let simulation = settings.simulation()?;
    log::info!(
        "simulating {} ({}) every {:?}",
        simulation.model().name(),
        simulation.model().kind(),
        settings.cadence
    );
    let mut handle = Driver::spawn(simulation, settings.cadence);
    handle.start()?;
    let interrupted = tokio::select! {
        stopped = handle.until(Phase::Stopped) => {
            stopped?;
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        log::warn!("interrupt received, stopping simulation");
        handle.stop()?;
    }
    let simulation = handle.shutdown().await?;
    let analysis = simulation.analyze();
    table(simulation.model(), simulation.results());
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    println!("equilibrium: {}", label(analysis.equilibrium_type));
    Ok(())
}

use anyhow::{Context, Result};
use c4life_core::config::AppConfig;
use c4life_core::grid::Seed;
use c4life_core::{init_logging, OrbitIndex};
use c4life_io::{OrbitTableFile, RuleArchive};
use c4life_lib::app::{run_simulation, RuleExplorer};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Seed for grids and random rules (overrides the config)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Precomputed orbit table to load instead of building one
    #[arg(long, global = true)]
    orbit_table: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one rule and print a summary
    Run {
        /// 35-character rule hex (overrides the config)
        #[arg(long)]
        rule: Option<String>,

        #[arg(long, default_value_t = 500)]
        steps: usize,

        /// Print the grid after the final step
        #[arg(long)]
        show: bool,
    },
    /// Write the orbit table as JSON
    Orbits {
        #[arg(long, default_value = "orbits.json")]
        out: String,
    },
    /// Search rule space for interesting rules
    Search {
        /// Number of random candidates (overrides the config)
        #[arg(long)]
        candidates: Option<usize>,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn load_index(path: Option<&str>) -> Result<OrbitIndex> {
    match path {
        Some(path) => {
            let table = OrbitTableFile::load(path)?;
            Ok(table.into_index()?)
        }
        None => Ok(OrbitIndex::build()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging("info");

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("loading config {}", args.config))?;
    let seed = args
        .seed
        .or(config.world.seed)
        .map(Seed)
        .unwrap_or_else(Seed::random);
    let index = load_index(args.orbit_table.as_deref())?;

    match args.command {
        Command::Run { rule, steps, show } => {
            if rule.is_some() {
                config.rule.hex = rule;
            }
            config.validate()?;

            let mut last_grid = None;
            let report = run_simulation(&config, &index, steps, seed, |sim| {
                if show {
                    last_grid = Some(sim.grid().to_ascii());
                }
            })?;
            if let Some(grid) = last_grid {
                println!("{grid}");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Orbits { out } => {
            OrbitTableFile::from_index(&index).save(&out)?;
            println!("Wrote {} orbits to {}", index.orbits().len(), out);
        }
        Command::Search { candidates } => {
            if let Some(n) = candidates {
                config.search.candidates = n;
            }
            config.validate()?;

            let explorer = RuleExplorer::new(&config, &index);
            let outcome = explorer.search(seed)?;
            let mut archive =
                RuleArchive::load(&config.search.archive_path, config.search.archive_capacity)?;
            let kept = explorer.archive(&outcome, &mut archive);
            archive.save(&config.search.archive_path)?;

            println!(
                "Best rule {} scored {:.4} ({} refinements improved it)",
                outcome.best.rule, outcome.best.score, outcome.improvements
            );
            println!(
                "Archive {} holds {} rules ({} new)",
                config.search.archive_path,
                archive.len(),
                kept
            );
        }
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

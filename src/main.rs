use anyhow::Result;
use clap::Parser;
use ecosim_core::{init_logging, RenderSink};
use ecosim_lib::{load_population, AsciiGrid, Runner, SimConfig, TerminationStrategy};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run config (TOML). Defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra population file with one `Species count` pair per line
    #[arg(short, long)]
    population: Option<PathBuf>,

    /// Seed for the random source, overriding the config
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop once simulated time passes this
    #[arg(long)]
    max_time: Option<f64>,

    /// When to stop
    #[arg(long, value_enum)]
    termination: Option<Termination>,

    /// Print an ASCII frame at every census
    #[arg(long)]
    render: bool,

    /// Frame width in characters
    #[arg(long, default_value_t = 80)]
    width: usize,

    /// Frame height in characters
    #[arg(long, default_value_t = 40)]
    height: usize,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Termination {
    HalfExtinct,
    OneSpeciesLeft,
    Exhausted,
}

impl From<Termination> for TerminationStrategy {
    fn from(value: Termination) -> Self {
        match value {
            Termination::HalfExtinct => Self::RunTillHalfExtinct,
            Termination::OneSpeciesLeft => Self::RunTillOneSpeciesLeft,
            Termination::Exhausted => Self::RunTillEventsExhausted,
        }
    }
}

fn main() -> Result<()> {
    init_logging("info");
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.kernel.seed = Some(seed);
    }
    if let Some(max_time) = args.max_time {
        config.run.max_time = max_time;
    }
    if let Some(termination) = args.termination {
        config.run.termination = termination.into();
    }

    let extra = match &args.population {
        Some(path) => load_population(path)?,
        None => Vec::new(),
    };
    anyhow::ensure!(
        !config.population.is_empty() || !extra.is_empty(),
        "No population given; add [[population]] entries to the config or pass --population"
    );

    tracing::info!(
        fingerprint = %config.kernel.fingerprint(),
        seed = ?config.kernel.seed,
        "Configuration loaded"
    );
    let mut runner = Runner::from_config(&config, &extra)?;

    let mut grid = AsciiGrid::new(args.width, args.height).echoing();
    let sink: Option<&mut dyn RenderSink> = if args.render { Some(&mut grid) } else { None };
    let summary = runner.run(sink);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Simulation complete at time {:.2} ({})",
            summary.end_time, summary.reason
        );
        print!("{}", summary.census);
    }
    Ok(())
}

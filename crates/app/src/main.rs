mod terminal;

use std::{
    fs::File,
    io::{self, BufRead, BufWriter},
    path::PathBuf,
    thread,
};

use clap::{Args, Parser, Subcommand};
use sorting_visualiser_core::{
    Algorithm, AppConfig, Clock, ControlHandle, Fanout, JsonLinesRecorder, ManualClock, Result,
    SortController, SortVizError, Speed, SystemClock,
};
use tracing_subscriber::EnvFilter;

use crate::terminal::TerminalPresenter;

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_sort(args),
        Commands::List => {
            list_algorithms();
            Ok(())
        }
        Commands::Config { config } => print_config(config),
    }
}

fn run_sort(args: RunArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    tracing::info!(algorithm = %args.algorithm, instant = args.instant, "preparing run");

    let clock: Box<dyn Clock> = if args.instant {
        Box::new(ManualClock::new())
    } else {
        Box::new(SystemClock::new())
    };

    let mut presenters = Fanout::new();
    if !args.json {
        presenters.push(Box::new(TerminalPresenter::stdout()));
    }
    if let Some(path) = &args.trace {
        tracing::info!(?path, "recording events");
        let file = BufWriter::new(File::create(path)?);
        presenters.push(Box::new(JsonLinesRecorder::new(file)));
    }

    let mut controller = SortController::new(&config, clock, Box::new(presenters));
    if let Some(speed) = args.speed {
        controller.set_speed(Speed::new(i64::from(speed)))?;
    }
    controller.set_algorithm(args.algorithm)?;

    match &args.values {
        Some(values) => controller.load_str(values)?,
        None => controller.load_random(&mut rand::thread_rng())?,
    }

    if args.interactive {
        spawn_input_loop(controller.handle());
    }

    let report = controller.start()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!("{}", report.algorithm.info().name);
        println!("result: {}", report.values);
        println!("{}", report.stats);
    }
    Ok(())
}

fn list_algorithms() {
    for algorithm in Algorithm::ALL {
        let info = algorithm.info();
        println!(
            "{:<10} {:<15} time {:<11} space {:<9} {}",
            algorithm.key(),
            info.name,
            info.time_complexity,
            info.space_complexity,
            info.description
        );
    }
}

fn print_config(path: Option<PathBuf>) -> Result<()> {
    let config = load_config(path.as_ref())?;
    println!("{}", config.to_json_pretty()?);
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            AppConfig::from_json_file(path)
        }
        None => Ok(AppConfig::default()),
    }
}

/// Reads control commands from stdin while the sort runs on the main
/// thread.
fn spawn_input_loop(handle: ControlHandle) {
    eprintln!("commands: p (pause/resume), s <1-100> (speed), a <algorithm> (next run), c (cancel)");
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if let Err(err) = apply_command(&handle, line.trim()) {
                tracing::warn!(%err, command = line.trim(), "ignored command");
            }
        }
    });
}

fn apply_command(handle: &ControlHandle, command: &str) -> Result<()> {
    let (verb, rest) = command
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((command, ""));

    match verb {
        "" => Ok(()),
        "p" | "pause" => {
            let state = handle.toggle_pause()?;
            tracing::info!(%state, "pause toggled");
            Ok(())
        }
        "s" | "speed" => {
            let speed: i64 = rest
                .parse()
                .map_err(|_| SortVizError::InvalidInput(format!("`{rest}` is not a speed")))?;
            handle.set_speed(Speed::new(speed))
        }
        "a" | "algorithm" => handle.select_algorithm(rest.parse()?),
        "c" | "cancel" => handle.cancel(),
        other => Err(SortVizError::InvalidInput(format!("unknown command `{other}`"))),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Step-by-step sorting algorithm visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sort a sequence while animating every step in the terminal.
    Run(RunArgs),
    /// List the available algorithms.
    List,
    /// Print the effective configuration as JSON.
    Config {
        /// Optional JSON configuration file to merge over the defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Algorithm to run: bubble, selection, insertion, merge or quick.
    #[arg(short, long, default_value = "bubble")]
    algorithm: Algorithm,
    /// Comma separated values in 1..=100, at most 20. Random when omitted.
    #[arg(short, long)]
    values: Option<String>,
    /// Animation speed, 1 (slowest) to 100 (fastest).
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    speed: Option<u8>,
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Skip real waiting and use virtual time.
    #[arg(long)]
    instant: bool,
    /// Write every visual event as JSON lines to this file.
    #[arg(long)]
    trace: Option<PathBuf>,
    /// Accept pause, speed, algorithm and cancel commands on stdin.
    #[arg(short, long)]
    interactive: bool,
    /// Print the run report as JSON instead of drawing bars.
    #[arg(long)]
    json: bool,
}

//! Headless recorder: seeds a board, runs it until it halts and exports the
//! captured frames.
//!
//! Usage: record [config.yaml] [--pattern NAME] [--max-generations N]

use std::path::PathBuf;
use std::process::ExitCode;

use life_recorder::{
    application::{ConfigOptions, RunOutcome, Simulation, SimulationConfig},
    domain::presets,
    export::FfmpegEncoder,
    rendering::NullRenderer,
};

#[derive(Default)]
struct Args {
    config: Option<PathBuf>,
    pattern: Option<String>,
    max_generations: Option<u64>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--pattern" => {
                args.pattern = Some(iter.next().ok_or("--pattern needs a name")?);
            }
            "--max-generations" => {
                let value = iter.next().ok_or("--max-generations needs a number")?;
                let n = value
                    .parse()
                    .map_err(|_| format!("invalid generation count {:?}", value))?;
                args.max_generations = Some(n);
            }
            _ if args.config.is_none() && !arg.starts_with("--") => {
                args.config = Some(PathBuf::from(arg));
            }
            _ => return Err(format!("unexpected argument {:?}", arg)),
        }
    }
    Ok(args)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("usage: record [config.yaml] [--pattern NAME] [--max-generations N]");
            return ExitCode::FAILURE;
        }
    };

    let options = match &args.config {
        Some(path) => ConfigOptions::load(path).unwrap_or_else(|e| {
            log::error!("{}; using default configuration", e);
            ConfigOptions::default()
        }),
        None => ConfigOptions::default(),
    };
    let config = SimulationConfig::from_options(options);

    let mut sim = match Simulation::new(config, NullRenderer, Box::new(FfmpegEncoder::new())) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Failed to prepare frame export: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.pattern.as_deref() {
        Some(name) => {
            let Some(pattern) = presets::by_name(name) else {
                log::error!("Unknown pattern {:?}", name);
                return ExitCode::FAILURE;
            };
            let (rows, cols) = sim.grid().dimensions();
            let row = rows.saturating_sub(pattern.rows) / 2;
            let col = cols.saturating_sub(pattern.cols) / 2;
            sim.place_pattern(&pattern, row, col);
        }
        None => sim.randomize(),
    }

    let limit = args.max_generations;
    let outcome = sim.run_blocking(|generation| limit.is_some_and(|max| generation >= max));
    match outcome {
        RunOutcome::Stable(generation) => println!("Stable after {} generations", generation),
        RunOutcome::Extinct => println!("Extinct"),
        RunOutcome::Stopped(generation) => println!("Stopped at generation {}", generation),
    }

    if !sim.config().export() {
        return ExitCode::SUCCESS;
    }
    match sim.export() {
        Ok(path) => {
            println!("Exported {} frames to {}", sim.frame_count(), path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Export failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

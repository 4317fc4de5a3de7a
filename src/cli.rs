//! CLI argument parsing and command execution.
//!
//! Parsing is hand-rolled over an iterator of strings so the full
//! command surface is testable without touching `std::env`.

use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::RunConfig;
use crate::geometry::{point_source_solid_angle, DiscGeometry};
use crate::propagate::{UncertaintyPropagator, WorkStealingPropagator};
use crate::report::{print_failure, print_report, print_run_header, DistanceReport};
use crate::rng::McRng;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the estimation sweep.
    Run {
        /// Optional path to a YAML configuration; defaults to the
        /// built-in reference setup.
        config_path: Option<PathBuf>,
        /// Optional seed override.
        seed_override: Option<u64>,
        /// Force the work-stealing propagator.
        parallel: bool,
    },
    /// Show help.
    Help,
    /// Show version.
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            // Bare invocation runs the reference setup.
            return Self {
                command: Command::Run {
                    config_path: None,
                    seed_override: None,
                    parallel: false,
                },
            };
        }

        let command = match args[1].as_str() {
            "run" => Self::parse_run_command(args),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    fn parse_run_command(args: &[String]) -> Command {
        let mut config_path = None;
        let mut seed_override = None;
        let mut parallel = false;

        let mut i = 2;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" => {
                    if i + 1 < args.len() {
                        if let Ok(seed) = args[i + 1].parse() {
                            seed_override = Some(seed);
                        }
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                "--parallel" => {
                    parallel = true;
                    i += 1;
                }
                path if config_path.is_none() => {
                    config_path = Some(PathBuf::from(path));
                    i += 1;
                }
                _ => {
                    i += 1;
                }
            }
        }

        Command::Run {
            config_path,
            seed_override,
            parallel,
        }
    }
}

/// Print version information.
pub fn print_version() {
    println!("sterad {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message.
pub fn print_help() {
    println!(
        r"sterad - Monte Carlo solid-angle estimation with uncertainty propagation

USAGE:
    sterad [COMMAND] [OPTIONS]

COMMANDS:
    run [config.yaml]       Run the estimation sweep
        --seed <N>          Override the configured seed
        --parallel          Use the work-stealing propagator

    help                    Show this help message
    version                 Show version information

With no arguments, sterad runs the built-in reference setup: a
2.5 +/- 0.5 source disc, a detector of radius 4, distances
5/13/21/29/37, 10000 samples per estimate, 100 iterations.
"
    );
}

/// Execute a parsed command.
#[must_use]
pub fn execute(args: &Args) -> ExitCode {
    match &args.command {
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
        Command::Run {
            config_path,
            seed_override,
            parallel,
        } => run_sweep(config_path.as_deref(), *seed_override, *parallel),
    }
}

/// Process every configured distance, continuing past per-distance
/// failures; the exit code is non-zero if any distance failed.
fn run_sweep(
    config_path: Option<&std::path::Path>,
    seed_override: Option<u64>,
    parallel: bool,
) -> ExitCode {
    let config = match config_path {
        Some(path) => match RunConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("failed to load {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => RunConfig::default(),
    };

    let seed = seed_override.unwrap_or(config.reproducibility.seed);
    let parallel = parallel || config.sampling.parallel;
    let samples = config.sampling.samples;
    let iterations = config.sampling.iterations;

    print_run_header(seed, samples, iterations, parallel);

    let mut rng = McRng::new(seed);
    let mut failures = 0usize;

    for &distance in &config.distances {
        let geom = match DiscGeometry::new(config.source.radius_mean, config.detector.radius, distance)
        {
            Ok(geom) => geom,
            Err(err) => {
                print_failure(
                    distance,
                    config.source.radius_mean,
                    config.source.radius_uncertainty,
                    &err,
                );
                failures += 1;
                continue;
            }
        };

        let result = if parallel {
            WorkStealingPropagator::new(samples, iterations).propagate(
                &geom,
                config.source.radius_uncertainty,
                &mut rng,
            )
        } else {
            UncertaintyPropagator::new(samples, iterations).propagate(
                &geom,
                config.source.radius_uncertainty,
                &mut rng,
            )
        };

        match result {
            Ok(result) => {
                let theoretical = point_source_solid_angle(config.detector.radius, distance);
                print_report(&DistanceReport::new(distance, &result, theoretical));
            }
            Err(err) => {
                print_failure(
                    distance,
                    config.source.radius_mean,
                    config.source.radius_uncertainty,
                    &err,
                );
                failures += 1;
            }
        }
    }

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

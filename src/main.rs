//! Ionospheric ray tracer CLI
//!
//! ```bash
//! # Trace a scenario with 4 threads, writing VTK polylines
//! ionotracer simulation -p 4 -o out/rays.vtk scenarios/mars.json
//!
//! # Dispersion curves of the O and X waves
//! ionotracer wavetypes -c config/config.json -o out/data.csv
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ionotracer::commands::simulation::{SimulationArgs, output_dir, scenario_path};
use ionotracer::commands::{simulation, wavetypes};
use ionotracer::config::{self, AppConfig, Overrides};
use ionotracer::sim::scene::ionosphere::gyro_frequency;

/// Ionospheric ray tracer
///
/// Traces radio rays from ground beacons through a layered planetary
/// ionosphere and records every interaction.
#[derive(Parser, Debug)]
#[command(name = "ionotracer")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Application config file
    #[arg(short, long, global = true, default_value = "config/config.json")]
    config: PathBuf,

    /// Output file; the extension selects the format (csv, dat, vtk, json)
    #[arg(short, long, global = true, default_value = "data.csv")]
    output: PathBuf,

    /// Number of tracing threads (overrides the config)
    #[arg(short, long, global = true, default_value_t = 0)]
    parallelism: usize,

    /// Number of iterations (overrides the config)
    #[arg(short, long, global = true, default_value_t = 0)]
    iterations: usize,

    /// Include magnetic field effects
    #[arg(short, long = "magneticfield", global = true)]
    magnetic_field: bool,

    /// Verbosity: -v info, -vv debug
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Lowest frequency [Hz] (overrides the config)
    #[arg(long, global = true, default_value_t = 0.)]
    fmin: f64,

    /// Frequency step [Hz] (overrides the config)
    #[arg(long, global = true, default_value_t = 0.)]
    fstep: f64,

    /// Highest frequency [Hz] (overrides the config)
    #[arg(long, global = true, default_value_t = 0.)]
    fmax: f64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trace all beacons of a scenario
    Simulation {
        /// Scenario file (.json)
        scenario: String,
    },
    /// Write O and X wave dispersion curves
    Wavetypes,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Simulation { scenario } => {
            let args = SimulationArgs {
                config: cli.config.clone(),
                scenario: scenario_path(scenario)?,
                output: cli.output.clone(),
                magnetic_field: cli.magnetic_field,
                overrides: Overrides {
                    parallelism: cli.parallelism,
                    iterations: cli.iterations,
                    fmin: cli.fmin,
                    fstep: cli.fstep,
                    fmax: cli.fmax,
                },
            };
            simulation::run(&args)?;
        }
        Command::Wavetypes => {
            let strength = if cli.config.exists() {
                let app: AppConfig = config::load(&cli.config)?;
                app.magnetic_field.map(|f| f.strength).unwrap_or(0.)
            } else {
                0.
            };
            if strength == 0. {
                tracing::warn!("No magnetic field configured, X wave curves equal the O wave");
            }
            wavetypes::run(&output_dir(&cli.output), gyro_frequency(strength))?;
        }
    }
    Ok(())
}

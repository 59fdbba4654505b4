//! Enigma simulator.
//!
//! ## Usage
//!
//! ```bash
//! # Read messages from stdin, write to stdout
//! enigma default.conf < input.in
//!
//! # Read from and write to files
//! enigma default.conf input.in output.out
//! ```
//!
//! Exits with status 0 on success, or prints a single `Error:` line to
//! stderr and exits with status 1.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use enigma::{config, driver, EnigmaError};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "enigma")]
#[command(about = "Encrypt and decrypt messages with a rotor cipher machine")]
struct Cli {
    /// Configuration file describing the alphabet, slots and rotors.
    config: PathBuf,

    /// File of settings lines and messages (defaults to stdin).
    input: Option<PathBuf>,

    /// File for converted messages (defaults to stdout).
    output: Option<PathBuf>,
}

fn open(path: &Path) -> Result<File, EnigmaError> {
    File::open(path)
        .map_err(|err| EnigmaError::config(format!("could not open {}: {err}", path.display())))
}

fn run(cli: &Cli) -> Result<(), EnigmaError> {
    let text = io::read_to_string(open(&cli.config)?)?;
    let mut machine = config::parse_machine(&text)?;
    info!(
        config = %cli.config.display(),
        rotors = machine.catalog().len(),
        "loaded configuration"
    );

    match (&cli.input, &cli.output) {
        (Some(input), Some(output)) => {
            let writer = File::create(output).map_err(|err| {
                EnigmaError::config(format!("could not open {}: {err}", output.display()))
            })?;
            driver::process(&mut machine, BufReader::new(open(input)?), BufWriter::new(writer))
        }
        (Some(input), None) => {
            driver::process(&mut machine, BufReader::new(open(input)?), io::stdout().lock())
        }
        (None, _) => driver::process(&mut machine, io::stdin().lock(), io::stdout().lock()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

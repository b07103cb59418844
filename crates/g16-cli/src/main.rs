mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use g16_pipeline::Curve;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "g16", version, about = "Prove and verify X * X == Y with Groth16")]
struct Cli {
    /// Print machine-readable JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Compile, set up, prove and verify the square circuit
    Run {
        /// Value for public input X
        #[arg(long)]
        x: Option<String>,
        /// Value for public input Y
        #[arg(long)]
        y: Option<String>,
        /// bn254 or bls12-381
        #[arg(long)]
        curve: Option<Curve>,
        /// Deterministic randomness (testing only)
        #[arg(long)]
        seed: Option<u64>,
        /// Write the proof artifact to this file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Verify an exported proof artifact
    Verify {
        /// Artifact JSON file
        file: PathBuf,
    },
    /// Show constraint counts for the square circuit
    Constraints {
        #[arg(long)]
        curve: Option<Curve>,
    },
    /// Manage ~/.g16/config.json
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
}

#[derive(Subcommand)]
enum ConfigCmd {
    /// Show the effective configuration
    Show,
    /// Set a config value (curve, seed, x, y)
    Set { key: String, value: String },
    /// Print the config file location
    Path,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    output::set_json_mode(cli.json);
    init_tracing(cli.verbose);

    match cli.command {
        Cmd::Run {
            x,
            y,
            curve,
            seed,
            export,
        } => commands::run::run(commands::run::RunArgs {
            x,
            y,
            curve,
            seed,
            export,
        })?,
        Cmd::Verify { file } => commands::verify::run(&file)?,
        Cmd::Constraints { curve } => commands::constraints::run(curve)?,
        Cmd::Config { action } => match action {
            ConfigCmd::Show => commands::config::show()?,
            ConfigCmd::Set { key, value } => commands::config::set(&key, &value)?,
            ConfigCmd::Path => commands::config::path()?,
        },
    }
    Ok(())
}

//! scaled-tape - measure at drawing scale from the command line
//!
//! Parses scales and lengths the way the tape measure tool does, and replays
//! recorded tool sessions against a headless host.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tape_scale::{parse_length, Scale};
use tape_tool::ToolConfig;

mod session;

#[derive(Parser)]
#[command(name = "scaled-tape")]
#[command(about = "Measure lengths at drawing scale", long_about = None)]
struct Cli {
    /// Tool config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a scale such as 1:50 or 1/4" = 1'-0" and print it as 1:N
    Scale {
        /// Scale text
        text: String,
    },
    /// Print what a model length reads at a scale
    Measure {
        /// Scale text
        scale: String,
        /// Model length, e.g. 3'-6" or 250mm
        length: String,
    },
    /// Replay a recorded tool session and print what the tool reported
    Replay {
        /// Session file (.json)
        session: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Scale { text } => {
            let scale = parse_scale(&text, &config)?;
            println!("{scale} (factor {})", scale.factor());
        }
        Commands::Measure { scale, length } => {
            let scale = parse_scale(&scale, &config)?;
            let length = parse_length(&length, config.default_unit)
                .with_context(|| format!("invalid length {length:?}"))?;
            println!(
                "{} ({scale})",
                config.length_format.format(scale.scale_length(length))
            );
        }
        Commands::Replay { session: path } => {
            let session = session::Session::load(&path)?;
            for line in session.replay(&config)? {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ToolConfig> {
    match path {
        Some(path) => ToolConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ToolConfig::default()),
    }
}

fn parse_scale(text: &str, config: &ToolConfig) -> Result<Scale> {
    Scale::parse_with_unit(text, config.default_unit)
        .with_context(|| format!("invalid scale {text:?}"))
}

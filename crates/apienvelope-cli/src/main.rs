//! apienvelope CLI - read and write API envelopes from the shell
//!
//! Commands:
//! - `apienvelope open` - Decode a request envelope
//! - `apienvelope success` - Write a success-message response
//! - `apienvelope error` - Write an error response
//! - `apienvelope result` - Write a result response
//! - `apienvelope inspect` - Decode a response envelope

use anyhow::{Context, Result};
use apienvelope_core::LogLevel;
use apienvelope_transport::EnvelopeCodec;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "apienvelope")]
#[command(author, version, about = "Read and write JSON API envelopes", long_about = None)]
struct Cli {
    /// Path to a TOML codec configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off); overrides the config file
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a request envelope and print its method and body
    Open {
        /// Read from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Write {"status":"OK","message":...}
    Success {
        /// Informational message
        message: String,
    },

    /// Write {"status":"Error","message":...}
    Error {
        /// Error messages, outermost context first
        #[arg(required = true)]
        messages: Vec<String>,
    },

    /// Write {"status":"OK","body":...}
    Result {
        /// Body as JSON text
        json: String,
    },

    /// Decode a response envelope and print its message or body
    Inspect {
        /// Read from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref())?;
    let level = match cli.log_level.as_deref() {
        Some(name) => LogLevel::parse(name)
            .with_context(|| format!("Unknown log level: {}", name))?,
        None => config.log_level(),
    };
    apienvelope_logging::init_logging_with_env_override(level);

    let codec = EnvelopeCodec::new(config);
    let stdout = io::stdout().lock();

    match cli.command {
        Commands::Open { input } => {
            commands::open(&codec, open_input(input.as_deref())?, stdout)?;
        }
        Commands::Success { message } => {
            commands::success(&codec, &message, stdout)?;
        }
        Commands::Error { messages } => {
            commands::error(&codec, &messages, stdout)?;
        }
        Commands::Result { json } => {
            commands::result(&codec, &json, stdout)?;
        }
        Commands::Inspect { input } => {
            commands::inspect(open_input(input.as_deref())?, stdout)?;
        }
    }

    Ok(())
}

fn open_input(path: Option<&std::path::Path>) -> Result<Box<dyn Read>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input: {:?}", path))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

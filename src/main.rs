//! # Runpad - edit a script, run it, talk to it
//!
//! A small editor whose Run button launches the script as a child process,
//! streams its output into a pane and relays typed answers to its prompts.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the editor
//! cargo run
//!
//! # Open a script right away
//! cargo run -- path/to/script.py
//!
//! # Use another interpreter for this session
//! cargo run -- --interpreter python3.12 script.py
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use runpad_core::Config;
use runpad_ui::{Flags, run};

/// Runpad - a script editor with a Run button
#[derive(Parser, Debug)]
#[command(name = "runpad")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Interpreter that runs the script (overrides the config file)
    #[arg(short, long, value_name = "PROGRAM")]
    interpreter: Option<String>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Loads the config and applies command line overrides.
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)
                .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))?,
            None => Config::load(),
        };
        if let Some(interpreter) = &self.interpreter {
            config.runner.interpreter = interpreter.clone();
        }
        Ok(config)
    }

    /// Level used when `RUST_LOG` is unset.
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging; RUST_LOG directives win over -v
    let filter = EnvFilter::builder()
        .with_default_directive(args.log_level().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .init();

    tracing::info!("Starting Runpad v{}", env!("CARGO_PKG_VERSION"));

    let config = args.config()?;
    tracing::debug!("Interpreter: {}", config.runner.interpreter);

    let flags = Flags {
        file: args.file,
        config,
    };

    run(flags).map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

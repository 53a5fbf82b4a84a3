// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `confwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "confwatch",
    version,
    about = "Load a configuration file, watch it, and print field-level changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (YAML).
    #[arg(long, value_name = "PATH", default_value = "config.yaml")]
    pub config: String,

    /// Write the bundled default config if the file does not exist yet.
    #[arg(long)]
    pub init: bool,

    /// Load and print once, no watching.
    #[arg(long)]
    pub once: bool,

    /// Quiet period (milliseconds) that closes a burst of file events.
    #[arg(long, value_name = "MS", default_value_t = 100)]
    pub debounce_ms: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CONFWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

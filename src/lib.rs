// src/lib.rs

pub mod cli;
pub mod config;
pub mod diff;
pub mod errors;
pub mod logging;
pub mod manager;
pub mod types;
pub mod watch;

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::default_config_template;
use crate::config::{ConfigModel, FIELDS};
use crate::diff::{DiffModel, is_field_changed};
use crate::manager::{ConfigEvent, ConfigManager, ManagerOptions};

pub use crate::config::{FieldPath, FieldValue};
pub use crate::errors::{ConfwatchError, ParseError, ValidationError};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - optional default-config provisioning (`--init`)
/// - the initial load
/// - the file watcher, printing every accepted change or reload error
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = Path::new(&args.config);

    if args.init {
        provision_default(config_path)?;
    }

    let manager = ConfigManager::with_options(ManagerOptions {
        debounce: Duration::from_millis(args.debounce_ms),
    });

    match manager.load_config(config_path) {
        Ok(config) => print!("{}", render_config(Some(&config), None)),
        Err(err) if args.once => {
            return Err(err).with_context(|| format!("loading {config_path:?}"));
        }
        Err(err) => println!("error loading configuration: {err}"),
    }

    if args.once {
        return Ok(());
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ConfigEvent>();
    manager
        .start_watching(config_path, event_tx)
        .with_context(|| format!("watching {config_path:?}"))?;
    println!("watching {} for changes (Ctrl-C to exit)", config_path.display());

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    ConfigEvent::Changed(change) => {
                        println!();
                        println!("[#{}] configuration updated", change.seq);
                        print!("{}", render_config(Some(&change.config), Some(&change.diff)));
                    }
                    ConfigEvent::Failed { seq, error } => {
                        println!();
                        println!("[#{seq}] configuration error: {error}");
                        println!("keeping previous valid state");
                    }
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("failed to listen for Ctrl+C: {e}");
                }
                break;
            }
        }
    }

    manager.stop_watching();
    info!("confwatch exiting");
    Ok(())
}

/// Write the bundled default document if `path` does not exist yet.
///
/// Returns `true` if a file was written.
pub fn provision_default(path: &Path) -> Result<bool> {
    if path.exists() {
        debug!(?path, "config file already present; not provisioning");
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("creating dir {parent:?}"))?;
    }
    std::fs::write(path, default_config_template())
        .with_context(|| format!("writing default config to {path:?}"))?;
    info!(?path, "wrote default configuration");
    Ok(true)
}

/// Render every field, one per line, grouped by section.
///
/// Fields changed in `diff` are prefixed with `*`; unset fields print as
/// `Not set`.
pub fn render_config(config: Option<&ConfigModel>, diff: Option<&DiffModel>) -> String {
    let mut out = String::new();
    let mut section = "";
    for spec in FIELDS.iter() {
        if spec.section != section {
            if !section.is_empty() {
                out.push('\n');
            }
            section = spec.section;
            let _ = writeln!(out, "{}:", section.to_uppercase());
        }
        let marker = if is_field_changed(diff, spec.name) { '*' } else { ' ' };
        let value = config
            .and_then(|c| spec.read(c))
            .map(|v| v.to_string())
            .unwrap_or_else(|| "Not set".to_string());
        let _ = writeln!(out, "{marker} {}: {value}", spec.name);
    }
    out
}

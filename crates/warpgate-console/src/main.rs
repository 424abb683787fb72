//! Line-oriented console host for the Warpgate warp commands.
//!
//! Reads commands from standard input and runs them against an in-memory
//! game host seeded from the `host` section of the configuration file.
//! Lines starting with `@Name` run as that player; other lines run as the
//! server console. The warp registry is saved after every change.
//!
//! ```text
//! stdin --> repl --> Dispatcher --> WarpService --> LocationStore --> warps.json
//! ```

mod app;
mod error;
mod host;
mod repl;

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use warpgate_core::WarpsConfig;

use crate::app::{App, Outcome};
use crate::error::ConsoleError;
use crate::host::HostConfig;

/// Config file used when no path is given.
const DEFAULT_CONFIG_PATH: &str = "warpgate.yaml";

/// Application entry point.
///
/// Loads configuration, initializes logging, restores the registry, then
/// reads commands until end of input, `:quit`, or Ctrl-C.
///
/// # Errors
///
/// Returns an error if the configuration or snapshot cannot be loaded, or
/// if reading standard input fails.
#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config_found = config_path.exists();
    let (config, host_config) = if config_found {
        (
            WarpsConfig::from_file(&config_path)?,
            HostConfig::from_file(&config_path)?,
        )
    } else {
        (WarpsConfig::parse("")?, HostConfig::default())
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if config_found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        warn!(path = %config_path.display(), "Config file not found, using defaults");
    }

    let mut app = App::open(&config, &host_config)?;
    info!(
        worlds = host_config.worlds.len(),
        online = app.host().online_names().len(),
        "warpgate-console ready"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                None
            }
        };
        let Some(line) = line else {
            break;
        };
        match app.handle(&line) {
            Outcome::Quit => break,
            Outcome::Continue(output) => {
                for text in output {
                    println!("{text}");
                }
            }
        }
        app.flush().await;
    }

    app.save_if_changed().await?;
    info!("warpgate-console stopped");
    Ok(())
}

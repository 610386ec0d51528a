// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_and_validate};
use crate::config::WatchSettings;
use crate::types::WatchMode;
use crate::watch::{notification_channel, spawn_watcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + CLI overrides
/// - the watcher in the selected mode
/// - the reload consumer (one `reload` line on stdout per signal)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = match config_path(&args) {
        Some(path) => {
            debug!(?path, "loading config");
            Some(load_and_validate(&path)?)
        }
        None => None,
    };
    let settings = WatchSettings::resolve(cfg.as_ref(), &args)?;

    if args.dry_run {
        print_dry_run(&settings);
        return Ok(());
    }

    let (notifier, mut reloads) = notification_channel();
    let handle = spawn_watcher(settings.mode, settings.files.clone(), notifier)?;
    let shutdown = handle.cancellation_token();

    // Ctrl-C → graceful shutdown.
    {
        let token = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            token.cancel();
        });
    }

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            signal = reloads.recv() => match signal {
                Some(()) => println!("reload"),
                // Watcher task ended on its own.
                None => break,
            },
        }
    }

    info!("shutting down");
    handle.shutdown().await?;
    Ok(())
}

/// `--config` if given, else `Hashwatch.toml` when it exists.
fn config_path(args: &CliArgs) -> Option<PathBuf> {
    match &args.config {
        Some(path) => Some(path.clone()),
        None => {
            let default = default_config_path();
            default.is_file().then_some(default)
        }
    }
}

/// Simple dry-run output: print mode and files.
fn print_dry_run(settings: &WatchSettings) {
    println!("hashwatch dry-run");
    match settings.mode {
        WatchMode::Auto => println!("  mode = auto"),
        WatchMode::Timed(interval) => println!("  mode = timed (every {interval:?})"),
    }
    println!();

    println!("files ({}):", settings.files.len());
    for file in &settings.files {
        println!("  - {}", file.display());
    }

    debug!("dry-run complete (not watching)");
}

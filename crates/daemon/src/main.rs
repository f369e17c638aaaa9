// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bot Kernel Daemon (bkd) entrypoint.

use bk_daemon::{Config, DaemonError};
use std::path::PathBuf;
use tracing::info;

const DEFAULT_CONFIG: &str = "bkd.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle info flags before any config/lock acquisition
    let mut config_path = PathBuf::from(DEFAULT_CONFIG);
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("bkd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("bkd {}", env!("CARGO_PKG_VERSION"));
                println!("Bot Kernel Daemon - hosts crawler and bot workers");
                println!();
                println!("USAGE:");
                println!("    bkd [CONFIG]");
                println!();
                println!("ARGS:");
                println!("    CONFIG    Path to the TOML config (default: {DEFAULT_CONFIG})");
                println!();
                println!("The daemon runs until its owner sends a `shutdown` control");
                println!("message to the admin bot.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            flag if flag.starts_with('-') => {
                eprintln!("error: unexpected argument '{flag}'");
                eprintln!("Usage: bkd [CONFIG]");
                std::process::exit(1);
            }
            path => config_path = PathBuf::from(path),
        }
    }

    let config = Config::load(&config_path)?;
    let log_guard = setup_logging(&config)?;

    info!(config = %config_path.display(), "starting daemon");
    if let Err(err) = bk_daemon::run(&config) {
        if matches!(err, DaemonError::LockFailed(_)) {
            // Another daemon holds the lock; report the resident pid.
            let pid = std::fs::read_to_string(config.lock_path())
                .unwrap_or_default()
                .trim()
                .to_string();
            eprintln!("bkd is already running");
            if !pid.is_empty() {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        drop(log_guard);
        return Err(err.into());
    }

    info!("daemon stopped");
    Ok(())
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, DaemonError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(&config.daemon.state_dir)?;

    let file_appender = tracing_appender::rolling::never(&config.daemon.state_dir, "daemon.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}

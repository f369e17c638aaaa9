// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and shutdown.
//!
//! Acquires the PID lock, wires the source, factory, and bots together,
//! loads the startup bots, and blocks until the kernel has shut down
//! (normally via an admin `shutdown` command).

use crate::Config;
use bk_bots::{AdminBot, GreeterBot, ReplyLog, ReplyLogError, ADMIN_BOT, GREETER_BOT};
use bk_crawler::CrawlerFactory;
use bk_kernel::{Bot, BotRegistry, Kernel, KernelError};
use bk_source::{FileSource, SourceClient};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("cannot read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("reply log error: {0}")]
    ReplyLog(#[from] ReplyLogError),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the daemon to completion.
///
/// Returns once every worker has stopped. The PID lock is held for the
/// whole run and removed on the way out.
pub fn run(config: &Config) -> Result<(), DaemonError> {
    fs::create_dir_all(&config.daemon.state_dir)?;
    let lock_path = config.lock_path();
    let _lock = acquire_lock(&lock_path)?;

    let source: Arc<dyn SourceClient> = Arc::new(FileSource::new(
        &config.source.root,
        config.source.username.clone(),
    ));
    let factory = Arc::new(CrawlerFactory::new(
        Arc::clone(&source),
        config.crawlers.clone(),
    ));
    info!(crawlers = ?factory.spec_names(), "crawler specs loaded");

    let kernel = Arc::new(Kernel::new(build_registry(config, &source, &factory)?));

    // Deterministic load order regardless of config file ordering.
    let mut startup = config.startup.bots.clone();
    startup.sort();
    for name in &startup {
        kernel.load_bot(name);
    }
    info!(workers = kernel.worker_count(), "daemon ready");

    kernel.wait_for_shutdown();

    if let Err(err) = fs::remove_file(&lock_path) {
        warn!(path = %lock_path.display(), error = %err, "cannot remove pid file");
    }
    Ok(())
}

/// Build the registry of loadable bot types.
///
/// Bots are constructed once here and handed out by reference: a
/// re-issued `loadbot` must reattach the same instance (and the same
/// persisted reply log), not a fresh one.
fn build_registry(
    config: &Config,
    source: &Arc<dyn SourceClient>,
    factory: &Arc<CrawlerFactory>,
) -> Result<BotRegistry, DaemonError> {
    let mut bot_types = BotRegistry::new();

    let admin = Arc::new(AdminBot::new(
        Arc::clone(source),
        Arc::clone(factory),
        config.admin.owner.clone(),
        config.admin.poll_limit,
        Duration::from_secs(config.admin.sleep_secs),
        ReplyLog::open(config.admin_replies_path())?,
    ));
    bot_types.register(ADMIN_BOT, move || Arc::clone(&admin) as Arc<dyn Bot>);

    if let Some(greeter_config) = &config.greeter {
        let greeter = Arc::new(GreeterBot::new(
            Arc::clone(source),
            greeter_config.channel.clone(),
            ReplyLog::open(config.greeter_replies_path())?,
        ));
        bot_types.register(GREETER_BOT, move || Arc::clone(&greeter) as Arc<dyn Bot>);
    }

    Ok(bot_types)
}

/// Take the exclusive PID lock, writing our pid into the file.
///
/// The returned handle must stay alive for the daemon's lifetime; the
/// OS releases the lock when it is dropped (or the process dies).
fn acquire_lock(path: &Path) -> Result<File, DaemonError> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .open(path)
        .map_err(DaemonError::LockFailed)?;
    file.try_lock_exclusive().map_err(DaemonError::LockFailed)?;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(file)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;

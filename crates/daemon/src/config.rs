// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.
//!
//! One TOML file describes the whole deployment: where state lives,
//! how to reach the content source, the admin account, the optional
//! greeter, declared crawlers, and which bots to load at startup.

use crate::DaemonError;
use bk_crawler::CrawlerSpec;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn default_poll_limit() -> usize {
    25
}

fn default_admin_sleep() -> u64 {
    120
}

#[derive(Debug, Deserialize)]
pub struct DaemonSection {
    /// Directory for the PID lock, log file, and reply logs.
    pub state_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct SourceSection {
    /// Root directory of the file-backed source.
    pub root: PathBuf,
    /// Account the daemon acts as.
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminSection {
    /// The only author whose control messages are honored.
    pub owner: String,
    #[serde(default = "default_poll_limit")]
    pub poll_limit: usize,
    #[serde(default = "default_admin_sleep")]
    pub sleep_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct GreeterSection {
    /// Channel the greeter's dedicated crawler watches.
    pub channel: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartupSection {
    /// Registry identifiers loaded at startup, in order.
    #[serde(default)]
    pub bots: Vec<String>,
}

/// The parsed daemon configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub daemon: DaemonSection,
    pub source: SourceSection,
    pub admin: AdminSection,
    /// Absent section disables the greeter entirely.
    pub greeter: Option<GreeterSection>,
    #[serde(default)]
    pub crawlers: Vec<CrawlerSpec>,
    #[serde(default)]
    pub startup: StartupSection,
}

impl Config {
    /// Load and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DaemonError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DaemonError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| DaemonError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.daemon.state_dir.join("daemon.pid")
    }

    pub fn log_path(&self) -> PathBuf {
        self.daemon.state_dir.join("daemon.log")
    }

    pub fn admin_replies_path(&self) -> PathBuf {
        self.daemon.state_dir.join("admin.replies.json")
    }

    pub fn greeter_replies_path(&self) -> PathBuf {
        self.daemon.state_dir.join("greeter.replies.json")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

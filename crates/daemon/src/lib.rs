// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Bot Kernel Daemon (bkd)
//!
//! Long-running process that hosts the worker kernel: loads the
//! configured bots, holds the PID lock, and blocks until an admin
//! `shutdown` command stops the last worker.

pub mod config;
pub mod lifecycle;

pub use config::Config;
pub use lifecycle::{run, DaemonError};

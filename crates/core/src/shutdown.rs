// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative shutdown signaling.
//!
//! Workers sleep by waiting on their signal's condvar, so a shutdown
//! request wakes them immediately instead of at the end of a sleep
//! interval.

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// A one-way latch with a condvar-backed cancellable wait.
///
/// Triggering is idempotent and never blocks.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    triggered: Mutex<bool>,
    condvar: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake all waiters.
    pub fn trigger(&self) {
        let mut triggered = self.triggered.lock();
        *triggered = true;
        self.condvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.triggered.lock()
    }

    /// Sleep for `timeout`, waking early on shutdown.
    ///
    /// Returns `true` if shutdown was requested (before or during the
    /// wait), `false` if the full timeout elapsed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut triggered = self.triggered.lock();
        while !*triggered {
            if self.condvar.wait_until(&mut triggered, deadline).timed_out() {
                return *triggered;
            }
        }
        true
    }

    /// Block until shutdown is requested.
    pub fn wait(&self) {
        let mut triggered = self.triggered.lock();
        while !*triggered {
            self.condvar.wait(&mut triggered);
        }
    }
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;

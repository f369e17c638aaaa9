// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker registry and supervisor.

use crate::{Bot, BotRegistry, KernelError};
use bk_core::ShutdownSignal;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use tracing::{debug, error, info, warn};

struct BotEntry {
    bot: Arc<dyn Bot>,
    handle: JoinHandle<()>,
}

/// The orchestrator: registry and supervisor for all workers.
///
/// One instance per process, constructed at startup and passed by
/// reference to every worker at init time.
///
/// Locking protocol: the registry lock is never held across a call into
/// worker code. Removal is two-phase: take the entry out under the
/// lock, release, then signal and join. A worker removing itself never
/// deadlocks (its own thread is never joined from itself).
pub struct Kernel {
    registry: Mutex<Vec<BotEntry>>,
    bot_types: BotRegistry,
    done: ShutdownSignal,
}

impl Kernel {
    pub fn new(bot_types: BotRegistry) -> Self {
        Self {
            registry: Mutex::new(Vec::new()),
            bot_types,
            done: ShutdownSignal::new(),
        }
    }

    /// Start a worker on its own named thread and register it.
    ///
    /// A worker with an already-registered name is rejected: the call
    /// logs and returns without error (idempotent by name).
    pub fn add_bot(&self, bot: Arc<dyn Bot>) -> Result<(), KernelError> {
        let name = bot.name().to_string();
        let mut registry = self.registry.lock();
        if registry.iter().any(|entry| entry.bot.name() == name) {
            warn!(bot = %name, "worker already registered, skipping");
            return Ok(());
        }

        let handle = {
            let bot = Arc::clone(&bot);
            thread::Builder::new()
                .name(name.clone())
                .spawn(move || bot.run())
                .map_err(|source| KernelError::Spawn {
                    name: name.clone(),
                    source,
                })?
        };
        registry.push(BotEntry { bot, handle });
        info!(bot = %name, workers = registry.len(), "worker started");
        Ok(())
    }

    /// Stop a named worker and block until its thread has terminated.
    ///
    /// Unknown names are a logged no-op. Callers get a synchronous
    /// fully-stopped guarantee, except when a worker stops itself, in
    /// which case its thread winds down after this call returns.
    pub fn stop_bot(&self, name: &str) -> Result<(), KernelError> {
        // Phase 1: take the entry out under the registry lock.
        let entry = {
            let mut registry = self.registry.lock();
            match registry.iter().position(|entry| entry.bot.name() == name) {
                Some(idx) => registry.remove(idx),
                None => {
                    warn!(bot = name, "stop requested for unknown worker");
                    return Ok(());
                }
            }
        };

        // Phase 2: outside the lock. The worker's shutdown path may call
        // back into the kernel.
        info!(bot = name, "stopping worker");
        entry.bot.shutdown();
        self.join_entry(entry)?;
        info!(bot = name, workers = self.worker_count(), "worker stopped");
        Ok(())
    }

    /// Shut down every registered worker and wait for all their threads.
    ///
    /// Wakes any [`Kernel::wait_for_shutdown`] callers even if a join
    /// fails; the first join failure is returned after all workers have
    /// been processed.
    pub fn shutdown_all(&self) -> Result<(), KernelError> {
        info!("shutting down kernel");
        let entries: Vec<BotEntry> = {
            let mut registry = self.registry.lock();
            registry.drain(..).collect()
        };
        let count = entries.len();

        for entry in &entries {
            info!(bot = entry.bot.name(), "signaling shutdown");
            entry.bot.shutdown();
        }

        let mut result = Ok(());
        for entry in entries {
            let name = entry.bot.name().to_string();
            if let Err(err) = self.join_entry(entry) {
                error!(bot = %name, error = %err, "worker thread lost");
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }

        info!(
            stopped = count,
            workers = self.worker_count(),
            "kernel shut down"
        );
        self.done.trigger();
        result
    }

    /// Dynamically construct, initialize, and start a worker by
    /// registry identifier. All failures are logged no-ops; the kernel
    /// stays healthy.
    pub fn load_bot(self: &Arc<Self>, identifier: &str) {
        info!(identifier, "loading bot");
        let Some(bot) = self.bot_types.construct(identifier) else {
            warn!(identifier, "unknown bot identifier");
            return;
        };
        if let Err(err) = bot.init(self) {
            warn!(identifier, error = %err, "bot init failed");
            return;
        }
        if let Err(err) = self.add_bot(bot) {
            warn!(identifier, error = %err, "bot start failed");
        }
    }

    /// Block until `shutdown_all` has completed.
    pub fn wait_for_shutdown(&self) {
        self.done.wait();
    }

    pub fn worker_count(&self) -> usize {
        self.registry.lock().len()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.lock().iter().any(|entry| entry.bot.name() == name)
    }

    /// Names of currently registered workers, in registration order.
    pub fn worker_names(&self) -> Vec<String> {
        self.registry
            .lock()
            .iter()
            .map(|entry| entry.bot.name().to_string())
            .collect()
    }

    fn join_entry(&self, entry: BotEntry) -> Result<(), KernelError> {
        let name = entry.bot.name().to_string();
        if entry.handle.thread().id() == current_thread_id() {
            // A worker's shutdown path re-entered the kernel on itself;
            // a thread must never block joining itself.
            debug!(bot = %name, "not waiting for current thread to join itself");
            return Ok(());
        }
        debug!(bot = %name, "waiting for worker thread to join");
        entry
            .handle
            .join()
            .map_err(|_| KernelError::ThreadPanicked(name))
    }
}

fn current_thread_id() -> ThreadId {
    thread::current().id()
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;

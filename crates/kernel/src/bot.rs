// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker lifecycle contract.

use crate::{Kernel, KernelError};
use std::sync::Arc;

/// A named, independently schedulable worker.
///
/// The kernel calls `init` once, then runs `run` on a dedicated thread
/// named after the worker. `shutdown` is an idempotent signal and must
/// not block; `run` is expected to observe it and return promptly.
pub trait Bot: Send + Sync + 'static {
    /// Stable, unique name. Doubles as the worker's thread name.
    fn name(&self) -> &str;

    /// Called once before the worker's thread is started.
    ///
    /// The kernel reference lets workers call back into the orchestrator
    /// later (store a `Weak` to avoid keeping it alive).
    fn init(&self, kernel: &Arc<Kernel>) -> Result<(), KernelError>;

    /// The worker's main loop. Blocks until shutdown is signaled.
    fn run(&self);

    /// Signal the worker to stop. Idempotent, non-blocking.
    fn shutdown(&self);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the kernel

use thiserror::Error;

/// Errors that can occur in the kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    /// A worker's thread could not be spawned.
    #[error("failed to spawn thread for {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// A worker's init hook failed; the worker was not started.
    #[error("init failed for {name}: {message}")]
    Init { name: String, message: String },
    /// A worker's thread terminated by panic. The runtime is in an
    /// inconsistent state; callers treat this as fatal.
    #[error("worker thread {0} panicked")]
    ThreadPanicked(String),
}

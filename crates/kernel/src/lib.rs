// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bk-kernel: Worker lifecycle orchestrator.
//!
//! The [`Kernel`] owns a registry of named workers ([`Bot`]s), each
//! running on its own OS thread. It supports dynamic registration,
//! removal with a synchronous fully-stopped guarantee, and coordinated
//! shutdown, all without ever holding the registry lock across a call
//! into worker code.

pub mod bot;
pub mod error;
pub mod kernel;
pub mod registry;

pub use bot::Bot;
pub use error::KernelError;
pub use kernel::Kernel;
pub use registry::{BotCtor, BotRegistry};

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bk-source: The content-source client boundary.
//!
//! Everything upstream of the kernel talks to the source through the
//! [`SourceClient`] trait: listing channels, fetching reply trees,
//! posting replies, and acknowledging control messages.

pub mod client;
pub mod file;

pub use client::{SourceClient, SourceError};
pub use file::FileSource;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSource, SourceCall};

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bk-bots: Business-logic workers.
//!
//! [`AdminBot`] drives the kernel from a control mailbox; [`GreeterBot`]
//! is the sample listener bot. Both keep a persisted [`ReplyLog`] to
//! stay idempotent under the source's unreliable acknowledgments.

pub mod admin;
pub mod greeter;
pub mod reply_log;

pub use admin::{AdminBot, ADMIN_BOT};
pub use greeter::{GreeterBot, GREETER_BOT, GREETER_CRAWLER};
pub use reply_log::{ReplyLog, ReplyLogError};

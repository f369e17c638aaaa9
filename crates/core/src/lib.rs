// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bk-core: Shared vocabulary for the botkernel workspace

pub mod channels;
pub mod command;
pub mod item;
pub mod listing;
pub mod shutdown;

pub use channels::load_channel_list;
pub use command::Command;
pub use item::{Item, ItemId, ItemKind};
pub use listing::ListingType;
pub use shutdown::ShutdownSignal;

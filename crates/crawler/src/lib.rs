// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bk-crawler: The crawl/match/dispatch engine.
//!
//! A [`Crawler`] is a worker that repeatedly scans channels on a
//! content source, applies registered [`MatchCriteria`], and invokes the
//! matching [`CrawlListener`]s synchronously. Listeners may mutate the
//! crawler's registrations from inside their own callbacks; dispatch
//! iterates snapshots, never live collections.

pub mod crawler;
pub mod criteria;
pub mod factory;

pub use crawler::Crawler;
pub use criteria::{BodyContains, CrawlListener, MatchCriteria};
pub use factory::{CrawlerFactory, CrawlerSpec, DEFAULT_CRAWLER};

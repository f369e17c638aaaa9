// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener and match-criteria capabilities.

use bk_core::Item;
use std::sync::Arc;

/// A registered callback, invoked synchronously on each match.
///
/// Listeners are identified by pointer: registering the same `Arc` twice
/// is a no-op, and removal takes the same `Arc` that was registered.
pub trait CrawlListener: Send + Sync {
    fn on_match(&self, item: &Item);
}

/// An interest predicate paired with the listener to notify.
///
/// A criterion is only evaluated while its listener is registered with
/// the crawler; criteria referencing a deregistered listener are
/// silently skipped, so a listener can detach by removing itself
/// without scrubbing its criteria.
pub trait MatchCriteria: Send + Sync {
    /// Does this item interest the listener?
    fn matches(&self, item: &Item) -> bool;

    /// The listener to notify on a match.
    fn listener(&self) -> Arc<dyn CrawlListener>;
}

/// Pointer identity for dyn listeners.
pub(crate) fn same_listener(a: &Arc<dyn CrawlListener>, b: &Arc<dyn CrawlListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Case-insensitive substring criterion over an item's body text.
pub struct BodyContains {
    needle: String,
    listener: Arc<dyn CrawlListener>,
}

impl BodyContains {
    pub fn new(needle: impl Into<String>, listener: Arc<dyn CrawlListener>) -> Self {
        Self {
            needle: needle.into().to_lowercase(),
            listener,
        }
    }
}

impl MatchCriteria for BodyContains {
    fn matches(&self, item: &Item) -> bool {
        if item.body.is_empty() {
            return false;
        }
        item.body.to_lowercase().contains(&self.needle)
    }

    fn listener(&self) -> Arc<dyn CrawlListener> {
        Arc::clone(&self.listener)
    }
}

#[cfg(test)]
#[path = "criteria_tests.rs"]
mod tests;

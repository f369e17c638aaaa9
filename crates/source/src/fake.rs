// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake source for deterministic testing

use crate::{SourceClient, SourceError};
use bk_core::{Item, ItemId, ListingType};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Recorded call to [`FakeSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    Connect,
    ListItems {
        channel: String,
        listing: ListingType,
        limit: usize,
    },
    ListReplies {
        item: ItemId,
    },
    PostReply {
        item: ItemId,
        text: String,
    },
    Acknowledge {
        item: ItemId,
    },
    ListPending {
        limit: usize,
    },
}

#[derive(Default)]
struct FakeState {
    listings: HashMap<(String, ListingType), Vec<Item>>,
    pending: Vec<Item>,
    calls: Vec<SourceCall>,
    connect_failures: usize,
    // Errors consumed FIFO by successive list_items calls.
    list_errors: Vec<SourceError>,
}

/// Fake source for testing.
///
/// Records all calls and allows scripting listings, the pending mailbox,
/// connect failures, and per-call listing errors (e.g. rate limits).
#[derive(Clone, Default)]
pub struct FakeSource {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the items served for a channel listing.
    pub fn set_listing(&self, channel: &str, listing: ListingType, items: Vec<Item>) {
        self.inner
            .lock()
            .listings
            .insert((channel.to_string(), listing), items);
    }

    /// Replace the pending control mailbox.
    pub fn set_pending(&self, items: Vec<Item>) {
        self.inner.lock().pending = items;
    }

    /// Queue an error for the next `list_items` call.
    pub fn push_list_error(&self, error: SourceError) {
        self.inner.lock().list_errors.push(error);
    }

    /// Shorthand for queuing a rate-limit signal.
    pub fn push_rate_limit(&self, retry_after: Duration) {
        self.push_list_error(SourceError::RateLimited { retry_after });
    }

    /// Fail the next `n` connect calls.
    pub fn fail_connects(&self, n: usize) {
        self.inner.lock().connect_failures = n;
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<SourceCall> {
        self.inner.lock().calls.clone()
    }

    /// Clear recorded calls.
    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Ids passed to `acknowledge`, in order (duplicates preserved).
    pub fn acked(&self) -> Vec<ItemId> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                SourceCall::Acknowledge { item } => Some(item.clone()),
                _ => None,
            })
            .collect()
    }

    /// Posted replies as `(parent, text)` pairs, in order.
    pub fn replies(&self) -> Vec<(ItemId, String)> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                SourceCall::PostReply { item, text } => Some((item.clone(), text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Number of `list_replies` calls for a given item.
    pub fn reply_fetches(&self, id: &ItemId) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, SourceCall::ListReplies { item } if item == id))
            .count()
    }
}

impl SourceClient for FakeSource {
    fn connect(&self) -> Result<(), SourceError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SourceCall::Connect);
        if inner.connect_failures > 0 {
            inner.connect_failures -= 1;
            return Err(SourceError::Auth("scripted connect failure".to_string()));
        }
        Ok(())
    }

    fn username(&self) -> &str {
        "fake-source"
    }

    fn list_items(
        &self,
        channel: &str,
        listing: ListingType,
        limit: usize,
    ) -> Result<Vec<Item>, SourceError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SourceCall::ListItems {
            channel: channel.to_string(),
            listing,
            limit,
        });
        if !inner.list_errors.is_empty() {
            return Err(inner.list_errors.remove(0));
        }
        let mut items = inner
            .listings
            .get(&(channel.to_string(), listing))
            .cloned()
            .unwrap_or_default();
        items.truncate(limit);
        Ok(items)
    }

    fn list_replies(&self, item: &Item) -> Result<Vec<Item>, SourceError> {
        self.inner.lock().calls.push(SourceCall::ListReplies {
            item: item.id.clone(),
        });
        Ok(item.replies.clone())
    }

    fn post_reply(&self, item: &Item, text: &str) -> Result<(), SourceError> {
        self.inner.lock().calls.push(SourceCall::PostReply {
            item: item.id.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn acknowledge(&self, item: &Item) -> Result<(), SourceError> {
        self.inner.lock().calls.push(SourceCall::Acknowledge {
            item: item.id.clone(),
        });
        Ok(())
    }

    fn list_pending(&self, limit: usize) -> Result<Vec<Item>, SourceError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SourceCall::ListPending { limit });
        let mut items = inner.pending.clone();
        items.truncate(limit);
        Ok(items)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

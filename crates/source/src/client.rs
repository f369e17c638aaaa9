// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `SourceClient` trait and its error taxonomy.

use bk_core::{Item, ListingType};
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a content source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source asked us to back off; the delay is mandatory.
    #[error("rate limited, retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed source data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Blocking client for a remote content source.
///
/// All calls run on the calling worker's own thread; a slow call blocks
/// that worker only.
pub trait SourceClient: Send + Sync {
    /// Connect or re-authenticate. Safe to call repeatedly.
    fn connect(&self) -> Result<(), SourceError>;

    /// Account name this client acts as.
    fn username(&self) -> &str;

    /// Fetch up to `limit` top-level items from a channel listing.
    fn list_items(
        &self,
        channel: &str,
        listing: ListingType,
        limit: usize,
    ) -> Result<Vec<Item>, SourceError>;

    /// Fetch the full nested reply tree under an item.
    fn list_replies(&self, item: &Item) -> Result<Vec<Item>, SourceError>;

    /// Post a reply to an item.
    fn post_reply(&self, item: &Item, text: &str) -> Result<(), SourceError>;

    /// Mark a control item as handled upstream.
    ///
    /// The upstream acknowledgment channel is unreliable: an acknowledged
    /// item may still show up as pending. Callers keep their own dedup
    /// record and must tolerate re-delivery.
    fn acknowledge(&self, item: &Item) -> Result<(), SourceError>;

    /// Fetch up to `limit` pending control messages.
    fn list_pending(&self, limit: usize) -> Result<Vec<Item>, SourceError>;
}

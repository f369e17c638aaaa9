// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content items: submissions, replies, and control messages.

use serde::{Deserialize, Serialize};

/// Stable identifier of a content item, assigned by the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// What kind of content unit an [`Item`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A top-level submission in a channel.
    Submission,
    /// A nested reply under a submission or another reply.
    Reply,
    /// A private control message (admin mailbox).
    Message,
}

/// An opaque content unit fetched from the source.
///
/// Submissions carry a `reply_count` used by the crawler's change-detection
/// cache, and replies form a nested tree via `replies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub author: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Body text (self-text for submissions, message body for replies).
    #[serde(default)]
    pub body: String,
    /// Channel the item was found in, when known.
    #[serde(default)]
    pub channel: Option<String>,
    /// Reply count as reported by the source listing.
    #[serde(default)]
    pub reply_count: u64,
    /// Direct children; populated for reply trees.
    #[serde(default)]
    pub replies: Vec<Item>,
}

impl Item {
    /// Minimal constructor; optional fields start empty.
    pub fn new(id: impl Into<ItemId>, kind: ItemKind, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            author: author.into(),
            title: None,
            body: String::new(),
            channel: None,
            reply_count: 0,
            replies: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_reply_count(mut self, count: u64) -> Self {
        self.reply_count = count;
        self
    }

    pub fn with_replies(mut self, replies: Vec<Item>) -> Self {
        self.replies = replies;
        self
    }

    pub fn is_message(&self) -> bool {
        self.kind == ItemKind::Message
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;

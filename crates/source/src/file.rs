// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed reference source.
//!
//! Serves listings from JSON fixtures under a root directory. Layout:
//!
//! ```text
//! <root>/channels/<channel>/<listing>.json   Vec<Item> (top-level, nested replies)
//! <root>/pending.json                        Vec<Item> (control mailbox)
//! <root>/acked.json                          Vec<ItemId>
//! <root>/outbox.jsonl                        one JSON object per posted reply
//! ```
//!
//! Acknowledged ids are filtered out of `pending.json` at read time, so
//! the mailbox behaves like a (reliable) message inbox. The real network
//! client lives outside this repository; this implementation exists so
//! the daemon runs end to end without one.

use crate::{SourceClient, SourceError};
use bk_core::{Item, ItemId, ListingType};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A `SourceClient` reading from a fixture directory.
pub struct FileSource {
    root: PathBuf,
    username: String,
    // Serializes outbox appends and ack read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>, username: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            username: username.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn listing_path(&self, channel: &str, listing: ListingType) -> PathBuf {
        self.root
            .join("channels")
            .join(channel)
            .join(format!("{listing}.json"))
    }

    fn acked_path(&self) -> PathBuf {
        self.root.join("acked.json")
    }

    fn load_items(path: &Path) -> Result<Vec<Item>, SourceError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(path)?;
        let items = serde_json::from_reader(BufReader::new(file))?;
        Ok(items)
    }

    fn load_acked(&self) -> Result<HashSet<ItemId>, SourceError> {
        let path = self.acked_path();
        if !path.exists() {
            return Ok(HashSet::new());
        }
        let file = File::open(&path)?;
        let ids: Vec<ItemId> = serde_json::from_reader(BufReader::new(file))?;
        Ok(ids.into_iter().collect())
    }

    fn save_acked(&self, acked: &HashSet<ItemId>) -> Result<(), SourceError> {
        let path = self.acked_path();
        let tmp = path.with_extension("tmp");
        let mut ids: Vec<&ItemId> = acked.iter().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, &ids)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl SourceClient for FileSource {
    fn connect(&self) -> Result<(), SourceError> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(SourceError::Auth(format!(
                "source root {} does not exist",
                self.root.display()
            )))
        }
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn list_items(
        &self,
        channel: &str,
        listing: ListingType,
        limit: usize,
    ) -> Result<Vec<Item>, SourceError> {
        let mut items = Self::load_items(&self.listing_path(channel, listing))?;
        items.truncate(limit);
        debug!(channel, %listing, count = items.len(), "loaded listing");
        Ok(items)
    }

    fn list_replies(&self, item: &Item) -> Result<Vec<Item>, SourceError> {
        // Reply trees are embedded in the listing fixtures.
        Ok(item.replies.clone())
    }

    fn post_reply(&self, item: &Item, text: &str) -> Result<(), SourceError> {
        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join("outbox.jsonl"))?;
        let line = json!({ "parent": item.id, "text": text });
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn acknowledge(&self, item: &Item) -> Result<(), SourceError> {
        let _guard = self.write_lock.lock();
        let mut acked = self.load_acked()?;
        if acked.insert(item.id.clone()) {
            self.save_acked(&acked)?;
        }
        Ok(())
    }

    fn list_pending(&self, limit: usize) -> Result<Vec<Item>, SourceError> {
        let acked = self.load_acked()?;
        let mut pending: Vec<Item> = Self::load_items(&self.root.join("pending.json"))?
            .into_iter()
            .filter(|item| !acked.contains(&item.id))
            .collect();
        pending.truncate(limit);
        Ok(pending)
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;

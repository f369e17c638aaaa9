// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted dedup set of already-handled item ids.
//!
//! Compensates for the source's unreliable acknowledgment channel: an
//! acknowledged item can still be reported as pending, so bots record
//! what they have handled and persist the record before relying on the
//! external acknowledgment. The file is rewritten atomically on every
//! mutation (write to .tmp, then rename).

use bk_core::ItemId;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur in reply-log operations
#[derive(Debug, Error)]
pub enum ReplyLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A persisted set of handled item ids.
pub struct ReplyLog {
    path: PathBuf,
    entries: Mutex<HashSet<ItemId>>,
}

impl ReplyLog {
    /// Open a reply log, loading any existing entries.
    ///
    /// A missing file starts an empty log. A corrupt file is moved to a
    /// `.bak` sibling and the log starts empty; losing dedup entries
    /// only risks duplicate handling, which callers already tolerate.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ReplyLogError> {
        let path = path.into();
        let entries = if path.exists() {
            let file = File::open(&path)?;
            match serde_json::from_reader::<_, Vec<ItemId>>(BufReader::new(file)) {
                Ok(ids) => ids.into_iter().collect(),
                Err(err) => {
                    let bak = path.with_extension("bak");
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "corrupt reply log, starting empty"
                    );
                    fs::rename(&path, &bak)?;
                    HashSet::new()
                }
            }
        } else {
            HashSet::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.entries.lock().contains(id)
    }

    /// Record an id as handled and persist immediately.
    pub fn record(&self, id: ItemId) -> Result<(), ReplyLogError> {
        let mut entries = self.entries.lock();
        if entries.insert(id) {
            self.save(&entries)?;
        }
        Ok(())
    }

    /// Drop all entries and persist the empty set.
    ///
    /// Called when a pending poll comes back empty: the source has
    /// caught up with every past acknowledgment.
    pub fn clear(&self) -> Result<(), ReplyLogError> {
        let mut entries = self.entries.lock();
        if !entries.is_empty() {
            entries.clear();
            self.save(&entries)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Save atomically: write to .tmp, sync, then rename over the log.
    fn save(&self, entries: &HashSet<ItemId>) -> Result<(), ReplyLogError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        let mut ids: Vec<&ItemId> = entries.iter().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, &ids)?;
            writer.flush()?;
            writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "reply_log_tests.rs"]
mod tests;

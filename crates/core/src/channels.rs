// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel list files: one channel name per line.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Load up to `count` channel names from a line-oriented file.
///
/// Lines are trimmed; blank lines are skipped and do not count toward
/// the limit.
pub fn load_channel_list(path: &Path, count: usize) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut channels = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        channels.push(trimmed.to_string());
        if channels.len() == count {
            break;
        }
    }
    Ok(channels)
}

#[cfg(test)]
#[path = "channels_tests.rs"]
mod tests;

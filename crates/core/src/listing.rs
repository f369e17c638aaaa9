// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listing types a crawler checks per channel.

use serde::{Deserialize, Serialize};

/// Which listing of a channel to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Hot,
    New,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Hot => "hot",
            ListingType::New => "new",
        }
    }
}

impl std::fmt::Display for ListingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

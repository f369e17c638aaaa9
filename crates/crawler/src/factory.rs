// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crawler specs and memoized construction.
//!
//! Specs are declared in the daemon config; bots ask the factory for a
//! crawler by logical name and share the resulting instance.

use crate::Crawler;
use bk_core::{load_channel_list, ListingType};
use bk_source::SourceClient;
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Logical name of the shared crawler any bot may use.
pub const DEFAULT_CRAWLER: &str = "default";

fn default_count() -> usize {
    200
}

fn default_listing_types() -> Vec<ListingType> {
    vec![ListingType::Hot, ListingType::New]
}

/// Declarative description of a crawler.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSpec {
    pub name: String,
    /// Inline channel list.
    #[serde(default)]
    pub channels: Vec<String>,
    /// Line-oriented channel file, appended to `channels`.
    #[serde(default)]
    pub channels_file: Option<PathBuf>,
    /// Max channels to take from `channels_file`.
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default = "default_listing_types")]
    pub listing_types: Vec<ListingType>,
    pub limit: usize,
    pub sleep_secs: u64,
    #[serde(default)]
    pub shuffle: bool,
}

impl CrawlerSpec {
    fn channels(&self) -> Vec<String> {
        let mut channels = self.channels.clone();
        if let Some(path) = &self.channels_file {
            match load_channel_list(path, self.count) {
                Ok(more) => channels.extend(more),
                Err(err) => {
                    warn!(
                        crawler = %self.name,
                        file = %path.display(),
                        error = %err,
                        "cannot load channel file"
                    );
                }
            }
        }
        channels
    }
}

/// Builds crawlers from specs, memoizing live instances by name.
///
/// Repeated requests for the same logical crawler return the same
/// instance, so every bot registering listeners on "default" shares one
/// polling worker.
pub struct CrawlerFactory {
    source: Arc<dyn SourceClient>,
    specs: HashMap<String, CrawlerSpec>,
    crawlers: Mutex<HashMap<String, Arc<Crawler>>>,
}

impl CrawlerFactory {
    pub fn new(source: Arc<dyn SourceClient>, specs: Vec<CrawlerSpec>) -> Self {
        let specs = specs
            .into_iter()
            .map(|spec| (spec.name.clone(), spec))
            .collect();
        Self {
            source,
            specs,
            crawlers: Mutex::new(HashMap::new()),
        }
    }

    /// Get (or lazily build) the crawler for a logical name.
    ///
    /// Returns `None` when no spec is known for the name.
    pub fn get(&self, name: &str) -> Option<Arc<Crawler>> {
        let mut crawlers = self.crawlers.lock();
        if let Some(crawler) = crawlers.get(name) {
            return Some(Arc::clone(crawler));
        }

        let spec = self.specs.get(name)?;
        info!(crawler = name, "building crawler from spec");
        let crawler = Arc::new(Crawler::new(
            spec.name.clone(),
            Arc::clone(&self.source),
            spec.channels(),
            spec.listing_types.clone(),
            spec.limit,
            Duration::from_secs(spec.sleep_secs),
            spec.shuffle,
        ));
        crawlers.insert(name.to_string(), Arc::clone(&crawler));
        Some(crawler)
    }

    /// Names with a known spec, sorted.
    pub fn spec_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.specs.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;

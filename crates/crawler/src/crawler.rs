// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The polling/matching engine.

use crate::criteria::{same_listener, CrawlListener, MatchCriteria};
use bk_core::{Item, ItemId, ListingType, ShutdownSignal};
use bk_kernel::{Bot, Kernel, KernelError};
use bk_source::{SourceClient, SourceError};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// State guarded by the single crawler-wide lock.
///
/// The channel list lives here too: shuffling permutes it in place.
struct Registrations {
    channels: Vec<String>,
    listeners: Vec<Arc<dyn CrawlListener>>,
    criteria: Vec<Arc<dyn MatchCriteria>>,
}

/// A polling worker that scans channels and dispatches matches.
///
/// The crawl loop never holds the registration lock across listener
/// callbacks or source I/O: before evaluating criteria against an item
/// it copies the listener and criteria sequences under the lock, then
/// iterates only the copies. A listener that adds or removes
/// registrations from inside its own callback therefore cannot corrupt
/// an in-progress dispatch.
pub struct Crawler {
    name: String,
    source: Arc<dyn SourceClient>,
    listing_types: Vec<ListingType>,
    limit: usize,
    sleep: Duration,
    shuffle: bool,
    shutdown: ShutdownSignal,
    registrations: Mutex<Registrations>,
    // Change-detection cache: item id -> last observed reply count.
    // Never evicted; losing entries costs extra scans, never correctness.
    reply_counts: Mutex<HashMap<ItemId, u64>>,
}

impl Crawler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        source: Arc<dyn SourceClient>,
        channels: Vec<String>,
        listing_types: Vec<ListingType>,
        limit: usize,
        sleep: Duration,
        shuffle: bool,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            listing_types,
            limit,
            sleep,
            shuffle,
            shutdown: ShutdownSignal::new(),
            registrations: Mutex::new(Registrations {
                channels,
                listeners: Vec::new(),
                criteria: Vec::new(),
            }),
            reply_counts: Mutex::new(HashMap::new()),
        }
    }

    /// Register a listener. Registering the same instance twice is a
    /// no-op.
    pub fn add_listener(&self, listener: Arc<dyn CrawlListener>) {
        let mut registrations = self.registrations.lock();
        if registrations
            .listeners
            .iter()
            .any(|existing| same_listener(existing, &listener))
        {
            return;
        }
        registrations.listeners.push(listener);
    }

    /// Deregister a listener. Criteria referencing it stay behind but
    /// are skipped at dispatch time.
    pub fn remove_listener(&self, listener: &Arc<dyn CrawlListener>) {
        self.registrations
            .lock()
            .listeners
            .retain(|existing| !same_listener(existing, listener));
    }

    pub fn add_criteria(&self, criteria: Arc<dyn MatchCriteria>) {
        self.registrations.lock().criteria.push(criteria);
    }

    pub fn remove_criteria(&self, criteria: &Arc<dyn MatchCriteria>) {
        self.registrations
            .lock()
            .criteria
            .retain(|existing| !std::ptr::addr_eq(Arc::as_ptr(existing), Arc::as_ptr(criteria)));
    }

    pub fn listener_count(&self) -> usize {
        self.registrations.lock().listeners.len()
    }

    /// Is the channel in this crawler's scan list?
    pub fn contains_channel(&self, channel: &str) -> bool {
        self.registrations
            .lock()
            .channels
            .iter()
            .any(|c| c == channel)
    }

    /// Run one polling cycle: connect, scan every channel and listing
    /// type, dispatch matches. Called in a loop by [`Bot::run`]; public
    /// so tests and embedders can drive cycles synchronously.
    pub fn crawl_once(&self) {
        if let Err(err) = self.source.connect() {
            warn!(crawler = %self.name, error = %err, "cannot connect for crawl");
            return;
        }

        let channels = {
            let mut registrations = self.registrations.lock();
            if self.shuffle {
                // Randomized scan order reduces starvation bias across cycles.
                registrations.channels.shuffle(&mut rand::rng());
            }
            registrations.channels.clone()
        };

        // No listeners means no useful work this cycle.
        if self.registrations.lock().listeners.is_empty() {
            debug!(crawler = %self.name, "no listeners, skipping crawl");
            return;
        }

        info!(crawler = %self.name, channels = channels.len(), "starting crawl cycle");

        for channel in &channels {
            if self.shutdown.is_triggered() {
                return;
            }
            for listing in &self.listing_types {
                if self.shutdown.is_triggered() {
                    return;
                }
                match self.scan_listing(channel, *listing) {
                    Ok(()) => {}
                    Err(SourceError::RateLimited { retry_after }) => {
                        info!(
                            crawler = %self.name,
                            delay_s = retry_after.as_secs(),
                            "rate limited, backing off"
                        );
                        // The delay is mandatory; honor it exactly, then
                        // resume with the next listing type.
                        self.shutdown.wait_timeout(retry_after);
                    }
                    Err(err) => {
                        warn!(
                            crawler = %self.name,
                            channel,
                            %listing,
                            error = %err,
                            "crawl pass failed"
                        );
                    }
                }
            }
        }
    }

    fn scan_listing(&self, channel: &str, listing: ListingType) -> Result<(), SourceError> {
        let items = self.source.list_items(channel, listing, self.limit)?;
        debug!(crawler = %self.name, channel, %listing, items = items.len(), "checking listing");

        for item in &items {
            if self.shutdown.is_triggered() {
                return Ok(());
            }
            if !self.should_scan(item) {
                continue;
            }
            self.check_item(item);

            let replies = self.source.list_replies(item)?;
            self.check_reply_tree(&replies);
        }
        Ok(())
    }

    /// Change-detection gate. First sight records the reply count and
    /// scans; an unchanged count skips the item entirely; a changed
    /// count updates the cache and scans.
    fn should_scan(&self, item: &Item) -> bool {
        let mut counts = self.reply_counts.lock();
        match counts.entry(item.id.clone()) {
            Entry::Vacant(vacant) => {
                vacant.insert(item.reply_count);
                true
            }
            Entry::Occupied(mut occupied) => {
                if *occupied.get() == item.reply_count {
                    debug!(crawler = %self.name, item = %item.id, "no new replies, skipping");
                    false
                } else {
                    occupied.insert(item.reply_count);
                    true
                }
            }
        }
    }

    /// Evaluate all criteria against one item, dispatching matches.
    ///
    /// Snapshots the listener and criteria sequences under the lock,
    /// releases it, and iterates the copies. A criterion whose listener
    /// is absent from the listener snapshot is a silent no-op.
    fn check_item(&self, item: &Item) {
        let (listeners, criteria) = {
            let registrations = self.registrations.lock();
            (
                registrations.listeners.clone(),
                registrations.criteria.clone(),
            )
        };

        for criterion in &criteria {
            let listener = criterion.listener();
            let registered = listeners
                .iter()
                .any(|candidate| same_listener(candidate, &listener));
            if registered && criterion.matches(item) {
                debug!(crawler = %self.name, item = %item.id, "criteria match");
                listener.on_match(item);
            }
        }
    }

    /// Depth-first pre-order walk of a reply tree using an explicit
    /// work stack, so pathologically deep chains cannot overflow the
    /// call stack.
    fn check_reply_tree(&self, replies: &[Item]) {
        let mut stack: Vec<&Item> = replies.iter().rev().collect();
        while let Some(reply) = stack.pop() {
            if self.shutdown.is_triggered() {
                return;
            }
            self.check_item(reply);
            stack.extend(reply.replies.iter().rev());
        }
    }
}

impl Bot for Crawler {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&self, _kernel: &Arc<Kernel>) -> Result<(), KernelError> {
        Ok(())
    }

    fn run(&self) {
        info!(crawler = %self.name, "crawler running");
        loop {
            if self.shutdown.is_triggered() {
                info!(crawler = %self.name, "crawler shutting down");
                return;
            }
            self.crawl_once();
            if self.shutdown.wait_timeout(self.sleep) {
                info!(crawler = %self.name, "crawler shutting down");
                return;
            }
        }
    }

    fn shutdown(&self) {
        self.shutdown.trigger();
    }
}

#[cfg(test)]
#[path = "crawler_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The sample listener worker.
//!
//! Owns a dedicated crawler over a single channel and replies to any
//! item whose body contains the trigger phrase. Replies are dedup'd
//! through a persisted [`ReplyLog`] so re-scanned items are greeted at
//! most once.

use crate::ReplyLog;
use bk_core::{Item, ListingType, ShutdownSignal};
use bk_crawler::{BodyContains, CrawlListener, Crawler};
use bk_kernel::{Bot, Kernel, KernelError};
use bk_source::SourceClient;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Unique name of the greeter worker.
pub const GREETER_BOT: &str = "greeter";
/// Name of the greeter's dedicated crawler.
pub const GREETER_CRAWLER: &str = "greeter-crawler";

/// Phrase that triggers a greeting (matched case-insensitively).
const TRIGGER: &str = "greeterbot say hello";

const CRAWL_LIMIT: usize = 5;
const CRAWL_SLEEP: Duration = Duration::from_secs(60);

/// Replies to matched items, once each.
struct GreeterListener {
    source: Arc<dyn SourceClient>,
    replies: ReplyLog,
}

impl CrawlListener for GreeterListener {
    fn on_match(&self, item: &Item) {
        if item.author == self.source.username() {
            // Never greet our own posts; that way lies an infinite
            // conversation with ourselves.
            debug!(item = %item.id, "skipping own item");
            return;
        }
        if self.replies.contains(&item.id) {
            debug!(item = %item.id, "already greeted");
            return;
        }

        // Record before posting: a failed post is better than a
        // duplicate greeting on the next scan.
        if let Err(err) = self.replies.record(item.id.clone()) {
            warn!(item = %item.id, error = %err, "cannot record greeting");
        }
        info!(item = %item.id, author = %item.author, "greeting");
        let text = format!("Hello {} to you too!", item.author);
        if let Err(err) = self.source.post_reply(item, &text) {
            warn!(item = %item.id, error = %err, "greeting reply failed");
        }
    }
}

/// The greeter worker: wires its listener into a dedicated crawler and
/// then sits idle until shutdown, at which point it takes the crawler
/// down with it.
pub struct GreeterBot {
    source: Arc<dyn SourceClient>,
    channel: String,
    listener: Arc<GreeterListener>,
    crawler: Mutex<Option<Arc<Crawler>>>,
    kernel: Mutex<Weak<Kernel>>,
    shutdown: ShutdownSignal,
}

impl GreeterBot {
    pub fn new(
        source: Arc<dyn SourceClient>,
        channel: impl Into<String>,
        replies: ReplyLog,
    ) -> Self {
        let listener = Arc::new(GreeterListener {
            source: Arc::clone(&source),
            replies,
        });
        Self {
            source,
            channel: channel.into(),
            listener,
            crawler: Mutex::new(None),
            kernel: Mutex::new(Weak::new()),
            shutdown: ShutdownSignal::new(),
        }
    }
}

impl Bot for GreeterBot {
    fn name(&self) -> &str {
        GREETER_BOT
    }

    fn init(&self, kernel: &Arc<Kernel>) -> Result<(), KernelError> {
        *self.kernel.lock() = Arc::downgrade(kernel);

        let crawler = Arc::new(Crawler::new(
            GREETER_CRAWLER,
            Arc::clone(&self.source),
            vec![self.channel.clone()],
            vec![ListingType::Hot, ListingType::New],
            CRAWL_LIMIT,
            CRAWL_SLEEP,
            false,
        ));
        let listener = Arc::clone(&self.listener) as Arc<dyn CrawlListener>;
        crawler.add_listener(Arc::clone(&listener));
        crawler.add_criteria(Arc::new(BodyContains::new(TRIGGER, listener)));

        kernel.add_bot(Arc::clone(&crawler) as Arc<dyn Bot>)?;
        *self.crawler.lock() = Some(crawler);
        info!(channel = %self.channel, "greeter initialized");
        Ok(())
    }

    fn run(&self) {
        info!("greeter bot running");
        self.shutdown.wait();

        // Take the crawler down with us. During a whole-kernel shutdown
        // the registry is already drained and this is a no-op.
        if self.crawler.lock().take().is_some() {
            if let Some(kernel) = self.kernel.lock().upgrade() {
                if let Err(err) = kernel.stop_bot(GREETER_CRAWLER) {
                    error!(error = %err, "cannot stop greeter crawler");
                }
            }
        }
        info!("greeter bot stopped");
    }

    fn shutdown(&self) {
        self.shutdown.trigger();
    }
}

#[cfg(test)]
#[path = "greeter_tests.rs"]
mod tests;

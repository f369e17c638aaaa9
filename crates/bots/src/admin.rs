// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The administrative worker.
//!
//! Polls the source's control mailbox and drives the kernel: shutdown,
//! loading and stopping bots, registering and unregistering crawlers.
//! Handling is idempotent: every acted-on message is recorded in a
//! persisted [`ReplyLog`] before the (unreliable) upstream
//! acknowledgment, so re-delivered messages never re-execute.

use crate::ReplyLog;
use bk_core::{Command, Item, ShutdownSignal};
use bk_crawler::{CrawlerFactory, DEFAULT_CRAWLER};
use bk_kernel::{Bot, Kernel, KernelError};
use bk_source::{SourceClient, SourceError};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Unique name of the admin worker.
pub const ADMIN_BOT: &str = "admin";

/// The control-mailbox worker.
pub struct AdminBot {
    source: Arc<dyn SourceClient>,
    factory: Arc<CrawlerFactory>,
    /// Only this author (or the source account itself) may issue commands.
    owner: String,
    poll_limit: usize,
    sleep: Duration,
    replies: ReplyLog,
    kernel: Mutex<Weak<Kernel>>,
    shutdown: ShutdownSignal,
}

impl AdminBot {
    pub fn new(
        source: Arc<dyn SourceClient>,
        factory: Arc<CrawlerFactory>,
        owner: impl Into<String>,
        poll_limit: usize,
        sleep: Duration,
        replies: ReplyLog,
    ) -> Self {
        Self {
            source,
            factory,
            owner: owner.into(),
            poll_limit,
            sleep,
            replies,
            kernel: Mutex::new(Weak::new()),
            shutdown: ShutdownSignal::new(),
        }
    }

    /// One pass over the control mailbox. Called in a loop by
    /// [`Bot::run`]; public so tests can drive polls synchronously.
    pub fn poll_once(&self) -> Result<(), SourceError> {
        self.source.connect()?;
        let pending = self.source.list_pending(self.poll_limit)?;

        if pending.is_empty() {
            // Empty pending proves the source has caught up with every
            // past acknowledgment; the dedup record can be dropped.
            debug!("no pending control messages, clearing reply log");
            if let Err(err) = self.replies.clear() {
                warn!(error = %err, "cannot clear reply log");
            }
            return Ok(());
        }

        for message in &pending {
            if self.shutdown.is_triggered() {
                break;
            }
            self.handle_message(message);
        }
        Ok(())
    }

    fn handle_message(&self, message: &Item) {
        if !message.is_message() {
            debug!(item = %message.id, "ignoring non-message control item");
            return;
        }
        if message.author != self.owner && message.author != self.source.username() {
            debug!(item = %message.id, author = %message.author, "ignoring non-owner message");
            return;
        }

        if self.replies.contains(&message.id) {
            // Already handled; the upstream acknowledgment did not stick.
            info!(item = %message.id, "skipping already handled message");
            if let Err(err) = self.source.acknowledge(message) {
                warn!(item = %message.id, error = %err, "re-acknowledge failed");
            }
            return;
        }

        let Some(command) = Command::parse(message.body.trim()) else {
            debug!(item = %message.id, body = %message.body, "ignoring unrecognized command");
            return;
        };

        info!(item = %message.id, ?command, "executing command");
        match command {
            Command::Shutdown => {
                self.mark_handled(message);
                if let Some(kernel) = self.kernel() {
                    if let Err(err) = kernel.shutdown_all() {
                        error!(error = %err, "kernel shutdown reported failure");
                    }
                }
            }
            Command::LoadBot(identifier) => {
                self.reply_to(message, &format!("Loading bot {identifier}"));
                self.mark_handled(message);
                if let Some(kernel) = self.kernel() {
                    kernel.load_bot(&identifier);
                }
            }
            Command::StopBot(name) => {
                if name == self.name() {
                    info!("refusing request to stop the admin bot");
                    self.reply_to(message, "Not stopping admin bot");
                    self.mark_handled(message);
                    return;
                }
                self.reply_to(message, &format!("Stopping bot {name}"));
                self.mark_handled(message);
                if let Some(kernel) = self.kernel() {
                    if let Err(err) = kernel.stop_bot(&name) {
                        error!(bot = %name, error = %err, "stop failed");
                    }
                }
            }
            Command::AddCrawler(name) => {
                match self.factory.get(&name) {
                    Some(crawler) => {
                        if let Some(kernel) = self.kernel() {
                            if let Err(err) = kernel.add_bot(crawler) {
                                error!(crawler = %name, error = %err, "crawler start failed");
                            }
                        }
                    }
                    None => warn!(crawler = %name, "no spec for crawler"),
                }
                self.mark_handled(message);
            }
            Command::RemoveCrawler(name) => {
                self.mark_handled(message);
                if let Some(kernel) = self.kernel() {
                    if let Err(err) = kernel.stop_bot(&name) {
                        error!(crawler = %name, error = %err, "crawler stop failed");
                    }
                }
            }
        }
    }

    /// Record locally first, then acknowledge upstream. A crash between
    /// the two leaves the message marked handled, which is the safe
    /// side: re-delivery is skipped, not re-executed.
    fn mark_handled(&self, message: &Item) {
        if let Err(err) = self.replies.record(message.id.clone()) {
            warn!(item = %message.id, error = %err, "cannot record handled message");
        }
        if let Err(err) = self.source.acknowledge(message) {
            // Tolerable: the reply log already covers re-delivery.
            warn!(item = %message.id, error = %err, "acknowledge failed");
        }
    }

    fn reply_to(&self, message: &Item, text: &str) {
        if let Err(err) = self.source.post_reply(message, text) {
            warn!(item = %message.id, error = %err, "confirmation reply failed");
        }
    }

    fn kernel(&self) -> Option<Arc<Kernel>> {
        let kernel = self.kernel.lock().upgrade();
        if kernel.is_none() {
            warn!("kernel reference is gone");
        }
        kernel
    }
}

impl Bot for AdminBot {
    fn name(&self) -> &str {
        ADMIN_BOT
    }

    fn init(&self, kernel: &Arc<Kernel>) -> Result<(), KernelError> {
        *self.kernel.lock() = Arc::downgrade(kernel);

        // Register the shared default crawler, which any bot can use.
        match self.factory.get(DEFAULT_CRAWLER) {
            Some(crawler) => kernel.add_bot(crawler)?,
            None => warn!("no spec for the default crawler"),
        }
        Ok(())
    }

    fn run(&self) {
        info!("admin bot running");
        loop {
            if self.shutdown.is_triggered() {
                break;
            }
            if let Err(err) = self.poll_once() {
                warn!(error = %err, "control poll failed");
            }
            if self.shutdown.wait_timeout(self.sleep) {
                break;
            }
        }
        info!("admin bot stopped");
    }

    fn shutdown(&self) {
        self.shutdown.trigger();
    }
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;

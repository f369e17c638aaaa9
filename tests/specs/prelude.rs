//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use bk_core::{Item, ItemId, ItemKind};
use bk_crawler::CrawlListener;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX: Duration = Duration::from_secs(5);

pub fn submission(id: &str, author: &str, body: &str) -> Item {
    Item::new(id, ItemKind::Submission, author).with_body(body)
}

pub fn reply(id: &str, author: &str, body: &str) -> Item {
    Item::new(id, ItemKind::Reply, author).with_body(body)
}

pub fn message(id: &str, author: &str, body: &str) -> Item {
    Item::new(id, ItemKind::Message, author).with_body(body)
}

/// Poll a condition until it holds or the shared timeout elapses.
pub fn wait_until(mut ready: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < SPEC_WAIT_MAX {
        if ready() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS));
    }
    ready()
}

/// Listener that records the ids of matched items, in dispatch order.
#[derive(Default)]
pub struct Recorder {
    seen: Mutex<Vec<ItemId>>,
}

impl Recorder {
    pub fn seen(&self) -> Vec<ItemId> {
        self.seen.lock().clone()
    }

    pub fn seen_strs(&self) -> Vec<String> {
        self.seen.lock().iter().map(|id| id.to_string()).collect()
    }
}

impl CrawlListener for Recorder {
    fn on_match(&self, item: &Item) {
        self.seen.lock().push(item.id.clone());
    }
}

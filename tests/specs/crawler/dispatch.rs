//! Crawl/match/dispatch specs.
//!
//! Verify the end-to-end matching behavior: a trigger phrase is
//! dispatched exactly once, unchanged items are skipped on later
//! cycles, and matches buried deep in a reply tree are found.

use crate::prelude::*;
use bk_core::ListingType;
use bk_crawler::{BodyContains, CrawlListener, Crawler};
use bk_source::FakeSource;
use std::sync::Arc;
use std::time::Duration;

fn crawler(source: &FakeSource) -> Crawler {
    Crawler::new(
        "spec-crawler",
        Arc::new(source.clone()),
        vec!["sandbox".to_string()],
        vec![ListingType::Hot],
        25,
        Duration::from_secs(60),
        false,
    )
}

fn wire(crawler: &Crawler, needle: &str) -> Arc<Recorder> {
    let recorder = Arc::new(Recorder::default());
    let listener = Arc::clone(&recorder) as Arc<dyn CrawlListener>;
    crawler.add_listener(Arc::clone(&listener));
    crawler.add_criteria(Arc::new(BodyContains::new(needle, listener)));
    recorder
}

#[test]
fn trigger_phrase_is_dispatched_exactly_once() {
    let source = FakeSource::new();
    source.set_listing(
        "sandbox",
        ListingType::Hot,
        vec![
            submission("t3_1", "alice", "please say hello"),
            submission("t3_2", "bob", "nothing of note"),
        ],
    );

    let crawler = crawler(&source);
    let recorder = wire(&crawler, "say hello");

    crawler.crawl_once();
    assert_eq!(recorder.seen_strs(), vec!["t3_1"]);

    // Unchanged reply counts: the second cycle skips both items.
    crawler.crawl_once();
    assert_eq!(recorder.seen_strs(), vec!["t3_1"]);
}

#[test]
fn changed_reply_count_forces_a_rescan() {
    let source = FakeSource::new();
    source.set_listing(
        "sandbox",
        ListingType::Hot,
        vec![submission("t3_1", "alice", "quiet thread")],
    );

    let crawler = crawler(&source);
    let recorder = wire(&crawler, "say hello");
    crawler.crawl_once();
    assert!(recorder.seen().is_empty());

    // A new reply arrives; the submission's count changes.
    source.set_listing(
        "sandbox",
        ListingType::Hot,
        vec![submission("t3_1", "alice", "quiet thread")
            .with_reply_count(1)
            .with_replies(vec![reply("t1_1", "carol", "say hello everyone")])],
    );
    crawler.crawl_once();
    assert_eq!(recorder.seen_strs(), vec!["t1_1"]);
}

#[test]
fn deeply_nested_reply_is_the_only_dispatch() {
    let source = FakeSource::new();
    let tree = submission("t3_1", "alice", "root post")
        .with_reply_count(3)
        .with_replies(vec![
            reply("t1_a", "bob", "first level").with_replies(vec![
                reply("t1_b", "carol", "second level")
                    .with_replies(vec![reply("t1_c", "dave", "deep down: say hello")]),
            ]),
            reply("t1_d", "erin", "unrelated sibling"),
        ]);
    source.set_listing("sandbox", ListingType::Hot, vec![tree]);

    let crawler = crawler(&source);
    let recorder = wire(&crawler, "say hello");
    crawler.crawl_once();

    assert_eq!(recorder.seen_strs(), vec!["t1_c"]);
}

#[test]
fn reply_tree_is_walked_in_preorder() {
    let source = FakeSource::new();
    let tree = submission("t3_1", "alice", "say hello root")
        .with_reply_count(4)
        .with_replies(vec![
            reply("t1_a", "bob", "say hello a")
                .with_replies(vec![reply("t1_a1", "carol", "say hello a1")]),
            reply("t1_b", "dave", "say hello b"),
        ]);
    source.set_listing("sandbox", ListingType::Hot, vec![tree]);

    let crawler = crawler(&source);
    let recorder = wire(&crawler, "say hello");
    crawler.crawl_once();

    assert_eq!(recorder.seen_strs(), vec!["t3_1", "t1_a", "t1_a1", "t1_b"]);
}

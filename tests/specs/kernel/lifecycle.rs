//! Worker lifecycle specs.
//!
//! Real crawler workers on real threads, driven through the kernel.

use crate::prelude::*;
use bk_core::ListingType;
use bk_crawler::{CrawlerFactory, CrawlerSpec};
use bk_kernel::{Bot, BotRegistry, Kernel};
use bk_source::FakeSource;
use std::sync::Arc;
use std::thread;

fn spec(name: &str) -> CrawlerSpec {
    CrawlerSpec {
        name: name.to_string(),
        channels: vec!["sandbox".to_string()],
        channels_file: None,
        count: 10,
        listing_types: vec![ListingType::Hot],
        limit: 10,
        sleep_secs: 60,
        shuffle: false,
    }
}

fn factory(source: &FakeSource, names: &[&str]) -> CrawlerFactory {
    CrawlerFactory::new(
        Arc::new(source.clone()),
        names.iter().map(|name| spec(name)).collect(),
    )
}

#[test]
fn workers_start_and_stop_through_the_kernel() {
    let source = FakeSource::new();
    let factory = factory(&source, &["one", "two"]);
    let kernel = Arc::new(Kernel::new(BotRegistry::new()));

    kernel.add_bot(factory.get("one").unwrap()).unwrap();
    kernel.add_bot(factory.get("two").unwrap()).unwrap();
    assert_eq!(kernel.worker_names(), vec!["one", "two"]);

    // Stop is synchronous: the worker is gone when the call returns.
    kernel.stop_bot("one").unwrap();
    assert_eq!(kernel.worker_names(), vec!["two"]);

    kernel.shutdown_all().unwrap();
    assert_eq!(kernel.worker_count(), 0);
}

#[test]
fn adding_the_same_worker_twice_is_a_no_op() {
    let source = FakeSource::new();
    let factory = factory(&source, &["one"]);
    let kernel = Arc::new(Kernel::new(BotRegistry::new()));

    let crawler = factory.get("one").unwrap();
    kernel.add_bot(Arc::clone(&crawler) as Arc<dyn Bot>).unwrap();
    kernel.add_bot(crawler).unwrap();
    assert_eq!(kernel.worker_count(), 1);

    kernel.shutdown_all().unwrap();
}

#[test]
fn shutdown_wakes_blocked_waiters() {
    let source = FakeSource::new();
    let factory = factory(&source, &["one"]);
    let kernel = Arc::new(Kernel::new(BotRegistry::new()));
    kernel.add_bot(factory.get("one").unwrap()).unwrap();

    let waiter = {
        let kernel = Arc::clone(&kernel);
        thread::spawn(move || kernel.wait_for_shutdown())
    };
    assert!(!waiter.is_finished());

    kernel.shutdown_all().unwrap();
    assert!(wait_until(|| waiter.is_finished()), "waiter still blocked");
    waiter.join().unwrap();
}

//! Admin control-mailbox specs.
//!
//! An owner drives the whole system through private messages: crawlers
//! come and go, the greeter is stopped by name, and `shutdown` takes
//! everything down.

use crate::prelude::*;
use bk_bots::{AdminBot, GreeterBot, ReplyLog, ADMIN_BOT, GREETER_BOT, GREETER_CRAWLER};
use bk_core::ListingType;
use bk_crawler::{CrawlerFactory, CrawlerSpec, DEFAULT_CRAWLER};
use bk_kernel::{Bot, BotRegistry, Kernel};
use bk_source::FakeSource;
use std::sync::Arc;
use std::time::Duration;

fn crawler_spec(name: &str) -> CrawlerSpec {
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

struct Fixture {
    source: FakeSource,
    admin: Arc<AdminBot>,
    kernel: Arc<Kernel>,
    _dir: tempfile::TempDir,
}

/// A full deployment: admin and greeter in the registry, the admin
/// initialized (which registers the default crawler).
fn deployment() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let source = FakeSource::new();
    let shared: Arc<dyn bk_source::SourceClient> = Arc::new(source.clone());
    let factory = Arc::new(CrawlerFactory::new(
        Arc::clone(&shared),
        vec![crawler_spec(DEFAULT_CRAWLER), crawler_spec("extra")],
    ));

    let admin = Arc::new(AdminBot::new(
        Arc::clone(&shared),
        Arc::clone(&factory),
        "alice",
        25,
        Duration::from_millis(10),
        ReplyLog::open(dir.path().join("admin.replies.json")).unwrap(),
    ));
    let greeter = Arc::new(GreeterBot::new(
        Arc::clone(&shared),
        "sandbox",
        ReplyLog::open(dir.path().join("greeter.replies.json")).unwrap(),
    ));

    let mut bot_types = BotRegistry::new();
    {
        let admin = Arc::clone(&admin);
        bot_types.register(ADMIN_BOT, move || Arc::clone(&admin) as Arc<dyn Bot>);
    }
    {
        let greeter = Arc::clone(&greeter);
        bot_types.register(GREETER_BOT, move || Arc::clone(&greeter) as Arc<dyn Bot>);
    }

    let kernel = Arc::new(Kernel::new(bot_types));
    admin.init(&kernel).unwrap();

    Fixture {
        source,
        admin,
        kernel,
        _dir: dir,
    }
}

#[test]
fn owner_reshapes_the_crawler_fleet_by_mail() {
    let fx = deployment();
    assert!(fx.kernel.is_registered(DEFAULT_CRAWLER));

    fx.source.set_pending(vec![
        message("t4_1", "alice", "addcrawler extra"),
        message("t4_2", "alice", "removecrawler default"),
    ]);
    fx.admin.poll_once().unwrap();

    assert!(fx.kernel.is_registered("extra"));
    assert!(!fx.kernel.is_registered(DEFAULT_CRAWLER));
    fx.kernel.shutdown_all().unwrap();
}

#[test]
fn stopbot_takes_down_the_greeter_and_its_crawler() {
    let fx = deployment();
    fx.kernel.load_bot(GREETER_BOT);
    assert!(fx.kernel.is_registered(GREETER_BOT));
    assert!(fx.kernel.is_registered(GREETER_CRAWLER));

    fx.source
        .set_pending(vec![message("t4_1", "alice", "stopbot greeter")]);
    fx.admin.poll_once().unwrap();

    assert!(!fx.kernel.is_registered(GREETER_BOT));
    assert!(!fx.kernel.is_registered(GREETER_CRAWLER));

    let confirmations = fx.source.replies();
    assert_eq!(confirmations.len(), 1);
    assert_eq!(confirmations[0].1, "Stopping bot greeter");
    fx.kernel.shutdown_all().unwrap();
}

#[test]
fn shutdown_command_takes_down_the_whole_deployment() {
    let fx = deployment();
    fx.kernel.load_bot(GREETER_BOT);
    fx.kernel.load_bot(ADMIN_BOT);
    assert_eq!(fx.kernel.worker_count(), 4);

    fx.source
        .set_pending(vec![message("t4_1", "alice", "shutdown")]);

    // The admin runs as a worker here; its own poll loop executes the
    // command and the kernel must survive the reentrant shutdown.
    assert!(
        wait_until(|| fx.kernel.worker_count() == 0),
        "workers still registered"
    );
    fx.kernel.wait_for_shutdown();
}

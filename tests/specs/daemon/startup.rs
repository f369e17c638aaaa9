//! Daemon end-to-end specs.
//!
//! Run the real daemon against a file-backed source fixture and drive
//! it to shutdown through the control mailbox.

use crate::prelude::*;
use bk_daemon::Config;
use std::fs;
use std::path::Path;
use std::thread;

const PENDING_SHUTDOWN: &str = r#"[{"id": "t4_quit", "kind": "message", "author": "alice", "body": "shutdown"}]"#;

const HOT_WITH_TRIGGER: &str = r#"[{"id": "t3_1", "kind": "submission", "author": "bob", "body": "hey greeterbot say hello"}]"#;

fn write_config(dir: &Path) -> Config {
    let text = format!(
        r#"
[daemon]
state_dir = "{state}"

[source]
root = "{root}"
username = "kernelbot"

[admin]
owner = "alice"
poll_limit = 25
sleep_secs = 1

[greeter]
channel = "sandbox"

[[crawlers]]
name = "default"
channels = ["sandbox"]
limit = 10
sleep_secs = 1

[startup]
bots = ["admin", "greeter"]
"#,
        state = dir.join("state").display(),
        root = dir.join("source").display(),
    );
    let path = dir.join("botkernel.toml");
    fs::write(&path, text).unwrap();
    Config::load(&path).unwrap()
}

// Atomic so the daemon never reads a half-written mailbox.
fn write_pending(root: &Path, json: &str) {
    let tmp = root.join("pending.tmp");
    fs::write(&tmp, json).unwrap();
    fs::rename(tmp, root.join("pending.json")).unwrap();
}

#[test]
fn daemon_runs_until_the_owner_says_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("source");
    fs::create_dir_all(&root).unwrap();
    write_pending(&root, PENDING_SHUTDOWN);

    let config = write_config(dir.path());
    let lock_path = config.lock_path();
    let daemon = thread::spawn(move || bk_daemon::run(&config));

    assert!(wait_until(|| daemon.is_finished()), "daemon still running");
    daemon.join().unwrap().unwrap();

    // The shutdown message was acknowledged and the pid lock removed.
    let acked = fs::read_to_string(root.join("acked.json")).unwrap();
    assert!(acked.contains("t4_quit"));
    assert!(!lock_path.exists());
}

#[test]
fn greeter_replies_before_the_daemon_is_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("source");
    fs::create_dir_all(root.join("channels").join("sandbox")).unwrap();
    fs::write(root.join("channels/sandbox/hot.json"), HOT_WITH_TRIGGER).unwrap();

    let config = write_config(dir.path());
    let daemon = thread::spawn(move || bk_daemon::run(&config));

    // The greeter's crawler finds the trigger and posts to the outbox.
    let outbox = root.join("outbox.jsonl");
    assert!(
        wait_until(|| outbox.exists()),
        "greeter never posted a reply"
    );
    let posted = fs::read_to_string(&outbox).unwrap();
    assert!(posted.contains("Hello bob to you too!"));

    // Now tell the daemon to stop.
    write_pending(&root, PENDING_SHUTDOWN);
    assert!(wait_until(|| daemon.is_finished()), "daemon still running");
    daemon.join().unwrap().unwrap();
}

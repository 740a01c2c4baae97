#![allow(dead_code)]

pub use composer_bridge_test_utils::builders;
pub use composer_bridge_test_utils::fake_launcher::{FakeLauncher, RecordedLaunch, Reply};
pub use composer_bridge_test_utils::{init_tracing, with_timeout};

use std::sync::{Arc, Mutex};

use composer_bridge::client::ComposerClient;
use composer_bridge::lifecycle::Subscription;

pub fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Collect everything a client writes to its output log.
pub fn capture_output(client: &ComposerClient) -> (Arc<Mutex<Vec<String>>>, Subscription<String>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let subscription = client.on_output(move |text: &String| sink.lock().unwrap().push(text.clone()));
    (lines, subscription)
}

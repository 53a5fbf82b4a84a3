#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use confwatch::manager::{ConfigManager, ManagerOptions};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Debounce window used by watcher tests.
pub const TEST_DEBOUNCE: Duration = Duration::from_millis(50);

/// How long to wait for a notification that should arrive.
pub const EVENT_LIMIT: Duration = Duration::from_secs(3);

/// How long to keep listening when asserting that nothing (more) arrives.
pub const QUIET_PERIOD: Duration = Duration::from_millis(400);

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn test_manager() -> ConfigManager {
    ConfigManager::with_options(ManagerOptions {
        debounce: TEST_DEBOUNCE,
    })
}

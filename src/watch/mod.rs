// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`) on the config
//!   file's directory.
//! - Filtering raw events down to the one file we care about.
//! - Coalescing bursts of events (an editor save can fire several) into a
//!   single reload signal.
//!
//! It does **not** parse or diff anything; the manager turns debounced
//! signals into reloads.

pub mod debounce;
pub mod watcher;

pub use debounce::{DEFAULT_DEBOUNCE, next_burst};
pub use watcher::{WatchTarget, WatcherHandle, spawn_watcher};

// src/watch/watcher.rs

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::errors::{ConfwatchError, Result};

/// The file being watched, split into the directory we subscribe to and the
/// file name events are filtered by.
///
/// Watching the directory rather than the file keeps the subscription alive
/// when an editor saves by writing a temp file and renaming it over the
/// original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    dir: PathBuf,
    file_name: OsString,
}

impl WatchTarget {
    pub fn for_file(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .ok_or_else(|| ConfwatchError::watch_setup(path, "path has no file name"))?
            .to_os_string();

        // A bare "config.yaml" has an empty parent; watch the working dir.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let dir = dir.canonicalize().unwrap_or(dir);

        Ok(Self { dir, file_name })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(&self) -> &OsString {
        &self.file_name
    }

    /// Whether a raw notify event concerns the target file.
    ///
    /// Access events (open/close/read) never change content and are ignored.
    pub fn matches(&self, event: &Event) -> bool {
        if event.kind.is_access() {
            return false;
        }
        event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(self.file_name.as_os_str()))
    }
}

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping it ends the
/// subscription and closes the event channel.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Subscribe to the target's directory (non-recursively) and forward every
/// raw event into `event_tx`.
///
/// Filtering and debouncing happen on the receiving side.
pub fn spawn_watcher(
    target: &WatchTarget,
    event_tx: mpsc::UnboundedSender<Event>,
) -> Result<WatcherHandle> {
    // Called synchronously on notify's own thread.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                // The receiver is gone once the subscription is torn down.
                let _ = event_tx.send(event);
            }
            Err(err) => {
                warn!(error = %err, "file watch error");
            }
        },
        Config::default(),
    )
    .map_err(|e| ConfwatchError::watch_setup(&target.dir, e))?;

    watcher
        .watch(&target.dir, RecursiveMode::NonRecursive)
        .map_err(|e| ConfwatchError::watch_setup(&target.dir, e))?;

    info!(dir = ?target.dir, file = ?target.file_name, "file watcher started");

    Ok(WatcherHandle { _inner: watcher })
}

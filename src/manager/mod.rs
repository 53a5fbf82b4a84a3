// src/manager/mod.rs

//! The configuration manager.
//!
//! ```text
//! load_config(path) ──► parse ──► validate ──► last known good
//!
//! start_watching(path, listener)
//!     notify (parent dir) ──► filter by file name ──► debounce
//!         ──► parse ──► validate
//!               ok:  diff vs last known good ──► (empty? drop) ──► replace ──► on_config_changed
//!               err: keep last known good ──► on_config_error
//! ```
//!
//! One worker task per subscription performs debouncing, reloading and
//! delivery, so listener calls are serial and in completion order. The file
//! itself is read on tokio's blocking pool.
//!
//! `stop_watching` bumps a generation counter and then takes the delivery
//! lock once. A worker only touches state or calls the listener while holding
//! that lock and only if its generation is still current, so nothing is
//! delivered once `stop_watching` has returned.

pub mod listener;

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use notify::Event;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tracing::{debug, info, warn};

use crate::config::fields::{FieldPath, FieldValue, lookup};
use crate::config::{ConfigModel, load_and_validate, validate};
use crate::diff::{self, DiffModel, InitialDiff};
use crate::errors::{ConfwatchError, Result};
use crate::watch::{DEFAULT_DEBOUNCE, WatchTarget, WatcherHandle, next_burst, spawn_watcher};

pub use listener::{ChangeEvent, ConfigEvent, ConfigListener, Subscribers};

/// Tunables for a [`ConfigManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Quiet period that closes a burst of file events.
    pub debounce: Duration,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Watching,
}

/// Loads, validates and watches one configuration file.
///
/// Holds the last known good [`ConfigModel`]; failed loads and reloads never
/// replace it. At most one watch subscription is active at a time: a second
/// [`start_watching`](Self::start_watching) is rejected with
/// [`ConfwatchError::AlreadyWatching`].
pub struct ConfigManager {
    options: ManagerOptions,
    shared: Arc<Shared>,
    subscription: Mutex<Option<WatchSubscription>>,
}

/// State shared with the worker task.
#[derive(Debug, Default)]
struct Shared {
    last_good: Mutex<Option<Arc<ConfigModel>>>,
    /// Generation of the active subscription; bumped on start and stop.
    generation: AtomicU64,
    /// Held while a worker mutates `last_good` and calls its listener.
    delivery: Mutex<()>,
    next_seq: AtomicU64,
}

/// One active file watch.
struct WatchSubscription {
    path: PathBuf,
    _watcher: WatcherHandle,
    worker: JoinHandle<()>,
}

thread_local! {
    /// The manager whose listener is running on this thread, if any.
    static DELIVERING: Cell<*const Shared> = const { Cell::new(std::ptr::null()) };
}

/// Marks the current thread as running a listener callback for one manager.
struct DeliveryScope {
    previous: *const Shared,
}

impl DeliveryScope {
    fn enter(shared: &Arc<Shared>) -> Self {
        let previous = DELIVERING.with(|cell| cell.replace(Arc::as_ptr(shared)));
        DeliveryScope { previous }
    }

    /// Whether this thread is inside a callback of the manager owning `shared`.
    fn is_active_for(shared: &Arc<Shared>) -> bool {
        DELIVERING.with(|cell| std::ptr::eq(cell.get(), Arc::as_ptr(shared)))
    }
}

impl Drop for DeliveryScope {
    fn drop(&mut self) {
        DELIVERING.with(|cell| cell.set(self.previous));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_options(ManagerOptions::default())
    }

    pub fn with_options(options: ManagerOptions) -> Self {
        Self {
            options,
            shared: Arc::new(Shared::default()),
            subscription: Mutex::new(None),
        }
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    /// Read, parse and validate `path`, replacing the last known good
    /// configuration on success.
    ///
    /// This is a direct read: no listener is notified. On failure the
    /// previous configuration stays in place.
    pub fn load_config(&self, path: impl AsRef<Path>) -> Result<Arc<ConfigModel>> {
        let path = path.as_ref();
        let model = Arc::new(load_and_validate(path)?);
        *lock(&self.shared.last_good) = Some(Arc::clone(&model));
        info!(?path, "configuration loaded");
        Ok(model)
    }

    /// Start watching `path` for changes, reporting reload outcomes to
    /// `listener`.
    ///
    /// Must be called from within a tokio runtime; the worker is spawned on
    /// it and this call returns immediately.
    pub fn start_watching(
        &self,
        path: impl AsRef<Path>,
        listener: impl ConfigListener,
    ) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        let mut subscription = lock(&self.subscription);

        if let Some(active) = subscription.as_ref() {
            return Err(ConfwatchError::AlreadyWatching {
                path: active.path.clone(),
            });
        }

        let runtime = Handle::try_current().map_err(|e| ConfwatchError::watch_setup(&path, e))?;
        let target = WatchTarget::for_file(&path)?;

        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
        let watcher = spawn_watcher(&target, event_tx)?;

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let worker = ReloadWorker {
            shared: Arc::clone(&self.shared),
            path: path.clone(),
            target,
            generation,
            debounce: self.options.debounce,
            listener: Arc::new(listener),
        };
        let worker = runtime.spawn(worker.run(event_rx));

        info!(?path, generation, "watching configuration file");
        *subscription = Some(WatchSubscription {
            path,
            _watcher: watcher,
            worker,
        });
        Ok(())
    }

    /// Cancel the active subscription, if any.
    ///
    /// Idempotent. Once this returns no further listener call is made for the
    /// cancelled subscription, including for events already in flight. May be
    /// called from inside a listener callback.
    pub fn stop_watching(&self) {
        let Some(subscription) = lock(&self.subscription).take() else {
            return;
        };

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst);
        subscription.worker.abort();
        let path = subscription.path.clone();
        drop(subscription);

        // Wait out a delivery in progress on another thread. From inside one
        // of this manager's callbacks the lock is already held by this thread.
        if !DeliveryScope::is_active_for(&self.shared) {
            drop(lock(&self.shared.delivery));
        }

        info!(?path, generation, "stopped watching configuration file");
    }

    pub fn state(&self) -> WatchState {
        if lock(&self.subscription).is_some() {
            WatchState::Watching
        } else {
            WatchState::Idle
        }
    }

    pub fn watched_path(&self) -> Option<PathBuf> {
        lock(&self.subscription).as_ref().map(|s| s.path.clone())
    }

    /// Snapshot of the last known good configuration.
    pub fn current(&self) -> Option<Arc<ConfigModel>> {
        lock(&self.shared.last_good).clone()
    }

    /// Value of a leaf in the last known good configuration, by field path
    /// (`settingsLanguage`, `settings.language` or `settings-language`).
    ///
    /// `None` if the field is unset, nothing has loaded yet, or the path is
    /// unknown.
    pub fn get_field_value(&self, field_path: &str) -> Option<FieldValue> {
        let spec = lookup(field_path)?;
        self.current().and_then(|config| spec.read(&config))
    }

    pub fn field_value(&self, field: FieldPath) -> Option<FieldValue> {
        self.current().and_then(|config| field.spec().read(&config))
    }

    pub fn is_field_changed(&self, diff: Option<&DiffModel>, field_path: &str) -> bool {
        diff::is_field_changed(diff, field_path)
    }

    pub fn has_any_change(&self, diff: &DiffModel) -> bool {
        diff::has_any_change(diff)
    }

    pub fn is_valid_config(&self, config: &ConfigModel) -> bool {
        validate(config).is_ok()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManager")
            .field("options", &self.options)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Drop for ConfigManager {
    fn drop(&mut self) {
        self.stop_watching();
    }
}

/// Background side of one subscription.
struct ReloadWorker {
    shared: Arc<Shared>,
    path: PathBuf,
    target: WatchTarget,
    generation: u64,
    debounce: Duration,
    listener: Arc<dyn ConfigListener>,
}

impl ReloadWorker {
    async fn run(self, mut events: mpsc::UnboundedReceiver<Event>) {
        loop {
            let burst = next_burst(&mut events, self.debounce, |event| {
                debug!(?event, "received notify event");
                self.target.matches(event)
            })
            .await;

            let Some(coalesced) = burst else {
                break;
            };

            debug!(path = ?self.path, coalesced, "change burst settled; reloading");
            let path = self.path.clone();
            let outcome = match task::spawn_blocking(move || load_and_validate(path)).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(error = %err, "reload task did not complete");
                    break;
                }
            };
            self.apply(outcome);
        }
        debug!(generation = self.generation, "watch event loop finished");
    }

    fn is_current(&self) -> bool {
        self.shared.generation.load(Ordering::SeqCst) == self.generation
    }

    fn next_seq(&self) -> u64 {
        self.shared.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn apply(&self, outcome: Result<ConfigModel>) {
        let _delivery = lock(&self.shared.delivery);
        if !self.is_current() {
            debug!(generation = self.generation, "subscription cancelled; discarding reload");
            return;
        }

        match outcome {
            Ok(model) => {
                let Some(event) = self.accept(model) else {
                    debug!(path = ?self.path, "reloaded configuration has no changes");
                    return;
                };
                let changed: Vec<_> = event.diff.changed_fields().map(FieldPath::name).collect();
                info!(seq = event.seq, ?changed, "configuration changed");

                let _scope = DeliveryScope::enter(&self.shared);
                self.listener.on_config_changed(&event);
            }
            Err(err) => {
                let seq = self.next_seq();
                warn!(seq, error = %err, "reload failed; keeping last known good configuration");

                let _scope = DeliveryScope::enter(&self.shared);
                self.listener.on_config_error(seq, &err);
            }
        }
    }

    /// Diff against the last known good model and replace it if anything
    /// changed.
    fn accept(&self, model: ConfigModel) -> Option<ChangeEvent> {
        let mut last_good = lock(&self.shared.last_good);

        // Nothing accepted yet: report every present field so the listener
        // still learns about the first valid document.
        let policy = match last_good.as_ref() {
            Some(_) => InitialDiff::Empty,
            None => InitialDiff::AllFields,
        };
        let diff = diff::diff(last_good.as_deref(), &model, policy);
        if !diff::has_any_change(&diff) {
            return None;
        }

        let config = Arc::new(model);
        *last_good = Some(Arc::clone(&config));
        Some(ChangeEvent {
            seq: self.next_seq(),
            config,
            diff,
        })
    }
}

// src/manager/listener.rs

//! Notification boundary between the manager and its subscribers.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::config::ConfigModel;
use crate::diff::DiffModel;
use crate::errors::ConfwatchError;

/// An accepted configuration together with what changed.
///
/// `seq` comes from a per-manager counter shared with error notifications and
/// strictly increases in delivery order.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub seq: u64,
    pub config: Arc<ConfigModel>,
    pub diff: DiffModel,
}

/// Receives the outcome of watch-triggered reloads.
///
/// For each completed reload exactly one method is called, except when the
/// reloaded document has no observable change, in which case neither is.
/// Calls for one manager never overlap and arrive in completion order.
pub trait ConfigListener: Send + Sync + 'static {
    fn on_config_changed(&self, event: &ChangeEvent);

    /// The last known good configuration is still in place.
    fn on_config_error(&self, seq: u64, error: &ConfwatchError);
}

impl<L: ConfigListener + ?Sized> ConfigListener for Arc<L> {
    fn on_config_changed(&self, event: &ChangeEvent) {
        (**self).on_config_changed(event)
    }

    fn on_config_error(&self, seq: u64, error: &ConfwatchError) {
        (**self).on_config_error(seq, error)
    }
}

/// Owned form of a notification, for channel delivery.
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    Changed(ChangeEvent),
    Failed { seq: u64, error: ConfwatchError },
}

impl ConfigEvent {
    pub fn seq(&self) -> u64 {
        match self {
            ConfigEvent::Changed(event) => event.seq,
            ConfigEvent::Failed { seq, .. } => *seq,
        }
    }
}

/// Forward notifications into a channel so the receiving side decides on
/// which task or thread to handle them.
impl ConfigListener for mpsc::UnboundedSender<ConfigEvent> {
    fn on_config_changed(&self, event: &ChangeEvent) {
        if self.send(ConfigEvent::Changed(event.clone())).is_err() {
            debug!(seq = event.seq, "config event receiver dropped");
        }
    }

    fn on_config_error(&self, seq: u64, error: &ConfwatchError) {
        let event = ConfigEvent::Failed {
            seq,
            error: error.clone(),
        };
        if self.send(event).is_err() {
            debug!(seq, "config event receiver dropped");
        }
    }
}

/// Fan a single subscription out to several listeners, in registration
/// order.
#[derive(Default, Clone)]
pub struct Subscribers {
    listeners: Vec<Arc<dyn ConfigListener>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, listener: impl ConfigListener) -> Self {
        self.push(listener);
        self
    }

    pub fn push(&mut self, listener: impl ConfigListener) {
        self.listeners.push(Arc::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.listeners.len())
            .finish()
    }
}

impl ConfigListener for Subscribers {
    fn on_config_changed(&self, event: &ChangeEvent) {
        for listener in &self.listeners {
            listener.on_config_changed(event);
        }
    }

    fn on_config_error(&self, seq: u64, error: &ConfwatchError) {
        for listener in &self.listeners {
            listener.on_config_error(seq, error);
        }
    }
}

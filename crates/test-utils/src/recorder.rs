use std::sync::{Arc, Mutex};
use std::time::Duration;

use confwatch::errors::ConfwatchError;
use confwatch::manager::{ChangeEvent, ConfigEvent, ConfigListener};

/// A listener that records every notification it receives.
///
/// Clones share the same record, so one clone can be handed to the manager
/// and the other kept for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<ConfigEvent>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ConfigEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn changes(&self) -> Vec<ChangeEvent> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ConfigEvent::Changed(change) => Some(change),
                ConfigEvent::Failed { .. } => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<ConfwatchError> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ConfigEvent::Failed { error, .. } => Some(error),
                ConfigEvent::Changed(_) => None,
            })
            .collect()
    }

    /// Poll until at least `count` events were recorded or `limit` elapses.
    /// Returns whatever was recorded by then.
    pub async fn wait_for(&self, count: usize, limit: Duration) -> Vec<ConfigEvent> {
        let deadline = tokio::time::Instant::now() + limit;
        while self.len() < count && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.events()
    }
}

impl ConfigListener for RecordingListener {
    fn on_config_changed(&self, event: &ChangeEvent) {
        self.events
            .lock()
            .unwrap()
            .push(ConfigEvent::Changed(event.clone()));
    }

    fn on_config_error(&self, seq: u64, error: &ConfwatchError) {
        self.events.lock().unwrap().push(ConfigEvent::Failed {
            seq,
            error: error.clone(),
        });
    }
}

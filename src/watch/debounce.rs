// src/watch/debounce.rs

//! Trailing-edge debouncing of raw filesystem events.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};
use tracing::trace;

/// Default quiet period before a burst of events turns into a reload.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Wait for the next burst of relevant events and return once no relevant
/// event has arrived for `window`.
///
/// Returns the number of relevant events coalesced into the burst, or
/// `None` once the channel is closed. Irrelevant events are consumed without
/// extending the window.
pub async fn next_burst<T>(
    rx: &mut mpsc::UnboundedReceiver<T>,
    window: Duration,
    is_relevant: impl Fn(&T) -> bool,
) -> Option<usize> {
    loop {
        let event = rx.recv().await?;
        if is_relevant(&event) {
            break;
        }
    }

    let mut coalesced = 1;
    let mut deadline = Instant::now() + window;
    loop {
        match timeout_at(deadline, rx.recv()).await {
            Ok(Some(event)) => {
                if is_relevant(&event) {
                    coalesced += 1;
                    deadline = Instant::now() + window;
                    trace!(coalesced, "event inside debounce window");
                }
            }
            Ok(None) => return None,
            Err(_elapsed) => return Some(coalesced),
        }
    }
}

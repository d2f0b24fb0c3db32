//! Cancellable repeating task that drives the progress ramp.

use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle, time};

use super::progress::TICK_INTERVAL_MS;

/// One tick, stamped with the submission attempt it belongs to so stale
/// ticks queued across a terminal transition can be discarded.
#[derive(Clone, Copy, Debug)]
pub struct Tick {
    pub generation: u64,
}

/// Handle to the spawned tick task. Dropping it aborts the task, which is
/// how the controller stops the ticker on every terminal transition.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a task that emits one `Tick` per interval until aborted or
    /// until the receiving side goes away.
    pub fn spawn(tx: mpsc::Sender<Tick>, generation: u64) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_millis(TICK_INTERVAL_MS));
            // The first interval tick completes immediately; skip it so the
            // bar first moves one full interval after submission.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).await.is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

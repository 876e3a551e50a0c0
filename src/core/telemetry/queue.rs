//! Hand-off from producers to the dashboard loop.

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::{mpsc, oneshot};

/// A value travelling to the dashboard loop. `ack` is answered once the loop
/// has taken the value, which is what makes `set` a rendezvous.
#[derive(Debug)]
pub struct QueuedSample {
    pub name: String,
    pub value: f64,
    pub ack: Option<oneshot::Sender<()>>,
}

/// Producer side of the sample queue.
///
/// Cloning is cheap; every clone feeds the same loop. A disabled sender (no
/// loop behind it) turns every call into a no-op, and so does a sender whose
/// loop has shut down.
#[derive(Debug, Clone, Default)]
pub struct SampleSender {
    tx: Option<mpsc::Sender<QueuedSample>>,
}

impl SampleSender {
    /// Create a sender/receiver pair holding at most one queued sample.
    pub fn channel() -> (Self, mpsc::Receiver<QueuedSample>) {
        let (tx, rx) = mpsc::channel(1);
        (Self { tx: Some(tx) }, rx)
    }

    /// A sender with no consumer behind it.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// True while a loop may still accept samples.
    pub fn is_enabled(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Report `value` for metric `name`, blocking until the loop accepts it.
    ///
    /// On a multi-thread runtime worker the wait runs under
    /// [`tokio::task::block_in_place`]. A current-thread runtime cannot be
    /// parked, so there the hand-off is spawned onto it and `set` returns
    /// without waiting; the value is still delivered.
    pub fn set(&self, name: &str, value: f64) {
        let Some(tx) = &self.tx else {
            return;
        };

        match Handle::try_current() {
            Err(_) => send_blocking(tx, name, value),
            Ok(handle) => match handle.runtime_flavor() {
                RuntimeFlavor::MultiThread => {
                    tokio::task::block_in_place(|| send_blocking(tx, name, value));
                }
                _ => {
                    let tx = tx.clone();
                    let sample = QueuedSample {
                        name: name.to_string(),
                        value,
                        ack: None,
                    };
                    handle.spawn(async move {
                        let _ = tx.send(sample).await;
                    });
                }
            },
        }
    }

    /// Async form of [`SampleSender::set`].
    pub async fn set_async(&self, name: &str, value: f64) {
        let Some(tx) = &self.tx else {
            return;
        };

        let (ack_tx, ack_rx) = oneshot::channel();
        let sample = QueuedSample {
            name: name.to_string(),
            value,
            ack: Some(ack_tx),
        };

        if tx.send(sample).await.is_err() {
            return;
        }
        let _ = ack_rx.await;
    }
}

fn send_blocking(tx: &mpsc::Sender<QueuedSample>, name: &str, value: f64) {
    let (ack_tx, ack_rx) = oneshot::channel();
    let sample = QueuedSample {
        name: name.to_string(),
        value,
        ack: Some(ack_tx),
    };

    // Both calls fail fast once the loop is gone
    if tx.blocking_send(sample).is_err() {
        return;
    }
    let _ = ack_rx.blocking_recv();
}

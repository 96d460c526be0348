//! Debounced watch channels
//!
//! A debouncer forwards the latest value of a source channel once the source
//! has been quiet for the configured delay. Every new value restarts the
//! timer, so a burst of edits produces exactly one downstream update.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawn a task that debounces `source`.
///
/// The returned receiver starts with the source's current value. The task
/// stops when `shutdown` is cancelled, when the source is closed (after
/// flushing a pending value) or when every output receiver is dropped.
pub fn spawn_debounced<T>(
    mut source: watch::Receiver<T>,
    delay: Duration,
    shutdown: CancellationToken,
) -> (watch::Receiver<T>, JoinHandle<()>)
where
    T: Clone + Send + Sync + 'static,
{
    let initial = source.borrow_and_update().clone();
    let (tx, rx) = watch::channel(initial);

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                changed = source.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }

            // Quiet period: each new value restarts the timer
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    _ = tokio::time::sleep(delay) => break,
                    changed = source.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        tracing::trace!("Pending value superseded, restarting {:?} timer", delay);
                    }
                }
            }

            let value = source.borrow_and_update().clone();
            if tx.send(value).is_err() {
                return;
            }
        }
    });

    (rx, handle)
}

//! Flush policies and the background flush worker.

use crate::error::Result;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Controls when the local store writes its entries to disk.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlushPolicy {
    /// Write after every mutation. The contact store defaults to this so a
    /// finished `create`/`update`/`delete` is already on disk.
    #[default]
    Immediate,
    /// Background thread writes on a timer and whenever the store changes.
    Async(Duration),
    /// Only write when `flush()` is called explicitly.
    Manual,
}

/// Cheap handle used by the store to nudge the worker after a mutation.
#[derive(Debug, Clone)]
pub struct FlushTrigger {
    tx: mpsc::SyncSender<()>,
}

impl FlushTrigger {
    /// Non-blocking nudge. If the worker is mid-flush the nudge is dropped;
    /// the next timer tick catches up.
    pub fn poke(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Background thread that runs a flush closure on a timer or when poked.
///
/// The thread exits once every [`FlushTrigger`] and the worker itself are
/// gone. Dropping the worker joins the thread, which can block for up to one
/// flush (not one interval: dropping the sender wakes it immediately).
pub struct FlushWorker {
    tx: Option<mpsc::SyncSender<()>>,
    join_handle: Option<thread::JoinHandle<()>>,
}

impl FlushWorker {
    /// Spawn the worker and hand back a trigger for the store to keep.
    pub fn spawn<F>(interval: Duration, flush_fn: F) -> (Self, FlushTrigger)
    where
        F: Fn() -> Result<()> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<()>(1);
        let join_handle = thread::spawn(move || loop {
            match rx.recv_timeout(interval) {
                Ok(()) | Err(mpsc::RecvTimeoutError::Timeout) => {
                    if let Err(err) = flush_fn() {
                        log::warn!("background flush failed: {err}");
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    // Final write so nothing queued since the last tick is lost.
                    if let Err(err) = flush_fn() {
                        log::warn!("final background flush failed: {err}");
                    }
                    break;
                }
            }
        });

        let trigger = FlushTrigger { tx: tx.clone() };
        let worker = Self {
            tx: Some(tx),
            join_handle: Some(join_handle),
        };
        (worker, trigger)
    }
}

impl Drop for FlushWorker {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(h) = self.join_handle.take() {
            let _ = h.join();
        }
    }
}

impl std::fmt::Debug for FlushWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlushWorker")
            .field("running", &self.join_handle.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn drop_runs_final_flush() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let (worker, trigger) = FlushWorker::spawn(Duration::from_secs(60), move || {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        drop(trigger);
        drop(worker);
        assert!(count.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn default_policy_is_immediate() {
        assert_eq!(FlushPolicy::default(), FlushPolicy::Immediate);
    }
}

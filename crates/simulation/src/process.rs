//! Cooperative process accounting.
//!
//! Every dispatched event runs as a process. The scheduler keeps a count
//! of processes that are still runnable (spawned and neither finished nor
//! parked); the engine may only advance simulated time while that count
//! is zero.
//!
//! The count lives in a `tokio::sync::watch` channel so the engine can
//! wait for quiescence without spinning.

use crate::SchedulerError;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};

/// Shared handle on the runnable-process counter.
#[derive(Debug, Clone)]
pub struct ProcessScheduler {
    runnable: Arc<watch::Sender<usize>>,
}

impl Default for ProcessScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessScheduler {
    /// Create a scheduler with no runnable processes.
    pub fn new() -> Self {
        let (runnable, _) = watch::channel(0);
        Self {
            runnable: Arc::new(runnable),
        }
    }

    /// Number of processes currently runnable.
    pub fn runnable(&self) -> usize {
        *self.runnable.borrow()
    }

    /// Check if no process is runnable.
    pub fn is_quiescent(&self) -> bool {
        self.runnable() == 0
    }

    /// Report that a process became runnable (spawned or woken up).
    pub fn resume(&self) {
        self.runnable.send_modify(|runnable| *runnable += 1);
    }

    /// Report that a runnable process stopped making progress.
    pub fn suspend(&self) -> Result<(), SchedulerError> {
        self.decrement()
    }

    /// Report that a runnable process ran to completion.
    pub(crate) fn finish(&self) -> Result<(), SchedulerError> {
        self.decrement()
    }

    /// Suspend the calling process and register a single-use wake-up.
    ///
    /// The returned [`Signal`] goes to whoever will provide the awaited
    /// resource; the [`Waiter`] stays with the parked process.
    pub fn park(&self) -> Result<(Signal, Waiter), SchedulerError> {
        self.suspend()?;
        let (tx, rx) = oneshot::channel();
        let signal = Signal {
            tx,
            processes: self.clone(),
        };
        Ok((signal, Waiter { rx }))
    }

    /// Wait until no process is runnable.
    pub async fn quiesce(&self) -> Result<(), SchedulerError> {
        let mut runnable = self.runnable.subscribe();
        runnable
            .wait_for(|runnable| *runnable == 0)
            .await
            .map(|_| ())
            .map_err(|_| SchedulerError::Closed)
    }

    fn decrement(&self) -> Result<(), SchedulerError> {
        let mut underflow = false;
        self.runnable.send_if_modified(|runnable| match runnable.checked_sub(1) {
            Some(remaining) => {
                *runnable = remaining;
                true
            }
            None => {
                underflow = true;
                false
            }
        });

        if underflow {
            Err(SchedulerError::RunnableUnderflow)
        } else {
            Ok(())
        }
    }
}

/// Wake-up handle held by the provider of a resource.
///
/// Firing consumes the signal, so a parked process is woken at most once.
#[derive(Debug)]
pub struct Signal {
    tx: oneshot::Sender<()>,
    processes: ProcessScheduler,
}

impl Signal {
    /// Wake the parked process and count it as runnable again.
    pub fn fire(self) -> Result<(), SchedulerError> {
        self.tx.send(()).map_err(|()| SchedulerError::WaiterGone)?;
        self.processes.resume();
        Ok(())
    }
}

/// The parked side of a [`Signal`].
#[derive(Debug)]
pub struct Waiter {
    rx: oneshot::Receiver<()>,
}

impl Waiter {
    /// Block the calling process until its signal fires.
    pub async fn wait(self) -> Result<(), SchedulerError> {
        self.rx.await.map_err(|_| SchedulerError::WaiterAbandoned)
    }
}

//! The simulation loop.

use crate::{EntityId, Event, EventQueue, EventSeq, ProcessScheduler, SchedulerError};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet, LocalSet};
use tracing::{debug, info, trace};
use tycoon_types::{Duration, Time};

/// A process spawned for a single dispatched event.
///
/// Processes run on the engine's local task set, so they need not be `Send`.
pub type ProcessFuture<E> = Pin<Box<dyn Future<Output = Result<(), E>>>>;

/// Routes a popped event to the entity that handles it.
///
/// The returned future is the handler process. It may schedule further
/// events, park on a resource, or signal other parked processes. An error
/// aborts the whole run.
pub trait Dispatch<K> {
    /// Error type produced by handler processes.
    type Error: From<SchedulerError> + 'static;

    /// Start the process for `event`.
    fn dispatch(&self, event: Event<K>) -> ProcessFuture<Self::Error>;
}

struct Timeline<K> {
    now: Time,
    queue: EventQueue<Event<K>>,
}

struct Inner<K> {
    timeline: Mutex<Timeline<K>>,
    processes: ProcessScheduler,
    started_at: Time,
}

/// Discrete-event engine: a clock, a pending-event queue, and the
/// runnable-process accounting that gates time advancement.
///
/// Cloning yields another handle on the same timeline.
pub struct Simulator<K> {
    inner: Arc<Inner<K>>,
}

impl<K> Clone for Simulator<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K> fmt::Debug for Simulator<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timeline = self.inner.timeline.lock();
        f.debug_struct("Simulator")
            .field("now", &timeline.now)
            .field("pending", &timeline.queue.len())
            .field("runnable", &self.inner.processes.runnable())
            .finish()
    }
}

impl<K> Simulator<K>
where
    K: Clone + fmt::Debug + 'static,
{
    /// Create an engine whose clock starts at `start`.
    pub fn new(start: Time) -> Self {
        Self {
            inner: Arc::new(Inner {
                timeline: Mutex::new(Timeline {
                    now: start,
                    queue: EventQueue::new(),
                }),
                processes: ProcessScheduler::new(),
                started_at: start,
            }),
        }
    }

    /// Current simulated time.
    pub fn now(&self) -> Time {
        self.inner.timeline.lock().now
    }

    /// Time the clock started at.
    pub fn started_at(&self) -> Time {
        self.inner.started_at
    }

    /// Simulated time elapsed since the start.
    pub fn elapsed(&self) -> Duration {
        self.now() - self.inner.started_at
    }

    /// Runnable-process accounting shared with handlers.
    pub fn processes(&self) -> &ProcessScheduler {
        &self.inner.processes
    }

    /// Number of events waiting to be dispatched.
    pub fn pending_count(&self) -> usize {
        self.inner.timeline.lock().queue.len()
    }

    /// Schedule an event for `source` to occur `after` from now.
    pub fn schedule(
        &self,
        source: EntityId,
        kind: K,
        after: Duration,
    ) -> Result<EventSeq, SchedulerError> {
        if after.is_negative() {
            return Err(SchedulerError::NegativeDelay { delay: after });
        }

        let mut timeline = self.inner.timeline.lock();
        let occurred_at = timeline
            .now
            .checked_add(after)
            .ok_or(SchedulerError::ClockOverflow {
                now: timeline.now,
                delay: after,
            })?;
        debug!(%source, at = %occurred_at, ?kind, "Scheduling event");
        let seq = timeline
            .queue
            .schedule(occurred_at, Event::new(source, occurred_at, kind));
        Ok(seq)
    }

    /// Run the simulation until `till` reports true or nothing is left to do.
    ///
    /// Before each step the engine waits for every spawned process to finish
    /// or park, then evaluates `till`. Returns the events in the order they
    /// were dispatched.
    ///
    /// Processes still parked when the run stops are cancelled. Whatever
    /// holds their signals must drop them before the next `proceed`, or the
    /// first wake-up fails with [`SchedulerError::WaiterGone`].
    pub async fn proceed<D, F>(&self, dispatcher: &D, till: F) -> Result<Vec<Event<K>>, D::Error>
    where
        D: Dispatch<K>,
        F: FnMut() -> bool,
    {
        let local = LocalSet::new();
        local.run_until(self.drive(dispatcher, till)).await
    }

    async fn drive<D, F>(&self, dispatcher: &D, mut till: F) -> Result<Vec<Event<K>>, D::Error>
    where
        D: Dispatch<K>,
        F: FnMut() -> bool,
    {
        let mut running: JoinSet<Result<(), D::Error>> = JoinSet::new();
        let mut dispatched = Vec::new();

        let outcome = loop {
            if let Err(err) = self.settle(&mut running).await {
                break Err(err);
            }
            if till() {
                info!(now = %self.now(), "Stop condition reached");
                break Ok(());
            }
            let Some(event) = self.advance() else {
                info!(now = %self.now(), "Event queue drained");
                break Ok(());
            };

            dispatched.push(event.clone());
            let work = dispatcher.dispatch(event);
            let processes = self.inner.processes.clone();
            processes.resume();
            running.spawn_local(async move {
                let result = work.await;
                let finished = processes.finish().map_err(D::Error::from);
                result.and(finished)
            });
        };

        // Whatever is still parked can never be woken now.
        running.abort_all();
        while let Some(joined) = running.join_next().await {
            if let Some(Err(err)) = Self::joined(joined) {
                return Err(err);
            }
        }

        outcome.map(|()| dispatched)
    }

    /// Wait until no process is runnable, surfacing the first failure.
    async fn settle<E>(&self, running: &mut JoinSet<Result<(), E>>) -> Result<(), E>
    where
        E: From<SchedulerError> + 'static,
    {
        loop {
            tokio::select! {
                biased;
                Some(joined) = running.join_next() => {
                    if let Some(Err(err)) = Self::joined(joined) {
                        return Err(err);
                    }
                }
                quiet = self.inner.processes.quiesce() => {
                    return quiet.map_err(E::from);
                }
            }
        }
    }

    /// Unpack a joined process. Panics are re-raised; cancelled processes
    /// yield nothing.
    fn joined<E>(joined: Result<Result<(), E>, JoinError>) -> Option<Result<(), E>> {
        match joined {
            Ok(result) => Some(result),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => None,
        }
    }

    /// Pop the earliest event and move the clock to it.
    fn advance(&self) -> Option<Event<K>> {
        let mut timeline = self.inner.timeline.lock();
        let (time, seq, event) = timeline.queue.pop()?;
        debug_assert!(time >= timeline.now, "event queue went back in time");
        timeline.now = time;
        trace!(seq = seq.as_u64(), "Popped event");
        info!(
            at = %time,
            source = %event.source(),
            kind = ?event.kind(),
            "Dispatching event"
        );
        Some(event)
    }
}

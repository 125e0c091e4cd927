//! Deterministic discrete-event simulation engine.
//!
//! This crate provides the simulated timeline the delivery network runs
//! on. Given the same inputs, it dispatches exactly the same events in
//! exactly the same order every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      Simulator                          │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Event Queue (BinaryHeap<QueuedEvent>)          │ │
//! │  │     Ordered by: time, insertion sequence           │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ pop earliest, advance clock │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Dispatch: event → process (LocalSet task)      │ │
//! │  │     ProcessScheduler counts runnable processes     │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Handlers → schedule new events, park, signal   │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The clock only moves once every spawned process has either finished or
//! parked itself waiting on a resource, so chains of zero-duration work
//! are fully resolved before time advances.

mod error;
mod event;
mod event_queue;
mod process;
mod runner;

pub use error::SchedulerError;
pub use event::{EntityId, Event};
pub use event_queue::{EventQueue, EventSeq};
pub use process::{ProcessScheduler, Signal, Waiter};
pub use runner::{Dispatch, ProcessFuture, Simulator};

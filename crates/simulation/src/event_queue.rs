//! Priority event queue with deterministic ordering.
//!
//! Entries are ordered by `(time, seq)`. The sequence number is assigned
//! when an entry is scheduled and strictly increases, so two entries for
//! the same instant come out in the order they were put in.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tycoon_types::Time;

/// Insertion sequence number used to break ties between equal times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventSeq(u64);

impl EventSeq {
    /// Get the raw sequence number.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct QueuedEvent<E> {
    time: Time,
    seq: EventSeq,
    event: E,
}

impl<E> PartialEq for QueuedEvent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<E> Eq for QueuedEvent<E> {}

impl<E> PartialOrd for QueuedEvent<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for QueuedEvent<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: reverse so the earliest (time, seq) wins.
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue of pending events keyed by `(time, seq)`.
#[derive(Debug)]
pub struct EventQueue<E> {
    heap: BinaryHeap<QueuedEvent<E>>,
    next_seq: u64,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Insert an event due at `time`, returning its sequence number.
    pub fn schedule(&mut self, time: Time, event: E) -> EventSeq {
        let seq = EventSeq(self.next_seq);
        self.next_seq += 1;
        self.heap.push(QueuedEvent { time, seq, event });
        seq
    }

    /// Time of the earliest pending event.
    pub fn peek_time(&self) -> Option<Time> {
        self.heap.peek().map(|queued| queued.time)
    }

    /// Remove the earliest pending event (lowest sequence among equal times).
    pub fn pop(&mut self) -> Option<(Time, EventSeq, E)> {
        self.heap
            .pop()
            .map(|queued| (queued.time, queued.seq, queued.event))
    }
}

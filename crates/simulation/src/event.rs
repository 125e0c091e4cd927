//! Dispatched events.

use std::fmt;
use tycoon_types::Time;

/// Identity of the entity that owns (and handles) an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Get the raw ID value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Position of the entity in a dense registry.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Something that happened on the simulated timeline.
///
/// Events are immutable once created: the engine stamps `occurred_at` when
/// the event is scheduled and never touches it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<K> {
    source: EntityId,
    occurred_at: Time,
    kind: K,
}

impl<K> Event<K> {
    /// Create an event stamped with the time it occurs at.
    pub fn new(source: EntityId, occurred_at: Time, kind: K) -> Self {
        Self {
            source,
            occurred_at,
            kind,
        }
    }

    /// The entity this event belongs to.
    pub fn source(&self) -> EntityId {
        self.source
    }

    /// When the event occurs on the simulated timeline.
    pub fn occurred_at(&self) -> Time {
        self.occurred_at
    }

    /// The kind-specific payload.
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Consume the event, keeping only its payload.
    pub fn into_kind(self) -> K {
        self.kind
    }
}

//! Caller-supplied hook for cost changes.
//!
//! The hasher prints nothing. Anything that wants to know when the cost
//! factor moved or a stale hash was replaced registers a [`HashObserver`];
//! closures of type `Fn(&HashEvent)` qualify.

use serde::Serialize;

/// Something the hasher did that a caller may want to record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HashEvent {
    /// Hashing at `from` finished in `elapsed_ms`, under the floor, so the
    /// current cost was raised to `to`.
    Escalated { from: u32, to: u32, elapsed_ms: u64 },

    /// A matching hash was regenerated at `cost`. `previous` is the cost the
    /// stored hash carried, or `None` if it could not be read.
    Upgraded { previous: Option<u32>, cost: u32 },
}

/// Receives [`HashEvent`]s from an `AdaptiveHasher`.
pub trait HashObserver: Send + Sync {
    fn on_event(&self, event: &HashEvent);
}

impl<F> HashObserver for F
where
    F: Fn(&HashEvent) + Send + Sync,
{
    fn on_event(&self, event: &HashEvent) {
        self(event)
    }
}

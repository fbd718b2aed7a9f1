//! Grid lifecycle events.
//!
//! The notifier is an explicit mapping from [`EventKind`] to a [`Signal`]
//! carrying [`GridEvent`]s. Emission is a plain synchronous walk over the
//! handlers in subscription order; a panicking handler is isolated by the
//! signal and does not stop the rest.

use mosaic_core::logging::targets;
use mosaic_core::{ConnectionId, Signal};

use crate::item::ItemId;

/// The kinds of event a grid emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A layout pass (segment, then equalize) completed.
    Layout,
    /// Items were removed from the collection.
    ItemsRemoved,
}

/// Payload of [`EventKind::Layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEvent {
    pub visible_count: usize,
    pub total_count: usize,
}

/// Payload of [`EventKind::ItemsRemoved`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedEvent {
    pub removed_ids: Vec<ItemId>,
}

/// An event delivered to handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    Layout(LayoutEvent),
    ItemsRemoved(RemovedEvent),
}

impl GridEvent {
    /// The kind this event is delivered under.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Layout(_) => EventKind::Layout,
            Self::ItemsRemoved(_) => EventKind::ItemsRemoved,
        }
    }
}

/// Subscription registry for grid events.
#[derive(Default)]
pub struct EventNotifier {
    layout: Signal<GridEvent>,
    items_removed: Signal<GridEvent>,
}

impl EventNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn signal(&self, kind: EventKind) -> &Signal<GridEvent> {
        match kind {
            EventKind::Layout => &self.layout,
            EventKind::ItemsRemoved => &self.items_removed,
        }
    }

    /// Subscribe `handler` to events of `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> ConnectionId
    where
        F: Fn(&GridEvent) + Send + Sync + 'static,
    {
        self.signal(kind).connect(handler)
    }

    /// Remove a handler previously returned by [`on`](Self::on).
    pub fn off(&self, kind: EventKind, id: ConnectionId) -> bool {
        self.signal(kind).disconnect(id)
    }

    /// Number of handlers subscribed to `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.signal(kind).connection_count()
    }

    /// Suppress (or resume) delivery of `kind`.
    pub fn set_blocked(&self, kind: EventKind, blocked: bool) {
        self.signal(kind).set_blocked(blocked);
    }

    /// Deliver `event` to every handler of its kind.
    ///
    /// Returns the number of handlers that panicked.
    pub(crate) fn emit(&self, event: GridEvent) -> usize {
        let kind = event.kind();
        tracing::debug!(target: targets::EVENTS, ?event, "emitting grid event");

        let failures = self.signal(kind).emit(event);
        if failures > 0 {
            tracing::warn!(target: targets::EVENTS, ?kind, failures, "grid event handlers failed");
        }
        failures
    }
}

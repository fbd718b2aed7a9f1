//! Signal/slot notification for Mosaic.
//!
//! A [`Signal<Args>`] holds an ordered list of connected slots (callbacks).
//! Emitting the signal invokes every slot synchronously, in the order the
//! slots were connected. The grid engine builds its event notifier on top of
//! this type.
//!
//! # Failure isolation
//!
//! A slot that panics does not prevent the remaining slots from running.
//! The panic is caught, logged under [`targets::SIGNAL`], and emission
//! continues with the next slot.
//!
//! # Example
//!
//! ```
//! use mosaic_core::Signal;
//!
//! let layout_done = Signal::<usize>::new();
//!
//! let conn_id = layout_done.connect(|count| {
//!     println!("laid out {count} items");
//! });
//!
//! layout_done.emit(12);
//! layout_done.disconnect(conn_id);
//! ```
//!
//! [`targets::SIGNAL`]: crate::logging::targets::SIGNAL

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Returned by [`Signal::connect`]; pass it to [`Signal::disconnect`] to
    /// remove the slot again.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Slot storage plus the order in which slots were connected.
///
/// `SlotMap` reuses freed slots, so its iteration order is not connection
/// order once anything has been disconnected. `order` is authoritative.
struct Connections<Args> {
    slots: SlotMap<ConnectionId, Slot<Args>>,
    order: Vec<ConnectionId>,
}

impl<Args> Connections<Args> {
    fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    fn snapshot(&self) -> Vec<Slot<Args>> {
        self.order
            .iter()
            .filter_map(|id| self.slots.get(*id).cloned())
            .collect()
    }
}

/// A type-safe signal with any number of connected slots.
///
/// # Type Parameter
///
/// - `Args`: The payload passed to connected slots by reference. Use `()` for
///   signals without a payload.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync`. Slots are always invoked directly on the
/// emitting thread; there is no queued delivery.
pub struct Signal<Args> {
    connections: Mutex<Connections<Args>>,
    /// Whether emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args: Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Send + 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(Connections::new()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Slots run in connection order. Returns a [`ConnectionId`] that can be
    /// used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let mut connections = self.connections.lock();
        let id = connections.slots.insert(Arc::new(slot));
        connections.order.push(id);
        id
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed. The relative
    /// order of the remaining slots is unchanged.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock();
        if connections.slots.remove(id).is_none() {
            return false;
        }
        connections.order.retain(|existing| *existing != id);
        true
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        let mut connections = self.connections.lock();
        connections.slots.clear();
        connections.order.clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().slots.len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to [`emit`](Self::emit) do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// The connection list is snapshotted before any slot runs, so a slot may
    /// connect or disconnect on this same signal without deadlocking. Such
    /// changes take effect from the next emission.
    ///
    /// Returns the number of slots that panicked.
    #[tracing::instrument(skip_all, target = "mosaic_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) -> usize {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return 0;
        }

        let slots = self.connections.lock().snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        let mut failures = 0;
        for (position, slot) in slots.iter().enumerate() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| slot(&args))) {
                failures += 1;
                tracing::error!(
                    target: targets::SIGNAL,
                    slot = position,
                    panic = panic_message(payload.as_ref()),
                    "slot panicked during emit; continuing with remaining slots"
                );
            }
        }
        failures
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}

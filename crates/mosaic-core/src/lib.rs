//! Core systems for Mosaic.
//!
//! This crate provides the foundational pieces the grid engine is built on:
//!
//! - **Signal/Slot System**: Ordered, synchronous change notification with
//!   per-slot failure isolation
//! - **Logging**: `tracing` targets and perf spans shared by all subsystems
//!
//! # Signal/Slot Example
//!
//! ```
//! use mosaic_core::Signal;
//!
//! // Create a signal that notifies when items are removed
//! let removed = Signal::<Vec<u64>>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = removed.connect(|ids| {
//!     println!("removed {} items", ids.len());
//! });
//!
//! // Emit the signal
//! removed.emit(vec![3, 4]);
//!
//! // Disconnect when done
//! removed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};

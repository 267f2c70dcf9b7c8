//! Core plumbing for Horizon History.
//!
//! This crate provides the small set of framework pieces the history
//! component is built on:
//!
//! - **Signal/Slot System**: Type-safe, synchronous multicast notification
//! - **Logging**: Tracing targets, span names and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_history_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal, SignalEmitter};

// Used by the exported logging macros so callers don't need their own
// `tracing` dependency.
#[doc(hidden)]
pub use tracing;

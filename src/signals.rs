// src/signals.rs

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};

pub type SignalHandler = Box<dyn Fn() + Send + Sync>;

type Slot = Mutex<Option<Arc<dyn Fn() + Send + Sync>>>;

/// Side channel for the two cross-cutting session events a deeply nested
/// request can discover: an incomplete registration and an unreachable
/// backend. The presentation layer registers one handler per slot (typically
/// a navigation redirect); registration replaces the previous handler.
///
/// This is a bounded escape hatch with exactly two well-known signals, not a
/// general pub/sub bus. The hub is injected into `ApiClient` at construction
/// and shared via `Arc`, so there is no process-global mutable state.
#[derive(Default)]
pub struct SignalHub {
    needs_complete_registration: Slot,
    server_unavailable: Slot,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler fired when the backend reports an unfinished
    /// registration. `None` clears the slot.
    pub fn on_needs_complete_registration(&self, handler: Option<SignalHandler>) {
        *lock_slot(&self.needs_complete_registration) = handler.map(Arc::from);
    }

    /// Registers the handler fired when the backend is unreachable or not
    /// configured. `None` clears the slot.
    pub fn on_server_unavailable(&self, handler: Option<SignalHandler>) {
        *lock_slot(&self.server_unavailable) = handler.map(Arc::from);
    }

    pub fn emit_needs_complete_registration(&self) {
        fire(&self.needs_complete_registration);
    }

    pub fn emit_server_unavailable(&self) {
        fire(&self.server_unavailable);
    }
}

fn lock_slot(slot: &Slot) -> std::sync::MutexGuard<'_, Option<Arc<dyn Fn() + Send + Sync>>> {
    // A handler that panicked must not wedge the slot for the rest of the
    // process, so recover from poisoning.
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn fire(slot: &Slot) {
    // Clone the handler out and release the lock before invoking, so a
    // handler may re-enter the hub (deregister itself, swap the slot, emit
    // again) without deadlocking the emitting request.
    let handler = lock_slot(slot).clone();
    if let Some(handler) = handler {
        // Signal delivery must never crash the request that discovered the
        // condition; a panicking handler is swallowed.
        let _ = catch_unwind(AssertUnwindSafe(|| handler()));
    }
}

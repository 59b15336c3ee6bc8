/// Clocks for the typing-guard silence window
///
/// The guard never schedules work. It stores a deadline in milliseconds and
/// compares it with a clock whenever its state is read, so the only thing a
/// clock has to provide is a monotonic millisecond reading:
/// - `SystemClock`: `Instant`-based, native targets
/// - `ManualClock`: driven explicitly by tests or by a host that owns time
/// - `JsClock` (WASM bindings): `Date.now()`
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// Instant is not available on wasm32-unknown-unknown
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Millisecond time source
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Monotonic clock measured from its creation
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock
///
/// Clones share the same counter, so a test can keep one handle and give
/// another to the editor.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    value: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a new clock starting at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `ms` and return the new reading
    pub fn advance(&self, ms: u64) -> u64 {
        self.value.fetch_add(ms, Ordering::SeqCst) + ms
    }

    /// Set to a specific reading
    ///
    /// Never moves backwards; a smaller value is ignored.
    pub fn set(&self, ms: u64) {
        self.value.fetch_max(ms, Ordering::SeqCst);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.get()
    }
}

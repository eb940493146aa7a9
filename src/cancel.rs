//! Portable cancellation flag for `no_std` environments.
//!
//! The signal is usually a `static`, raised from an interrupt handler or another
//! thread through a [`CancelHandle`] and observed by the engine through a
//! [`CancelToken`]. Access is guarded by critical sections, so it is safe to
//! share between interrupt and thread context.

use core::cell::Cell;

use critical_section::Mutex;

/// A latched, thread/interrupt safe cancellation flag.
///
/// Once raised the signal stays raised until [`CancelSignal::reset`].
pub struct CancelSignal {
    raised: Mutex<Cell<bool>>,
}

impl CancelSignal {
    /// Create a new, lowered signal.
    pub const fn new() -> Self {
        Self {
            raised: Mutex::new(Cell::new(false)),
        }
    }

    /// Get a handle that can raise this signal.
    pub const fn handle(&self) -> CancelHandle<'_> {
        CancelHandle { signal: self }
    }

    /// Get a token that observes this signal.
    pub const fn token(&self) -> CancelToken<'_> {
        CancelToken { signal: self }
    }

    /// Raise the signal.
    pub fn cancel(&self) {
        critical_section::with(|cs| self.raised.borrow(cs).set(true));
    }

    /// Check whether the signal was raised.
    pub fn is_cancelled(&self) -> bool {
        critical_section::with(|cs| self.raised.borrow(cs).get())
    }

    /// Lower the signal so it can be reused for a new session.
    pub fn reset(&self) {
        critical_section::with(|cs| self.raised.borrow(cs).set(false));
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Raises a [`CancelSignal`].
///
/// This is a lightweight reference that can be copied into interrupt handlers.
#[derive(Clone, Copy)]
pub struct CancelHandle<'a> {
    signal: &'a CancelSignal,
}

impl CancelHandle<'_> {
    /// Request cancellation.
    pub fn cancel(&self) {
        self.signal.cancel();
    }
}

/// Observes a [`CancelSignal`].
#[derive(Clone, Copy)]
pub struct CancelToken<'a> {
    signal: &'a CancelSignal,
}

impl CancelToken<'_> {
    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.signal.is_cancelled()
    }
}

// src/common/cancel.rs

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

/// A flag the driver checks before every poll attempt.
///
/// Once it reads `true` the measurement stops with `Sht21Error::Cancelled`
/// and the bus is released.
pub trait CancelToken {
    fn is_cancelled(&self) -> bool;
}

/// Never cancels. Used by the plain `measure` calls.
#[derive(Debug, Default, Copy, Clone)]
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Set from an interrupt handler or another thread.
impl CancelToken for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl CancelToken for Cell<bool> {
    fn is_cancelled(&self) -> bool {
        self.get()
    }
}

impl<C: CancelToken + ?Sized> CancelToken for &C {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

// src/common/bus.rs

//! Scoped exclusive access to the bus.
//!
//! The SHT21 has no in-band way to tell interleaved command/reply pairs apart,
//! so a measurement must own the bus from the command write until the last
//! poll read. [`BusHold::hold`] grants that ownership for the duration of a
//! closure. The hold ends when the closure returns, whatever it returns.

use super::hal_traits::Sht21Bus;
use core::cell::{RefCell, RefMut};

#[cfg(feature = "async")]
use super::hal_traits::Sht21BusAsync;
#[cfg(feature = "async")]
use core::ops::DerefMut;
#[cfg(feature = "async")]
use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    mutex::{Mutex as AsyncMutex, MutexGuard},
};

/// Another user holds the bus right now.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bus is held by another user")]
pub struct BusUnavailable;

/// Something that can lend out a bus exclusively for one transaction.
pub trait BusHold {
    type Bus: Sht21Bus;

    /// Runs `f` with exclusive access to the bus.
    ///
    /// Fails with [`BusUnavailable`] without touching the bus if it is already held.
    fn hold<R, F>(&mut self, f: F) -> Result<R, BusUnavailable>
    where
        F: FnOnce(&mut Self::Bus) -> R;
}

/// A bus owned by a single driver. Holding it never fails.
#[derive(Debug)]
pub struct Exclusive<B>(pub B);

impl<B: Sht21Bus> BusHold for Exclusive<B> {
    type Bus = B;

    fn hold<R, F>(&mut self, f: F) -> Result<R, BusUnavailable>
    where
        F: FnOnce(&mut B) -> R,
    {
        Ok(f(&mut self.0))
    }
}

/// A bus shared by several drivers within one execution context
/// (a superloop or a cooperative scheduler).
///
/// Each driver keeps a `&SharedBus`; a hold borrows the inner bus mutably and
/// any overlapping hold is refused with [`BusUnavailable`].
#[derive(Debug)]
pub struct SharedBus<B> {
    bus: RefCell<B>,
}

impl<B> SharedBus<B> {
    pub const fn new(bus: B) -> Self {
        SharedBus { bus: RefCell::new(bus) }
    }

    /// Takes the bus for a caller-managed transaction. The bus is released when
    /// the returned guard is dropped.
    pub fn lock(&self) -> Result<RefMut<'_, B>, BusUnavailable> {
        self.bus.try_borrow_mut().map_err(|_| BusUnavailable)
    }

    pub fn is_held(&self) -> bool {
        self.bus.try_borrow_mut().is_err()
    }

    pub fn into_inner(self) -> B {
        self.bus.into_inner()
    }
}

impl<B: Sht21Bus> BusHold for &SharedBus<B> {
    type Bus = B;

    fn hold<R, F>(&mut self, f: F) -> Result<R, BusUnavailable>
    where
        F: FnOnce(&mut B) -> R,
    {
        let mut bus = self.lock()?;
        log::trace!("bus acquired");
        let result = f(&mut bus);
        log::trace!("bus released");
        Ok(result)
    }
}

/// Threads block until the bus is free. A poisoned lock is reported as unavailable.
#[cfg(feature = "std")]
impl<B: Sht21Bus> BusHold for &std::sync::Mutex<B> {
    type Bus = B;

    fn hold<R, F>(&mut self, f: F) -> Result<R, BusUnavailable>
    where
        F: FnOnce(&mut B) -> R,
    {
        let mut bus = self.lock().map_err(|_| BusUnavailable)?;
        Ok(f(&mut bus))
    }
}

/// Async counterpart of [`BusHold`] (requires 'async' feature).
///
/// The hold is a guard rather than a closure: the bus stays locked for as long
/// as the guard lives, across every await of the transaction, and is released
/// when the guard is dropped. Dropping the transaction's future drops the guard.
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait BusHoldAsync {
    type Bus: Sht21BusAsync;
    type Guard<'a>: DerefMut<Target = Self::Bus>
    where
        Self: 'a;

    /// Waits until the bus is free, then locks it.
    async fn hold(&mut self) -> Result<Self::Guard<'_>, BusUnavailable>;
}

#[cfg(feature = "async")]
impl<B: Sht21BusAsync> BusHoldAsync for Exclusive<B> {
    type Bus = B;
    type Guard<'a> = &'a mut B where Self: 'a;

    async fn hold(&mut self) -> Result<Self::Guard<'_>, BusUnavailable> {
        Ok(&mut self.0)
    }
}

/// Tasks sharing one bus through an `embassy_sync` mutex. A second task's
/// transaction waits until the first one has read its reply.
#[cfg(feature = "async")]
impl<'m, M: RawMutex, B: Sht21BusAsync> BusHoldAsync for &'m AsyncMutex<M, B> {
    type Bus = B;
    type Guard<'a> = MutexGuard<'m, M, B> where Self: 'a;

    async fn hold(&mut self) -> Result<Self::Guard<'_>, BusUnavailable> {
        let mutex: &'m AsyncMutex<M, B> = *self;
        let guard = mutex.lock().await;
        log::trace!("bus acquired");
        Ok(guard)
    }
}

// src/driver/sync_driver/mod.rs

mod io_helpers;
mod register;
mod transaction;

use crate::common::{
    bus::{BusHold, Exclusive, SharedBus},
    cancel::{CancelToken, NeverCancel},
    command::MeasurementKind,
    config::Sht21Config,
    error::Sht21Error,
    hal_traits::{Sht21Bus, Sht21Timer},
    types::{FixedPoint, Measurement},
};

/// Error type of the bus behind a hold.
pub type BusError<H> = <<H as BusHold>::Bus as Sht21Bus>::Error;

/// Blocking SHT21 driver.
///
/// The handle owns (or borrows) a bus hold and a timer; it keeps no state
/// between calls. Each call takes `&mut self`, so one handle never has two
/// transactions in flight, and every call holds the bus from its first write
/// to its last read.
#[derive(Debug)]
pub struct Sht21<H, T> {
    bus: H,
    timer: T,
    config: Sht21Config,
}

impl<B: Sht21Bus, T: Sht21Timer> Sht21<Exclusive<B>, T> {
    /// Driver with exclusive use of `bus` at the default address.
    pub fn new(bus: B, timer: T) -> Self {
        Self::with_config(Exclusive(bus), timer, Sht21Config::default())
    }
}

impl<'a, B: Sht21Bus, T: Sht21Timer> Sht21<&'a SharedBus<B>, T> {
    /// Driver for a bus that other drivers in the same context also use.
    pub fn new_shared(bus: &'a SharedBus<B>, timer: T) -> Self {
        Self::with_config(bus, timer, Sht21Config::default())
    }
}

impl<H: BusHold, T: Sht21Timer> Sht21<H, T> {
    pub fn with_config(bus: H, timer: T, config: Sht21Config) -> Self {
        Sht21 { bus, timer, config }
    }

    pub fn config(&self) -> &Sht21Config {
        &self.config
    }

    /// Gives back the bus hold and the timer.
    pub fn release(self) -> (H, T) {
        (self.bus, self.timer)
    }

    /// Triggers a measurement and blocks until the converted value is available.
    ///
    /// Occupies the caller for up to `config.conversion_timeout`. Do not call
    /// from an interrupt handler.
    pub fn measure(&mut self, kind: MeasurementKind) -> Result<FixedPoint, Sht21Error<BusError<H>>> {
        self.measure_cancellable(kind, &NeverCancel)
    }

    /// Like [`measure`](Self::measure), but gives up with `Cancelled` as soon as
    /// `cancel` reads `true` between two poll attempts.
    pub fn measure_cancellable<C>(
        &mut self,
        kind: MeasurementKind,
        cancel: &C,
    ) -> Result<FixedPoint, Sht21Error<BusError<H>>>
    where
        C: CancelToken + ?Sized,
    {
        let Sht21 { bus, timer, config } = self;
        bus.hold(|bus| transaction::run_measurement(bus, timer, config, kind, cancel))?
    }

    /// Temperature in hundredths of a degree Celsius.
    pub fn read_temperature(&mut self) -> Result<FixedPoint, Sht21Error<BusError<H>>> {
        self.measure(MeasurementKind::Temperature)
    }

    /// Humidity in hundredths of a percent.
    pub fn read_humidity(&mut self) -> Result<FixedPoint, Sht21Error<BusError<H>>> {
        self.measure(MeasurementKind::Humidity)
    }

    /// Temperature followed by humidity. The bus is released in between.
    pub fn measure_both(&mut self) -> Result<Measurement, Sht21Error<BusError<H>>> {
        let temperature = self.read_temperature()?;
        let humidity = self.read_humidity()?;
        Ok(Measurement { temperature, humidity })
    }
}

// src/driver/async_driver.rs

//! Async SHT21 driver (requires 'async' feature).
//!
//! Same exchange as the blocking driver, but the sleep between poll attempts
//! is an `.await` on the timer, so a cooperative executor can run other tasks
//! while the sensor converts. Every call holds the bus from its command write
//! to its last read. Dropping the future cancels the call and releases the bus.

use crate::common::{
    address::Sht21Addr,
    bus::{BusHoldAsync, Exclusive},
    cancel::{CancelToken, NeverCancel},
    command::{Command, MeasurementKind},
    config::Sht21Config,
    error::Sht21Error,
    hal_traits::{Sht21BusAsync, Sht21TimerAsync},
    response::{decode_reply, REPLY_LEN},
    timing,
    types::{FixedPoint, Measurement},
    user_register::{Resolution, UserRegister},
};
use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex};
use embedded_hal_async::delay::DelayNs;

/// Error type of the bus behind an async hold.
pub type AsyncBusError<H> = <<H as BusHoldAsync>::Bus as Sht21BusAsync>::Error;

/// Async SHT21 driver.
///
/// Build it with [`new`](Self::new) to own the bus, or with
/// [`new_shared`](Self::new_shared) around an `embassy_sync` mutex that other
/// tasks' drivers lock as well.
#[derive(Debug)]
pub struct Sht21Async<H, T> {
    bus: H,
    timer: T,
    config: Sht21Config,
}

impl<B: Sht21BusAsync, T: Sht21TimerAsync> Sht21Async<Exclusive<B>, T> {
    pub fn new(bus: B, timer: T) -> Self {
        Self::with_config(Exclusive(bus), timer, Sht21Config::default())
    }
}

impl<'a, M: RawMutex, B: Sht21BusAsync, T: Sht21TimerAsync> Sht21Async<&'a Mutex<M, B>, T> {
    pub fn new_shared(bus: &'a Mutex<M, B>, timer: T) -> Self {
        Self::with_config(bus, timer, Sht21Config::default())
    }
}

impl<H: BusHoldAsync, T: Sht21TimerAsync> Sht21Async<H, T> {
    pub fn with_config(bus: H, timer: T, config: Sht21Config) -> Self {
        Sht21Async { bus, timer, config }
    }

    pub fn config(&self) -> &Sht21Config {
        &self.config
    }

    pub fn release(self) -> (H, T) {
        (self.bus, self.timer)
    }

    pub async fn measure(&mut self, kind: MeasurementKind) -> Result<FixedPoint, Sht21Error<AsyncBusError<H>>> {
        self.measure_cancellable(kind, &NeverCancel).await
    }

    pub async fn measure_cancellable<C>(
        &mut self,
        kind: MeasurementKind,
        cancel: &C,
    ) -> Result<FixedPoint, Sht21Error<AsyncBusError<H>>>
    where
        C: CancelToken + ?Sized,
    {
        let Sht21Async { bus, timer, config } = self;
        let mut bus = bus.hold().await?;
        let value = run_measurement(&mut *bus, timer, config, kind, cancel).await?;
        Ok(value)
    }

    pub async fn read_temperature(&mut self) -> Result<FixedPoint, Sht21Error<AsyncBusError<H>>> {
        self.measure(MeasurementKind::Temperature).await
    }

    pub async fn read_humidity(&mut self) -> Result<FixedPoint, Sht21Error<AsyncBusError<H>>> {
        self.measure(MeasurementKind::Humidity).await
    }

    /// Temperature followed by humidity. The bus is released in between.
    pub async fn measure_both(&mut self) -> Result<Measurement, Sht21Error<AsyncBusError<H>>> {
        let temperature = self.read_temperature().await?;
        let humidity = self.read_humidity().await?;
        Ok(Measurement { temperature, humidity })
    }

    pub async fn soft_reset(&mut self) -> Result<(), Sht21Error<AsyncBusError<H>>> {
        let Sht21Async { bus, timer, config } = self;
        let mut bus = bus.hold().await?;
        send_command(&mut *bus, config.address, Command::SoftReset).await?;
        timer.delay_ms(timing::as_millis_u32(timing::SOFT_RESET_DURATION)).await;
        Ok(())
    }

    pub async fn read_user_register(&mut self) -> Result<UserRegister, Sht21Error<AsyncBusError<H>>> {
        let Sht21Async { bus, timer, config } = self;
        let mut bus = bus.hold().await?;
        let register = read_register(&mut *bus, timer, config).await?;
        Ok(register)
    }

    /// Writes the settable bits of `register`; reserved bits keep their current value.
    pub async fn write_user_register(
        &mut self,
        register: UserRegister,
    ) -> Result<UserRegister, Sht21Error<AsyncBusError<H>>> {
        self.update_user_register(|_| register).await
    }

    /// Read-modify-write of the user register under a single bus hold.
    pub async fn update_user_register<F>(&mut self, update: F) -> Result<UserRegister, Sht21Error<AsyncBusError<H>>>
    where
        F: FnOnce(UserRegister) -> UserRegister,
    {
        let Sht21Async { bus, timer, config } = self;
        let mut bus = bus.hold().await?;
        let current = read_register(&mut *bus, timer, config).await?;
        let updated = update(current).merge_into(current);
        if updated != current {
            send_command(&mut *bus, config.address, Command::WriteUserRegister(updated)).await?;
        }
        Ok(updated)
    }

    pub async fn set_resolution(&mut self, resolution: Resolution) -> Result<UserRegister, Sht21Error<AsyncBusError<H>>> {
        self.update_user_register(|register| register.with_resolution(resolution)).await
    }

    pub async fn set_heater(&mut self, enabled: bool) -> Result<UserRegister, Sht21Error<AsyncBusError<H>>> {
        self.update_user_register(|register| register.with_heater(enabled)).await
    }
}

// --- Transactions, run while the bus is held ---

async fn run_measurement<B, T, C>(
    bus: &mut B,
    timer: &mut T,
    config: &Sht21Config,
    kind: MeasurementKind,
    cancel: &C,
) -> Result<FixedPoint, Sht21Error<B::Error>>
where
    B: Sht21BusAsync,
    T: Sht21TimerAsync,
    C: CancelToken + ?Sized,
{
    send_command(bus, config.address, Command::Measure(kind)).await?;
    let reply = poll_read::<_, _, _, REPLY_LEN>(bus, timer, config, cancel).await?;

    match decode_reply(&reply, kind) {
        Ok(raw) => {
            let value = kind.convert(raw);
            log::debug!("SHT21 {}: {} = {} (raw {:#06x})", config.address, kind, value, raw.value());
            Ok(value)
        }
        Err(e @ Sht21Error::UnexpectedMeasurementKind { .. }) => {
            log::error!("SHT21 {}: {}", config.address, e);
            Err(e)
        }
        Err(e) => {
            log::warn!("SHT21 {}: {} reply discarded: {}", config.address, kind, e);
            Err(e)
        }
    }
}

async fn read_register<B, T>(
    bus: &mut B,
    timer: &mut T,
    config: &Sht21Config,
) -> Result<UserRegister, Sht21Error<B::Error>>
where
    B: Sht21BusAsync,
    T: Sht21TimerAsync,
{
    send_command(bus, config.address, Command::ReadUserRegister).await?;
    let [bits] = poll_read::<_, _, _, 1>(bus, timer, config, &NeverCancel).await?;
    Ok(UserRegister::from_bits(bits))
}

// --- I/O helpers ---

async fn send_command<B: Sht21BusAsync>(
    bus: &mut B,
    address: Sht21Addr,
    command: Command,
) -> Result<(), Sht21Error<B::Error>> {
    log::debug!("SHT21 {}: {}", address, command);
    bus.write(address.as_u8(), &command.encode()).await.map_err(|e| {
        log::warn!("SHT21 {}: {} not sent: {:?}", address, command, e);
        Sht21Error::BusWriteFailed(e)
    })
}

async fn poll_read<B, T, C, const N: usize>(
    bus: &mut B,
    timer: &mut T,
    config: &Sht21Config,
    cancel: &C,
) -> Result<[u8; N], Sht21Error<B::Error>>
where
    B: Sht21BusAsync,
    T: Sht21TimerAsync,
    C: CancelToken + ?Sized,
{
    let address = config.address;
    let interval_us = timing::as_micros_u32(config.poll_interval);
    let start = timer.now();
    let mut buffer = [0u8; N];
    let mut attempts: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            log::debug!("SHT21 {}: cancelled after {} read attempts", address, attempts);
            return Err(Sht21Error::Cancelled);
        }

        timer.delay_us(interval_us).await;
        attempts += 1;

        match bus.read(address.as_u8(), &mut buffer).await {
            Ok(()) => return Ok(buffer),
            Err(nb::Error::WouldBlock) => {
                log::trace!("SHT21 {}: not ready (attempt {})", address, attempts);
            }
            Err(nb::Error::Other(e)) => {
                log::trace!("SHT21 {}: read attempt {} failed: {:?}", address, attempts, e);
            }
        }

        if timer.now() - start >= config.conversion_timeout {
            log::warn!("SHT21 {}: no reply within {:?}", address, config.conversion_timeout);
            return Err(Sht21Error::Timeout);
        }
    }
}

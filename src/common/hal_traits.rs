// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::Sub;
use core::time::Duration;

/// A monotonic point in time. Subtracting two instants yields the elapsed time.
///
/// `std::time::Instant` qualifies, as does any tick counter wrapped to produce
/// a `Duration`. The counter must not wrap during a single measurement.
pub trait Sht21Instant: Copy + Sub<Self, Output = Duration> {}

impl<T> Sht21Instant for T where T: Copy + Sub<T, Output = Duration> {}

/// Abstraction for the clock and delay operations the driver needs.
pub trait Sht21Timer {
    type Instant: Sht21Instant;

    /// Current time from a monotonic source.
    fn now(&mut self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Abstraction for the I2C transactions the SHT21 protocol is built from.
pub trait Sht21Bus {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Writes all of `bytes` to the device at `address`.
    ///
    /// Returns `Ok(())` only if every byte was acknowledged; there is no partial write.
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Reads exactly `buffer.len()` bytes from the device at `address`.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` while the device NACKs its address
    /// (a measurement still in progress). Other failures are returned as
    /// `Err(nb::Error::Other(Self::Error))`. The driver retries both until its timeout.
    fn read(&mut self, address: u8, buffer: &mut [u8]) -> nb::Result<(), Self::Error>;
}

impl<B: Sht21Bus + ?Sized> Sht21Bus for &mut B {
    type Error = B::Error;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, bytes)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> nb::Result<(), Self::Error> {
        (**self).read(address, buffer)
    }
}

/// Async counterpart of [`Sht21Bus`] (requires 'async' feature).
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait Sht21BusAsync {
    type Error: Debug;

    async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    async fn read(&mut self, address: u8, buffer: &mut [u8]) -> nb::Result<(), Self::Error>;
}

#[cfg(feature = "async")]
impl<B: Sht21BusAsync + ?Sized> Sht21BusAsync for &mut B {
    type Error = B::Error;

    async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, bytes).await
    }

    async fn read(&mut self, address: u8, buffer: &mut [u8]) -> nb::Result<(), Self::Error> {
        (**self).read(address, buffer).await
    }
}

/// Clock for the async driver. Waiting is done through `DelayNs`, so any
/// embedded-hal-async delay provider only needs a `now()` on top.
#[cfg(feature = "async")]
pub trait Sht21TimerAsync: embedded_hal_async::delay::DelayNs {
    type Instant: Sht21Instant;

    fn now(&mut self) -> Self::Instant;
}

/// Adapts an embedded-hal I2C peripheral to the driver's bus traits.
///
/// A NACK from the sensor is reported as `WouldBlock`, everything else as `Other`.
#[cfg(feature = "impl-native")]
#[derive(Debug)]
pub struct NativeBus<I2C> {
    i2c: I2C,
}

#[cfg(feature = "impl-native")]
impl<I2C> NativeBus<I2C> {
    pub fn new(i2c: I2C) -> Self {
        NativeBus { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

#[cfg(feature = "impl-native")]
fn classify_read_error<E: embedded_hal::i2c::Error>(error: E) -> nb::Error<E> {
    match error.kind() {
        embedded_hal::i2c::ErrorKind::NoAcknowledge(_) => nb::Error::WouldBlock,
        _ => nb::Error::Other(error),
    }
}

#[cfg(feature = "impl-native")]
impl<I2C: embedded_hal::i2c::I2c> Sht21Bus for NativeBus<I2C> {
    type Error = I2C::Error;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> nb::Result<(), Self::Error> {
        self.i2c.read(address, buffer).map_err(classify_read_error)
    }
}

#[cfg(all(feature = "async", feature = "impl-native"))]
impl<I2C: embedded_hal_async::i2c::I2c> Sht21BusAsync for NativeBus<I2C> {
    type Error = I2C::Error;

    async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes).await
    }

    async fn read(&mut self, address: u8, buffer: &mut [u8]) -> nb::Result<(), Self::Error> {
        self.i2c.read(address, buffer).await.map_err(classify_read_error)
    }
}

/// Timer backed by `std::time::Instant` and `std::thread::sleep`.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdTimer;

#[cfg(feature = "std")]
impl Sht21Timer for StdTimer {
    type Instant = std::time::Instant;

    fn now(&mut self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

#[cfg(all(test, feature = "impl-native"))]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct MockI2cError(ErrorKind);

    impl embedded_hal::i2c::Error for MockI2cError {
        fn kind(&self) -> ErrorKind {
            self.0
        }
    }

    /// Fails every read with the configured kind, accepts every write.
    struct MockI2c {
        read_error: Option<ErrorKind>,
        last_address: Option<u8>,
    }

    impl ErrorType for MockI2c {
        type Error = MockI2cError;
    }

    impl I2c for MockI2c {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            self.last_address = Some(address);
            for operation in operations {
                if let Operation::Read(buffer) = operation {
                    if let Some(kind) = self.read_error {
                        return Err(MockI2cError(kind));
                    }
                    buffer.fill(0xAB);
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_nack_maps_to_would_block() {
        let mut bus = NativeBus::new(MockI2c {
            read_error: Some(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
            last_address: None,
        });
        let mut buffer = [0u8; 3];
        assert!(matches!(Sht21Bus::read(&mut bus, 0x40, &mut buffer), Err(nb::Error::WouldBlock)));
    }

    #[test]
    fn test_other_errors_are_passed_through() {
        let mut bus = NativeBus::new(MockI2c { read_error: Some(ErrorKind::Bus), last_address: None });
        let mut buffer = [0u8; 3];
        assert_eq!(Sht21Bus::read(&mut bus, 0x40, &mut buffer), Err(nb::Error::Other(MockI2cError(ErrorKind::Bus))));
    }

    #[test]
    fn test_successful_read_and_write() {
        let mut bus = NativeBus::new(MockI2c { read_error: None, last_address: None });
        let mut buffer = [0u8; 3];
        assert_eq!(Sht21Bus::read(&mut bus, 0x40, &mut buffer), Ok(()));
        assert_eq!(buffer, [0xAB; 3]);
        assert_eq!(Sht21Bus::write(&mut bus, 0x41, &[0xF3]), Ok(()));
        assert_eq!(bus.release().last_address, Some(0x41));
    }
}

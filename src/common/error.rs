// src/common/error.rs

use super::address::InvalidAddress;
use super::bus::BusUnavailable;
use super::command::MeasurementKind;

/// Everything that can go wrong while talking to an SHT21.
///
/// `E` is the error type of the underlying bus implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Sht21Error<E = ()>
where
    E: core::fmt::Debug,
{
    /// The command could not be written to the sensor.
    #[error("bus write failed: {0:?}")]
    BusWriteFailed(E),

    /// No reply arrived before the conversion timeout elapsed.
    #[error("operation timed out")]
    Timeout,

    /// The reply failed its CRC-8 check and was discarded.
    #[error("CRC mismatch: expected {expected:#04x}, calculated {calculated:#04x}")]
    ChecksumMismatch { expected: u8, calculated: u8 },

    /// The sensor answered with the status tag of a different measurement.
    #[error("expected a {expected} reply, got status tag {status:#04b}")]
    UnexpectedMeasurementKind { expected: MeasurementKind, status: u8 },

    /// The caller cancelled the operation while it was polling.
    #[error("operation cancelled")]
    Cancelled,

    /// Another user currently holds the bus.
    #[error("bus is held by another user")]
    BusUnavailable,

    /// Not a usable 7-bit I2C device address.
    #[error("invalid I2C address: {0:#04x}")]
    InvalidAddress(u8),
}

impl<E: core::fmt::Debug> From<BusUnavailable> for Sht21Error<E> {
    fn from(_: BusUnavailable) -> Self {
        Sht21Error::BusUnavailable
    }
}

impl<E: core::fmt::Debug> From<InvalidAddress> for Sht21Error<E> {
    fn from(err: InvalidAddress) -> Self {
        Sht21Error::InvalidAddress(err.0)
    }
}

impl<E: core::fmt::Debug> Sht21Error<E> {
    /// Returns `true` for failures a later call may not hit again
    /// (the sensor was busy, the reply got corrupted, or the bus was taken).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Sht21Error::Timeout | Sht21Error::ChecksumMismatch { .. } | Sht21Error::BusUnavailable
        )
    }
}

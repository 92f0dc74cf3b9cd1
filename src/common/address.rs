// src/common/address.rs

use core::convert::TryFrom;
use core::fmt;

/// The address falls in a reserved I2C range. Converts into
/// [`Sht21Error::InvalidAddress`](super::error::Sht21Error::InvalidAddress) for any bus error type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid I2C address: {0:#04x}")]
pub struct InvalidAddress(pub u8);

/// 7-bit I2C address of an SHT21.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Sht21Addr(u8);

impl Sht21Addr {
    /// The address every SHT21 ships with (`0x80` as an 8-bit write address).
    pub const DEFAULT_ADDRESS: Sht21Addr = Sht21Addr(0x40);

    /// Creates a new `Sht21Addr` if `address` is outside the reserved I2C ranges.
    pub fn new(address: u8) -> Result<Self, InvalidAddress> {
        if Self::is_valid_address(address) {
            Ok(Sht21Addr(address))
        } else {
            Err(InvalidAddress(address))
        }
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// The address shifted into the 8-bit form used by some datasheets and HALs.
    #[inline]
    pub const fn as_write_byte(&self) -> u8 {
        self.0 << 1
    }

    #[inline]
    pub const fn is_valid_address(address: u8) -> bool {
        matches!(address, 0x08..=0x77)
    }
}

impl Default for Sht21Addr {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl TryFrom<u8> for Sht21Addr {
    type Error = InvalidAddress;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sht21Addr> for u8 {
    fn from(value: Sht21Addr) -> Self {
        value.0
    }
}

impl fmt::Display for Sht21Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

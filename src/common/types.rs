// src/common/types.rs

use core::fmt;

// --- Raw transport value ---

/// A 16-bit reading as sent by the sensor, status bits still attached.
///
/// Temperature carries up to 14 significant bits, humidity up to 12; the two
/// least significant bits are the status tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RawReading(u16);

impl RawReading {
    pub const STATUS_MASK: u16 = 0b11;

    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Builds a reading from the two data bytes, MSB first.
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }

    pub const fn value(&self) -> u16 {
        self.0
    }

    /// The 2-bit status tag.
    pub const fn status(&self) -> u8 {
        (self.0 & Self::STATUS_MASK) as u8
    }

    /// The reading with its status bits cleared, ready for conversion.
    pub const fn masked(&self) -> u16 {
        self.0 & !Self::STATUS_MASK
    }
}

// --- Converted value ---

/// A physical value in hundredths of its unit (°C or %RH).
///
/// `FixedPoint(-291)` is -2.91.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FixedPoint(i32);

impl FixedPoint {
    pub const fn from_hundredths(hundredths: i32) -> Self {
        Self(hundredths)
    }

    /// Temperature from a masked raw value: `T = -46.85 + 175.72 * raw / 2^16`.
    pub const fn from_temperature(raw: u16) -> Self {
        Self((-4685 * 16384 + 4393 * raw as i32 + 8192) / 16384)
    }

    /// Humidity from a masked raw value: `RH = -6 + 125 * raw / 2^16`,
    /// evaluated as `(-12 * 2^15 + 125 * raw + 2^14) / 2^15`.
    ///
    /// The result is twice RH in whole percent: `0x8000` (56.5 %RH) yields 113.
    pub const fn from_humidity(raw: u16) -> Self {
        Self((-12 * 32768 + 125 * raw as i32 + 16384) / 32768)
    }

    pub const fn hundredths(&self) -> i32 {
        self.0
    }

    /// Integer part, truncated toward zero.
    pub const fn whole(&self) -> i32 {
        self.0 / 100
    }

    /// Fractional hundredths, always non-negative.
    pub const fn fraction(&self) -> u32 {
        self.0.unsigned_abs() % 100
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, magnitude / 100, magnitude % 100)
    }
}

/// A temperature and humidity pair taken back to back.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// Hundredths of a degree Celsius.
    pub temperature: FixedPoint,
    /// Hundredths of a percent relative humidity.
    pub humidity: FixedPoint,
}

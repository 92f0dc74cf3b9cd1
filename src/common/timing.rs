// src/common/timing.rs

use core::time::Duration;

// These are hardware contract values from the SHT21 datasheet (Table 7),
// not tuning knobs. Override them per device through `Sht21Config`.

// === Measurement ===

/// Upper bound for a conversion to finish, measured from the command write.
/// Covers a 14-bit temperature (85 ms max) and a 12-bit humidity (29 ms max).
pub const CONVERSION_TIMEOUT: Duration = Duration::from_millis(85);
/// Sleep between read attempts while the sensor NACKs.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5);

// === Reset ===

/// Time the sensor needs after a soft reset before it accepts commands.
pub const SOFT_RESET_DURATION: Duration = Duration::from_millis(15);

/// Whole milliseconds in `duration`, saturating at `u32::MAX`.
#[inline]
pub fn as_millis_u32(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// Whole microseconds in `duration`, saturating at `u32::MAX`.
#[inline]
pub fn as_micros_u32(duration: Duration) -> u32 {
    u32::try_from(duration.as_micros()).unwrap_or(u32::MAX)
}

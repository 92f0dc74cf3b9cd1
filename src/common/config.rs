// src/common/config.rs

use super::address::Sht21Addr;
use super::timing;
use core::time::Duration;

/// Per-device settings for a driver instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Sht21Config {
    pub address: Sht21Addr,
    /// How long to keep polling for a reply after sending a measurement command.
    pub conversion_timeout: Duration,
    /// Sleep between two read attempts.
    pub poll_interval: Duration,
}

impl Sht21Config {
    pub const fn new() -> Self {
        Self {
            address: Sht21Addr::DEFAULT_ADDRESS,
            conversion_timeout: timing::CONVERSION_TIMEOUT,
            poll_interval: timing::POLL_INTERVAL,
        }
    }

    pub const fn with_address(mut self, address: Sht21Addr) -> Self {
        self.address = address;
        self
    }

    pub const fn with_conversion_timeout(mut self, timeout: Duration) -> Self {
        self.conversion_timeout = timeout;
        self
    }

    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for Sht21Config {
    fn default() -> Self {
        Self::new()
    }
}

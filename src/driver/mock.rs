// src/driver/mock.rs

//! Simulated SHT21 and clock shared by the driver tests.

use crate::common::{
    command::Command,
    crc::crc8,
    hal_traits::{Sht21Bus, Sht21Timer},
};
use core::ops::Sub;
use core::time::Duration;
use std::cell::Cell;
use std::rc::Rc;
use std::vec::Vec;

pub(crate) type Clock = Rc<Cell<u64>>;

/// Microseconds since the start of the test.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(u64);

impl Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

/// Time only moves when the driver sleeps.
#[derive(Debug, Clone)]
pub(crate) struct MockTimer {
    pub clock: Clock,
}

impl Sht21Timer for MockTimer {
    type Instant = MockInstant;

    fn now(&mut self) -> MockInstant {
        MockInstant(self.clock.get())
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.set(self.clock.get() + u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.set(self.clock.get() + u64::from(ms) * 1000);
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum MockBusError {
    WriteNack,
    ArbitrationLost,
}

/// Behaves like an SHT21 in no-hold mode: NACKs reads until the conversion is done.
#[derive(Debug)]
pub(crate) struct MockBus {
    pub clock: Clock,
    /// `None` means the conversion never finishes.
    pub conversion_us: Option<u64>,
    pub reply: [u8; 3],
    /// Answer to a humidity command, if it differs from `reply`.
    pub humidity_reply: Option<[u8; 3]>,
    pub register: u8,
    pub fail_writes: bool,
    /// Report "not ready" as a bus error instead of a NACK.
    pub not_ready_as_error: bool,
    /// When set, every transaction asserts the flag is up (the bus is held).
    pub held: Option<Rc<Cell<bool>>>,
    pub writes: Vec<Vec<u8>>,
    pub addresses: Vec<u8>,
    pub read_times_us: Vec<u64>,
    ready_at: Option<u64>,
    last_opcode: Option<u8>,
}

impl MockBus {
    pub fn new(clock: Clock, reply: [u8; 3], conversion_us: Option<u64>) -> Self {
        MockBus {
            clock,
            conversion_us,
            reply,
            humidity_reply: None,
            register: 0x02,
            fail_writes: false,
            not_ready_as_error: false,
            held: None,
            writes: Vec::new(),
            addresses: Vec::new(),
            read_times_us: Vec::new(),
            ready_at: None,
            last_opcode: None,
        }
    }

    fn check_held(&self) {
        if let Some(held) = &self.held {
            assert!(held.get(), "bus used outside of a hold");
        }
    }

    fn not_ready(&self) -> nb::Error<MockBusError> {
        if self.not_ready_as_error {
            nb::Error::Other(MockBusError::ArbitrationLost)
        } else {
            nb::Error::WouldBlock
        }
    }
}

impl Sht21Bus for MockBus {
    type Error = MockBusError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), MockBusError> {
        self.check_held();
        self.addresses.push(address);
        self.writes.push(bytes.to_vec());
        if self.fail_writes {
            return Err(MockBusError::WriteNack);
        }

        let now = self.clock.get();
        self.last_opcode = bytes.first().copied();
        match bytes {
            [0xF3] | [0xF5] => self.ready_at = self.conversion_us.map(|c| now + c),
            [Command::WRITE_USER_REGISTER, value] => self.register = *value,
            _ => {}
        }
        Ok(())
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> nb::Result<(), MockBusError> {
        self.check_held();
        self.addresses.push(address);
        let now = self.clock.get();
        self.read_times_us.push(now);

        match self.last_opcode {
            Some(Command::READ_USER_REGISTER) if buffer.len() == 1 => {
                buffer[0] = self.register;
                Ok(())
            }
            Some(opcode @ (0xF3 | 0xF5)) => match self.ready_at {
                Some(ready_at) if now >= ready_at && buffer.len() == self.reply.len() => {
                    let reply = match (opcode, self.humidity_reply) {
                        (0xF5, Some(humidity)) => humidity,
                        _ => self.reply,
                    };
                    buffer.copy_from_slice(&reply);
                    Ok(())
                }
                _ => Err(self.not_ready()),
            },
            _ => Err(self.not_ready()),
        }
    }
}

#[cfg(feature = "async")]
impl crate::common::hal_traits::Sht21BusAsync for MockBus {
    type Error = MockBusError;

    async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), MockBusError> {
        Sht21Bus::write(self, address, bytes)
    }

    async fn read(&mut self, address: u8, buffer: &mut [u8]) -> nb::Result<(), MockBusError> {
        Sht21Bus::read(self, address, buffer)
    }
}

/// Async delays advance the clock, then yield once so other tasks on the
/// same executor get to run in between.
#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for MockTimer {
    async fn delay_ns(&mut self, ns: u32) {
        self.clock.set(self.clock.get() + u64::from(ns) / 1000);
        embassy_futures::yield_now().await;
    }

    async fn delay_us(&mut self, us: u32) {
        self.clock.set(self.clock.get() + u64::from(us));
        embassy_futures::yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.clock.set(self.clock.get() + u64::from(ms) * 1000);
        embassy_futures::yield_now().await;
    }
}

#[cfg(feature = "async")]
impl crate::common::hal_traits::Sht21TimerAsync for MockTimer {
    type Instant = MockInstant;

    fn now(&mut self) -> MockInstant {
        MockInstant(self.clock.get())
    }
}

/// A reply with a valid checksum.
pub(crate) fn reply(msb: u8, lsb: u8) -> [u8; 3] {
    [msb, lsb, crc8([msb, lsb])]
}

/// 23.37 °C
pub(crate) const TEMPERATURE_REPLY: [u8; 3] = [0x66, 0x4C, 0x4F];
/// Humidity tag, converts to 113.
pub(crate) const HUMIDITY_REPLY: [u8; 3] = [0x80, 0x02, 0x41];

#[test]
fn test_canned_replies_have_valid_checksums() {
    assert_eq!(reply(0x66, 0x4C), TEMPERATURE_REPLY);
    assert_eq!(reply(0x80, 0x02), HUMIDITY_REPLY);
}

//! SHT21 command definitions.
//!
//! Every command is a single opcode byte, optionally followed by one data byte.

use arrayvec::ArrayVec;
use core::fmt;

use super::types::{FixedPoint, RawReading};
use super::user_register::UserRegister;

/// Longest encoded command: opcode plus one data byte.
pub const MAX_COMMAND_LEN: usize = 2;

/// Which physical quantity a measurement command asks for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    Temperature,
    Humidity,
}

impl MeasurementKind {
    /// Opcode of the no-hold variant: the sensor does not stretch SCL while
    /// converting and NACKs reads until the result is ready.
    pub const fn no_hold_opcode(self) -> u8 {
        match self {
            MeasurementKind::Temperature => 0xF3,
            MeasurementKind::Humidity => 0xF5,
        }
    }

    /// Status tag the sensor places in the two low bits of a reply to this kind.
    pub const fn status_tag(self) -> u8 {
        match self {
            MeasurementKind::Temperature => 0b00,
            MeasurementKind::Humidity => 0b10,
        }
    }

    /// Converts a validated reading into hundredths of this kind's unit.
    pub fn convert(self, raw: RawReading) -> FixedPoint {
        match self {
            MeasurementKind::Temperature => FixedPoint::from_temperature(raw.masked()),
            MeasurementKind::Humidity => FixedPoint::from_humidity(raw.masked()),
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementKind::Temperature => f.write_str("temperature"),
            MeasurementKind::Humidity => f.write_str("humidity"),
        }
    }
}

/// Represents an SHT21 command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Trigger a measurement in no-hold mode (`0xF3` / `0xF5`).
    Measure(MeasurementKind),
    /// Read the user register (`0xE7`), answered with one byte.
    ReadUserRegister,
    /// Write the user register (`0xE6` followed by the new value).
    WriteUserRegister(UserRegister),
    /// Soft reset (`0xFE`). The sensor needs up to 15 ms before it answers again.
    SoftReset,
}

impl Command {
    pub const READ_USER_REGISTER: u8 = 0xE7;
    pub const WRITE_USER_REGISTER: u8 = 0xE6;
    pub const SOFT_RESET: u8 = 0xFE;

    pub const fn opcode(&self) -> u8 {
        match self {
            Command::Measure(kind) => kind.no_hold_opcode(),
            Command::ReadUserRegister => Self::READ_USER_REGISTER,
            Command::WriteUserRegister(_) => Self::WRITE_USER_REGISTER,
            Command::SoftReset => Self::SOFT_RESET,
        }
    }

    /// Encodes the command into the bytes written to the bus.
    pub fn encode(&self) -> ArrayVec<u8, MAX_COMMAND_LEN> {
        let mut bytes = ArrayVec::new();
        bytes.push(self.opcode());
        if let Command::WriteUserRegister(register) = self {
            bytes.push(register.bits());
        }
        bytes
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Measure(kind) => write!(f, "measure {} ({:#04x})", kind, self.opcode()),
            Command::ReadUserRegister => write!(f, "read user register ({:#04x})", self.opcode()),
            Command::WriteUserRegister(register) => {
                write!(f, "write user register ({:#04x}) <- {:#04x}", self.opcode(), register.bits())
            }
            Command::SoftReset => write!(f, "soft reset ({:#04x})", self.opcode()),
        }
    }
}

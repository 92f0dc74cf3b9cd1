// src/driver/sync_driver/register.rs

use super::io_helpers::send_command;
use super::transaction::{read_register, update_register};
use super::{BusError, Sht21};
use crate::common::{
    bus::BusHold,
    command::Command,
    error::Sht21Error,
    hal_traits::Sht21Timer,
    timing,
    user_register::{Resolution, UserRegister},
};

// Configuration commands. Each one holds the bus for its whole exchange,
// just like a measurement.
impl<H: BusHold, T: Sht21Timer> Sht21<H, T> {
    /// Reboots the sensor and waits until it accepts commands again.
    /// The user register returns to its defaults, except the heater bit.
    pub fn soft_reset(&mut self) -> Result<(), Sht21Error<BusError<H>>> {
        let Sht21 { bus, timer, config } = self;
        bus.hold(|bus| {
            let sent = send_command(bus, config.address, Command::SoftReset);
            if sent.is_ok() {
                timer.delay_ms(timing::as_millis_u32(timing::SOFT_RESET_DURATION));
            }
            sent
        })?
    }

    pub fn read_user_register(&mut self) -> Result<UserRegister, Sht21Error<BusError<H>>> {
        let Sht21 { bus, timer, config } = self;
        bus.hold(|bus| read_register(bus, timer, config))?
    }

    /// Writes the settable bits of `register`; reserved bits keep their current value.
    /// Returns the value actually written.
    pub fn write_user_register(&mut self, register: UserRegister) -> Result<UserRegister, Sht21Error<BusError<H>>> {
        self.update_user_register(|_| register)
    }

    /// Read-modify-write of the user register under a single bus hold.
    pub fn update_user_register<F>(&mut self, update: F) -> Result<UserRegister, Sht21Error<BusError<H>>>
    where
        F: FnOnce(UserRegister) -> UserRegister,
    {
        let Sht21 { bus, timer, config } = self;
        bus.hold(|bus| update_register(bus, timer, config, update))?
    }

    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<UserRegister, Sht21Error<BusError<H>>> {
        self.update_user_register(|register| register.with_resolution(resolution))
    }

    /// The on-chip heater raises the temperature by 0.5-1.5 °C. Meant for plausibility checks.
    pub fn set_heater(&mut self, enabled: bool) -> Result<UserRegister, Sht21Error<BusError<H>>> {
        self.update_user_register(|register| register.with_heater(enabled))
    }
}

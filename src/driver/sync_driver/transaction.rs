// src/driver/sync_driver/transaction.rs

use super::io_helpers::{poll_read, send_command};
use crate::common::{
    cancel::CancelToken,
    command::{Command, MeasurementKind},
    config::Sht21Config,
    error::Sht21Error,
    hal_traits::{Sht21Bus, Sht21Timer},
    response::{decode_reply, REPLY_LEN},
    types::FixedPoint,
    user_register::UserRegister,
    NeverCancel,
};

/// One complete measurement: command, poll, validate, convert.
///
/// Must run while the bus is held; every failure is final for this call.
pub(super) fn run_measurement<B, T, C>(
    bus: &mut B,
    timer: &mut T,
    config: &Sht21Config,
    kind: MeasurementKind,
    cancel: &C,
) -> Result<FixedPoint, Sht21Error<B::Error>>
where
    B: Sht21Bus,
    T: Sht21Timer,
    C: CancelToken + ?Sized,
{
    send_command(bus, config.address, Command::Measure(kind))?;
    let reply = poll_read::<_, _, _, REPLY_LEN>(bus, timer, config, cancel)?;

    match decode_reply(&reply, kind) {
        Ok(raw) => {
            let value = kind.convert(raw);
            log::debug!("SHT21 {}: {} = {} (raw {:#06x})", config.address, kind, value, raw.value());
            Ok(value)
        }
        Err(e @ Sht21Error::UnexpectedMeasurementKind { .. }) => {
            // The sensor answered a different command: configuration or wiring problem.
            log::error!("SHT21 {}: {}", config.address, e);
            Err(e)
        }
        Err(e) => {
            log::warn!("SHT21 {}: {} reply discarded: {}", config.address, kind, e);
            Err(e)
        }
    }
}

pub(super) fn read_register<B, T>(
    bus: &mut B,
    timer: &mut T,
    config: &Sht21Config,
) -> Result<UserRegister, Sht21Error<B::Error>>
where
    B: Sht21Bus,
    T: Sht21Timer,
{
    send_command(bus, config.address, Command::ReadUserRegister)?;
    let [bits] = poll_read::<_, _, _, 1>(bus, timer, config, &NeverCancel)?;
    Ok(UserRegister::from_bits(bits))
}

/// Read-modify-write of the user register. Reserved bits keep their current value.
pub(super) fn update_register<B, T, F>(
    bus: &mut B,
    timer: &mut T,
    config: &Sht21Config,
    update: F,
) -> Result<UserRegister, Sht21Error<B::Error>>
where
    B: Sht21Bus,
    T: Sht21Timer,
    F: FnOnce(UserRegister) -> UserRegister,
{
    let current = read_register(bus, timer, config)?;
    let updated = update(current).merge_into(current);
    if updated != current {
        send_command(bus, config.address, Command::WriteUserRegister(updated))?;
    }
    Ok(updated)
}

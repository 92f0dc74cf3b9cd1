// src/driver/sync_driver/io_helpers.rs

use crate::common::{
    address::Sht21Addr,
    cancel::CancelToken,
    command::Command,
    config::Sht21Config,
    error::Sht21Error,
    hal_traits::{Sht21Bus, Sht21Timer},
    timing,
};

/// Writes one encoded command. A failed write is final: nothing is read afterwards.
pub(super) fn send_command<B: Sht21Bus>(
    bus: &mut B,
    address: Sht21Addr,
    command: Command,
) -> Result<(), Sht21Error<B::Error>> {
    log::debug!("SHT21 {}: {}", address, command);
    bus.write(address.as_u8(), &command.encode()).map_err(|e| {
        log::warn!("SHT21 {}: {} not sent: {:?}", address, command, e);
        Sht21Error::BusWriteFailed(e)
    })
}

/// Repeatedly attempts an `N`-byte read until it succeeds or the conversion
/// timeout elapses.
///
/// Sleeps one poll interval before every attempt; a NACK and a bus error both
/// count as "not ready yet". `cancel` is checked before each sleep.
pub(super) fn poll_read<B, T, C, const N: usize>(
    bus: &mut B,
    timer: &mut T,
    config: &Sht21Config,
    cancel: &C,
) -> Result<[u8; N], Sht21Error<B::Error>>
where
    B: Sht21Bus,
    T: Sht21Timer,
    C: CancelToken + ?Sized,
{
    let address = config.address;
    let interval_us = timing::as_micros_u32(config.poll_interval);
    let start = timer.now();
    let mut buffer = [0u8; N];
    let mut attempts: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            log::debug!("SHT21 {}: cancelled after {} read attempts", address, attempts);
            return Err(Sht21Error::Cancelled);
        }

        timer.delay_us(interval_us);
        attempts += 1;

        match bus.read(address.as_u8(), &mut buffer) {
            Ok(()) => {
                log::trace!("SHT21 {}: reply {:02x?} after {} attempts", address, buffer, attempts);
                return Ok(buffer);
            }
            Err(nb::Error::WouldBlock) => {
                log::trace!("SHT21 {}: not ready (attempt {})", address, attempts);
            }
            Err(nb::Error::Other(e)) => {
                log::trace!("SHT21 {}: read attempt {} failed: {:?}", address, attempts, e);
            }
        }

        if timer.now() - start >= config.conversion_timeout {
            log::warn!(
                "SHT21 {}: no reply within {:?} ({} attempts)",
                address,
                config.conversion_timeout,
                attempts
            );
            return Err(Sht21Error::Timeout);
        }
    }
}

// src/common/response.rs

use super::command::MeasurementKind;
use super::crc::verify_reply;
use super::error::Sht21Error;
use super::types::RawReading;

/// Length of a measurement reply: two data bytes and a checksum.
pub const REPLY_LEN: usize = 3;

/// Validates a measurement reply for `kind`.
///
/// Checks the CRC first, then the status tag. Only a reading that passes both
/// is returned; the caller converts it with [`MeasurementKind::convert`].
pub fn decode_reply<E>(reply: &[u8; REPLY_LEN], kind: MeasurementKind) -> Result<RawReading, Sht21Error<E>>
where
    E: core::fmt::Debug,
{
    let raw = RawReading::from_bytes(verify_reply(reply)?);
    if raw.status() != kind.status_tag() {
        return Err(Sht21Error::UnexpectedMeasurementKind { expected: kind, status: raw.status() });
    }
    Ok(raw)
}

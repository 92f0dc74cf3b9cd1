// src/common/crc.rs

use super::error::Sht21Error;
use crc::{Algorithm, Crc};

/// CRC-8 used by the SHT21 to protect each 16-bit reading.
/// Polynomial: x^8 + x^5 + x^4 + 1 (0x131, 0x31 once the implicit top bit is dropped)
/// Initial Value: 0x00
/// Input Reflected: false
/// Output Reflected: false
/// Final XOR: 0x00
/// Check Value: 0xA2 (for "123456789")
/// Residue: 0x00
pub const SHT21_CRC: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0x00,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xA2,
    residue: 0x00,
};

const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&SHT21_CRC);

/// Calculates the checksum the sensor appends after the two data bytes.
#[inline]
pub fn crc8(bytes: [u8; 2]) -> u8 {
    CRC_COMPUTER.checksum(&bytes)
}

/// Returns `true` iff `expected` is the checksum of `bytes`.
#[inline]
pub fn verify(bytes: [u8; 2], expected: u8) -> bool {
    crc8(bytes) == expected
}

/// Verifies a 3-byte reply (`data MSB`, `data LSB`, `checksum`).
///
/// # Returns
///
/// * `Ok([msb, lsb])` if the checksum matches.
/// * `Err(Sht21Error::ChecksumMismatch)` otherwise.
pub fn verify_reply<E>(reply: &[u8; 3]) -> Result<[u8; 2], Sht21Error<E>>
where
    E: core::fmt::Debug,
{
    let data = [reply[0], reply[1]];
    let calculated = crc8(data);
    if calculated == reply[2] {
        Ok(data)
    } else {
        Err(Sht21Error::ChecksumMismatch { expected: reply[2], calculated })
    }
}

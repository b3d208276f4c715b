//! CRC-8 frame checksum.
//!
//! Polynomial 0x07, initial value 0, no reflection, no final XOR.  This is the
//! catalogued CRC-8/SMBUS algorithm, so the table-driven implementation from
//! the `crc` crate produces exactly the same value as the byte-by-byte
//! shift-and-XOR loop the bridge firmware historically used.

use crc::{Crc, CRC_8_SMBUS};

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// Computes the CRC-8 checksum of `data`.
#[inline]
#[must_use]
pub fn crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

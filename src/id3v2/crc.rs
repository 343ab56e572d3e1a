extern crate crc;
use self::crc::crc32::checksum_ieee;

use crate::tools::{decode_int_be_u32, encode_int_be_u32};

/// CRC-32 (IEEE polynomial) of `input`, big-endian as stored in the
/// v2.3 extended header.
pub fn calculate(input: &[u8]) -> [u8; 4] {
    encode_int_be_u32(checksum_ieee(input))
}

pub fn validate(input: &[u8], expected: [u8; 4]) -> bool {
    checksum_ieee(input) == decode_int_be_u32(&expected)
}

pub mod encoding;

use std::io;
use std::io::prelude::*;

use crate::Error;

pub fn header_not_found(err: &str) -> Error {
    Error::HeaderNotFound(err.to_string())
}
pub fn structure_error(err: &str) -> Error {
    Error::StructureError(err.to_string())
}
pub fn unsupported(err: &str) -> Error {
    Error::UnsupportedError(err.to_string())
}

// a declared size running past the end of the input is a malformed tag,
// not a failing stream
pub fn read_declared<T: Read>(input: &mut T, buf: &mut [u8], what: &str) -> Result<(), Error> {
    match input.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::StructureError(
            format!("{} declares {} bytes, input ends early", what, buf.len()),
        )),
        Err(e) => Err(Error::IOError(e)),
    }
}

pub fn decode_int_be_u32(input: &[u8]) -> u32 {
    debug_assert!(input.len() <= 4, "u32 holds at most 4 bytes");
    let mut result: u32 = 0;
    for b in input.iter() {
        result = (result << 8) | *b as u32;
    }
    result
}
pub fn decode_int_be_u64(input: &[u8]) -> u64 {
    debug_assert!(input.len() <= 8, "u64 holds at most 8 bytes");
    let mut result: u64 = 0;
    for b in input.iter() {
        result = (result << 8) | *b as u64;
    }
    result
}
pub fn encode_int_be_u16(input: u16) -> [u8; 2] {
    [(input >> 8) as u8, input as u8]
}
pub fn encode_int_be_u32(input: u32) -> [u8; 4] {
    let mut result = [0; 4];
    for i in 0..4 {
        result[i] = ((input & 0xFF000000 >> 8 * i) >> 8 * (3 - i)) as u8;
    }
    result
}

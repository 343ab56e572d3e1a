//! The ID3v1 trailer is only detected here, never parsed.

use std::io::prelude::*;
use std::io::SeekFrom;

use crate::Error;

pub const TRAILER_LEN: u64 = 128;

/// Checks for the "TAG" marker 128 bytes before the end of `input`.
/// The caller makes sure `input` is at least that long.
pub fn has_id3v1<T: Read + Seek>(input: &mut T) -> Result<bool, Error> {
    let mut arr: [u8; 3] = [0; 3];
    input.seek(SeekFrom::End(-(TRAILER_LEN as i64)))?;
    input.read_exact(&mut arr)?;
    Ok(&arr == b"TAG")
}

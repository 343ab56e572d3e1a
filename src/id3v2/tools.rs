use crate::id3v2::regex::is_frame_id;
use crate::Error;

/// Removes the 0x00 that unsynchronisation put after every 0xFF.
pub fn strip(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut after_ff = false;
    for &b in input.iter() {
        if after_ff && b == 0x00 {
            after_ff = false;
            continue;
        }
        out.push(b);
        after_ff = b == 0xFF;
    }
    out
}

/// Inserts a 0x00 after every 0xFF that precedes 0x00 or a byte >= 0xE0.
pub fn stuff(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() + input.len() / 16);
    for (i, &b) in input.iter().enumerate() {
        out.push(b);
        if b == 0xFF {
            match input.get(i + 1) {
                Some(&next) if next == 0x00 || next >= 0xE0 => out.push(0x00),
                _ => (),
            }
        }
    }
    out
}

pub fn decode_synch_int(input: &[u8]) -> Result<u32, Error> {
    if input.len() > 5 {
        return Err(Error::StructureError(format!(
            "Synchsafe ints are limited to 32 bits"
        )));
    }
    let mut result: u32 = 0;
    for (i, b) in input.iter().enumerate() {
        // verify that this is a valid synchsafe int
        // (by checking that the msb of each byte is zero)
        if b & 0x80 != 0 {
            return Err(Error::StructureError(format!(
                "Invalid synch-safe byte at position {}",
                i
            )));
        }
        // if so, transform to proper uint by
        // moving the 7 bit parts to proper places
        // (0000 0001 0111 1111 => 1111 1111)
        result |= (*b as u32) << (7 * (input.len() - 1 - i));
    }
    Ok(result)
}

pub fn encode_synch_int(input: u32, use_fifth_bit: bool) -> Result<Vec<u8>, Error> {
    // request >28 bit explicitly
    if input > 0x0FFFFFFF && !use_fifth_bit {
        Err(Error::StructureError(format!(
            "{} uses more than 28 bits, but use fifth bit option is not enabled.",
            input
        )))
    } else {
        let mut result = Vec::with_capacity(5);

        if use_fifth_bit {
            result.push((input >> 28) as u8);
        }
        for i in 0..4 {
            let mut r = input & (0x0FE00000 >> (7 * i));
            r = r >> (7 * (3 - i));

            result.push(r as u8);
        }
        Ok(result)
    }
}

/// The fixed 4-byte form used by tag, frame and extended header sizes.
pub fn encode_synch_u28(input: u32) -> Result<[u8; 4], Error> {
    let v = encode_synch_int(input, false)?;
    Ok([v[0], v[1], v[2], v[3]])
}

/// Any four bytes without 0x00 are kept as a frame id; a 0x00 in the id
/// position starts the padding.
pub fn is_stored_frame_id(id: &[u8]) -> bool {
    id.len() == 4 && !id.contains(&0x00)
}

pub fn decode_frame_id(input: &[u8]) -> Result<String, Error> {
    let s = String::from_utf8_lossy(input);
    if is_frame_id(&s) {
        Ok(s.into_owned())
    } else {
        Err(Error::StructureError(format!(
            "Cannot decode {:X?}: Invalid frame ID (contains characters that are not A-Z or 0-9)",
            input
        )))
    }
}
pub fn encode_frame_id(input: &str) -> Result<[u8; 4], Error> {
    if !is_frame_id(input) {
        return Err(Error::StructureError(format!(
            "Cannot encode \"{}\": Invalid frame ID (needs exactly four A-Z or 0-9 characters)",
            input
        )));
    }
    let mut v = [0; 4];
    v.copy_from_slice(input.as_bytes());
    Ok(v)
}

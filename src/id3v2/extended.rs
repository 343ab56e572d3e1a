use crate::id3v2::structure::{ExtendedHeaderV3, ExtendedHeaderV4};
use crate::id3v2::tools::{decode_synch_int, encode_synch_int, encode_synch_u28};
use crate::tools::{decode_int_be_u32, encode_int_be_u32, structure_error};
use crate::Error;

const V4_UPDATE: u8 = 0b0100_0000;
const V4_CRC: u8 = 0b0010_0000;
const V4_RESTRICTION: u8 = 0b0001_0000;

// Extended header size   $xx xx xx xx   (6 or 10, excludes itself)
// Extended Flags         $xx xx         (%x0000000 00000000)
// Size of padding        $xx xx xx xx
// [Total frame CRC       $xx xx xx xx]
pub fn read_v3(data: &[u8]) -> Result<(ExtendedHeaderV3, usize), Error> {
    if data.len() < 10 {
        return Err(structure_error("ID3v2.3 extended header is truncated"));
    }
    let size = decode_int_be_u32(&data[0..4]) as usize;
    let total = size + 4;
    if size < 6 || total > data.len() {
        return Err(Error::StructureError(format!(
            "ID3v2.3 extended header declares {} bytes, {} available",
            size,
            data.len() - 4
        )));
    }
    let crc_present = data[4] & 0x80 != 0;
    let padding_size = decode_int_be_u32(&data[6..10]);

    let crc32 = if crc_present {
        if size < 10 {
            return Err(structure_error(
                "ID3v2.3 extended header flags a CRC but is too short to hold one",
            ));
        }
        let mut crc = [0; 4];
        crc.copy_from_slice(&data[10..14]);
        Some(crc)
    } else {
        None
    };

    Ok((
        ExtendedHeaderV3 {
            padding_size,
            crc32,
        },
        total,
    ))
}

pub fn write_v3(header: &ExtendedHeaderV3) -> Vec<u8> {
    let mut vec = Vec::with_capacity(14);
    match header.crc32 {
        Some(crc) => {
            vec.extend_from_slice(&encode_int_be_u32(10));
            vec.extend_from_slice(b"\x80\x00");
            vec.extend_from_slice(&encode_int_be_u32(header.padding_size));
            vec.extend_from_slice(&crc);
        }
        None => {
            vec.extend_from_slice(&encode_int_be_u32(6));
            vec.extend_from_slice(b"\x00\x00");
            vec.extend_from_slice(&encode_int_be_u32(header.padding_size));
        }
    }
    vec
}

// Extended header size   4 * %0xxxxxxx  (whole extended header)
// Number of flag bytes   $01
// Extended Flags         $xx            (%0bcd0000)
// then per set flag, in bit order: length byte + data
pub fn read_v4(data: &[u8]) -> Result<(ExtendedHeaderV4, usize), Error> {
    if data.len() < 6 {
        return Err(structure_error("ID3v2.4 extended header is truncated"));
    }
    let size = decode_synch_int(&data[0..4])? as usize;
    if size < 6 || size > data.len() {
        return Err(Error::StructureError(format!(
            "ID3v2.4 extended header declares {} bytes, {} available",
            size,
            data.len()
        )));
    }
    let flag_bytes = data[4] as usize;
    if flag_bytes != 1 {
        return Err(Error::StructureError(format!(
            "ID3v2.4 extended header has {} flag bytes, expected 1",
            flag_bytes
        )));
    }
    let flags = data[5];

    let body = &data[6..size];
    let mut pos = 0;
    let update_tag = flags & V4_UPDATE != 0;
    if update_tag {
        take(body, &mut pos, "update", 0)?;
    }
    let crc32 = if flags & V4_CRC != 0 {
        Some(decode_synch_int(take(body, &mut pos, "CRC", 5)?)?)
    } else {
        None
    };
    let restriction = if flags & V4_RESTRICTION != 0 {
        Some(take(body, &mut pos, "restriction", 1)?[0])
    } else {
        None
    };

    Ok((
        ExtendedHeaderV4 {
            update_tag,
            crc32,
            restriction,
        },
        size,
    ))
}

// returns the data belonging to one v2.4 extended header flag
fn take<'a>(body: &'a [u8], pos: &mut usize, name: &str, expected: usize) -> Result<&'a [u8], Error> {
    let len = match body.get(*pos) {
        Some(l) => *l as usize,
        None => {
            return Err(Error::StructureError(format!(
                "ID3v2.4 extended header misses {} data",
                name
            )))
        }
    };
    if len != expected || *pos + 1 + len > body.len() {
        return Err(Error::StructureError(format!(
            "ID3v2.4 extended header {} data has length {}, expected {}",
            name, len, expected
        )));
    }
    let out = &body[*pos + 1..*pos + 1 + len];
    *pos += 1 + len;
    Ok(out)
}

pub fn write_v4(header: &ExtendedHeaderV4) -> Result<Vec<u8>, Error> {
    let mut flags = 0;
    let mut body = Vec::with_capacity(8);
    if header.update_tag {
        flags |= V4_UPDATE;
        body.push(0x00);
    }
    if let Some(crc) = header.crc32 {
        flags |= V4_CRC;
        body.push(0x05);
        body.append(&mut encode_synch_int(crc, true)?);
    }
    if let Some(r) = header.restriction {
        flags |= V4_RESTRICTION;
        body.push(0x01);
        body.push(r);
    }

    let mut vec = Vec::with_capacity(6 + body.len());
    vec.extend_from_slice(&encode_synch_u28(6 + body.len() as u32)?);
    vec.push(0x01);
    vec.push(flags);
    vec.append(&mut body);
    Ok(vec)
}

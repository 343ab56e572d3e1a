use std::io::prelude::*;
use std::io::SeekFrom;

use crate::id3v2::crc;
use crate::id3v2::extended;
use crate::id3v2::flags;
use crate::id3v2::structure::*;
use crate::id3v2::tools::*;
use crate::tools::{decode_int_be_u32, header_not_found, read_declared, structure_error};
use crate::Error;

pub const HEADER_LEN: usize = 10;

pub fn header_bytes<T: Read>(input: &mut T) -> Result<[u8; HEADER_LEN], Error> {
    let mut arr = [0; HEADER_LEN];
    match input.read_exact(&mut arr) {
        Ok(()) => Ok(arr),
        Err(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(header_not_found("Input is shorter than an ID3v2 header"))
        }
        Err(e) => Err(Error::IOError(e)),
    }
}

pub fn header(arr: &[u8; HEADER_LEN]) -> Result<TagHeader, Error> {
    // ID3v2/file identifier      "ID3"
    if &arr[0..3] != b"ID3" {
        return Err(header_not_found("ID3v2 header not found"));
    }

    // ID3v2 version              $0X 00
    let version = match Version::from_major(arr[3]) {
        Some(v) => v,
        None => {
            return Err(Error::UnsupportedError(format!(
                "ID3v2.{} is not supported",
                arr[3]
            )))
        }
    };
    if arr[4] == 0xFF {
        return Err(structure_error("Invalid ID3v2 revision"));
    }

    // ID3v2 flags                %abcd0000
    let flags = arr[5];
    let flags = HeaderFlags {
        unsynchronisation: flags & 0b10000000 != 0,
        extended_header: flags & 0b01000000 != 0,
        experimental: flags & 0b00100000 != 0,
        footer: flags & 0b00010000 != 0,
    };
    if arr[5] & 0x0F != 0 || (flags.footer && version == Version::V3) {
        return Err(Error::StructureError(format!(
            "Unsupported flags {:08b} found in ID3v2.{} header",
            arr[5],
            version.major()
        )));
    }

    Ok(TagHeader {
        version,
        revision: arr[4],
        flags,
        size: decode_synch_int(&arr[6..10])?,
    })
}

/// Moves `input` past a leading ID3v2 tag of any version, footer included.
/// Without a tag, `input` is left at the start and `false` is returned.
pub fn skip_tag<T: Read + Seek>(input: &mut T) -> Result<bool, Error> {
    input.seek(SeekFrom::Start(0))?;
    let mut arr = [0; HEADER_LEN];
    let found = match input.read_exact(&mut arr) {
        Ok(()) => &arr[0..3] == b"ID3",
        Err(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof => false,
        Err(e) => return Err(Error::IOError(e)),
    };
    if !found {
        input.seek(SeekFrom::Start(0))?;
        return Ok(false);
    }
    let mut len = HEADER_LEN as u64 + decode_synch_int(&arr[6..10])? as u64;
    if arr[3] == 4 && arr[5] & 0b00010000 != 0 {
        len += HEADER_LEN as u64;
    }
    debug!("Skipping {} byte ID3v2.{} tag", len, arr[3]);
    input.seek(SeekFrom::Start(len))?;
    Ok(true)
}

/// Reads the complete tag at the start of `input`.
pub fn tag<T: Read + Seek>(input: &mut T) -> Result<TagInfo, Error> {
    input.seek(SeekFrom::Start(0))?;
    let header = header(&header_bytes(input)?)?;
    debug!(
        "Found ID3v2.{}.{} tag, {} bytes",
        header.version.major(),
        header.revision,
        header.size
    );

    let mut body = vec![0; header.size as usize];
    read_declared(input, &mut body, "Tag header")?;

    if header.flags.footer {
        let mut footer = [0; HEADER_LEN];
        read_declared(input, &mut footer, "Tag footer flag")?;
        if &footer[0..3] != b"3DI" {
            return Err(structure_error("ID3v2.4 footer not found after tag body"));
        }
    }

    body_frames(header, body)
}

// 4: Frame ID      $xx xx xx xx  (four characters)
// 4: Size      4 * %0xxxxxxx in 2.4 / $xx in 2.3
// 2: Flags         $xx xx
fn frame_size(arr: &[u8], version: Version) -> Result<usize, Error> {
    Ok(match version {
        Version::V3 => decode_int_be_u32(&arr[4..8]),
        Version::V4 => decode_synch_int(&arr[4..8])?,
    } as usize)
}

/// Parses everything after the tag header.
pub fn body_frames(header: TagHeader, body: Vec<u8>) -> Result<TagInfo, Error> {
    let version = header.version;
    let body = if header.flags.unsynchronisation {
        strip(&body)
    } else {
        body
    };

    let mut pos = 0;
    let extended_header = if header.flags.extended_header {
        let (ext, used) = match version {
            Version::V3 => {
                let (h, used) = extended::read_v3(&body)?;
                (ExtendedHeader::V3(h), used)
            }
            Version::V4 => {
                let (h, used) = extended::read_v4(&body)?;
                (ExtendedHeader::V4(h), used)
            }
        };
        pos = used;
        Some(ext)
    } else {
        None
    };

    let frames_start = pos;
    let mut frames = Vec::new();
    while body.len() - pos >= HEADER_LEN {
        let arr = &body[pos..pos + HEADER_LEN];
        if !is_stored_frame_id(&arr[0..4]) {
            debug!("Padding starts at byte {} of the tag body", pos);
            break;
        }
        let size = frame_size(arr, version)?;
        let available = body.len() - pos - HEADER_LEN;
        let mut id = [0; 4];
        id.copy_from_slice(&arr[0..4]);
        if size > available {
            return Err(Error::StructureError(format!(
                "Frame {} declares {} bytes, {} left in tag",
                String::from_utf8_lossy(&id),
                size,
                available
            )));
        }
        let options = flags::decode([arr[8], arr[9]], version);
        let start = pos + HEADER_LEN;
        frames.push(RawFrame::new(id, body[start..start + size].to_vec(), options));
        pos = start + size;
    }

    match extended_header {
        Some(ExtendedHeader::V3(ExtendedHeaderV3 {
            crc32: Some(expected),
            ..
        })) => {
            let data = &body[frames_start..pos];
            if !crc::validate(data, expected) {
                return Err(Error::ChecksumError {
                    expected: decode_int_be_u32(&expected),
                    actual: decode_int_be_u32(&crc::calculate(data)),
                });
            }
            debug!("CRC over {} bytes of frames verified", data.len());
        }
        Some(ExtendedHeader::V4(ExtendedHeaderV4 {
            crc32: Some(crc), ..
        })) => {
            warn!("ID3v2.4 tag CRC {:08X} is not verified", crc);
        }
        _ => (),
    }

    Ok(TagInfo {
        header,
        extended_header,
        frames,
        padding: (body.len() - pos) as u32,
    })
}

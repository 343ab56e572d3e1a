use crate::id3v2::crc;
use crate::id3v2::extended;
use crate::id3v2::flags;
use crate::id3v2::read::HEADER_LEN;
use crate::id3v2::structure::*;
use crate::id3v2::text::TextCodec;
use crate::id3v2::tools::*;
use crate::id3v2::TagContainer;
use crate::tools::{encode_int_be_u32, structure_error, unsupported};
use crate::Error;

// 10 byte frame header followed by the payload
fn frame_bytes(vec: &mut Vec<u8>, raw: &RawFrame, version: Version) -> Result<(), Error> {
    // frame id
    let id = raw.id();
    if !is_stored_frame_id(&id) {
        return Err(Error::StructureError(format!(
            "Frame id {:02X?} contains 0x00",
            id
        )));
    }
    vec.extend_from_slice(&id);
    // size
    let len = raw.payload().len();
    match version {
        Version::V3 => {
            if len > u32::MAX as usize {
                return Err(Error::StructureError(format!(
                    "Frame {} is too large for ID3v2.3",
                    raw.id_str()
                )));
            }
            vec.extend_from_slice(&encode_int_be_u32(len as u32));
        }
        Version::V4 => {
            if len > 0x0FFFFFFF {
                return Err(Error::StructureError(format!(
                    "Frame {} is too large for ID3v2.4",
                    raw.id_str()
                )));
            }
            vec.extend_from_slice(&encode_synch_u28(len as u32)?);
        }
    }
    // flags
    vec.extend_from_slice(&flags::encode(raw.options(), version)?);
    vec.extend_from_slice(raw.payload());
    Ok(())
}

fn check_container(c: &TagContainer) -> Result<(), Error> {
    if c.revision == 0xFF {
        return Err(structure_error("Revision 0xFF is not a valid ID3v2 revision"));
    }
    if c.version == Version::V3 {
        if c.footer {
            return Err(structure_error("Tag footers need ID3v2.4"));
        }
        if c.update_tag || c.restriction.is_some() {
            return Err(structure_error(
                "Update and restriction extended header fields need ID3v2.4",
            ));
        }
    }
    if c.version == Version::V4 && c.crc {
        return Err(unsupported("Writing an ID3v2.4 tag CRC is not supported"));
    }
    Ok(())
}

/// Builds the complete tag (header, extended header, frames, padding and
/// footer). Fails before producing anything if a frame or flag cannot be
/// expressed in the container's version.
pub fn tag(c: &TagContainer) -> Result<Vec<u8>, Error> {
    check_container(c)?;
    let codec = TextCodec::new(c.code_page)?;
    let version = c.version;

    let mut frames = Vec::new();
    for frame in c.frames.iter() {
        let raw = frame.convert(version, &codec)?;
        frame_bytes(&mut frames, &raw, version)?;
    }

    // padding and footer don't go together
    let padding = if c.footer { 0 } else { c.padding };

    let has_extended = c.extended_header || c.crc || c.update_tag || c.restriction.is_some();
    let ext = match (has_extended, version) {
        (false, _) => Vec::new(),
        (true, Version::V3) => extended::write_v3(&ExtendedHeaderV3 {
            padding_size: padding,
            crc32: if c.crc {
                Some(crc::calculate(&frames))
            } else {
                None
            },
        }),
        (true, Version::V4) => extended::write_v4(&ExtendedHeaderV4 {
            update_tag: c.update_tag,
            crc32: None,
            restriction: c.restriction,
        })?,
    };

    let mut flags = 0;
    if c.unsynchronisation {
        flags |= 0b10000000;
    }
    if has_extended {
        flags |= 0b01000000;
    }
    if c.experimental {
        flags |= 0b00100000;
    }
    if c.footer {
        flags |= 0b00010000;
    }

    let mut vec: Vec<u8> =
        Vec::with_capacity(HEADER_LEN * 2 + ext.len() + frames.len() + padding as usize);
    vec.extend_from_slice(b"ID3");
    vec.push(version.major());
    vec.push(c.revision);
    vec.push(flags);
    vec.extend_from_slice(b"\x00\x00\x00\x00"); // [6..10] - reserve for size
    vec.extend_from_slice(&ext);
    vec.extend_from_slice(&frames);
    vec.resize(vec.len() + padding as usize, 0);

    if c.unsynchronisation {
        let stuffed = stuff(&vec[HEADER_LEN..]);
        vec.truncate(HEADER_LEN);
        vec.extend_from_slice(&stuffed);
        // a final 0xFF would run into the audio
        if vec.last() == Some(&0xFF) {
            vec.push(0x00);
        }
    }

    // calculate final size
    let size = encode_synch_u28((vec.len() - HEADER_LEN) as u32)?;
    vec[6..10].copy_from_slice(&size);

    if c.footer {
        let mut footer = [0; HEADER_LEN];
        footer.copy_from_slice(&vec[0..HEADER_LEN]);
        footer[0..3].copy_from_slice(b"3DI");
        vec.extend_from_slice(&footer);
    }

    debug!(
        "Built ID3v2.{} tag: {} frames, {} bytes of padding, {} bytes total",
        version.major(),
        c.frames.len(),
        padding,
        vec.len()
    );
    Ok(vec)
}

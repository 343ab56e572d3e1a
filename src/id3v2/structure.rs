use std::borrow::Cow;

use crate::id3v2::tools::{decode_synch_int, strip};
use crate::tools::{structure_error, unsupported};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    V3,
    V4,
}

impl Version {
    pub fn from_major(major: u8) -> Option<Version> {
        match major {
            3 => Some(Version::V3),
            4 => Some(Version::V4),
            _ => None,
        }
    }
    pub fn major(self) -> u8 {
        match self {
            Version::V3 => 3,
            Version::V4 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderFlags {
    pub unsynchronisation: bool,
    pub extended_header: bool,
    pub experimental: bool,
    // v2.4 only
    pub footer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub version: Version,
    pub revision: u8,
    pub flags: HeaderFlags,
    /// Body size in bytes, excluding header and footer. At most 28 bits.
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedHeaderV3 {
    pub padding_size: u32,
    pub crc32: Option<[u8; 4]>,
}

impl ExtendedHeaderV3 {
    pub fn crc_present(&self) -> bool {
        self.crc32.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtendedHeaderV4 {
    pub update_tag: bool,
    pub crc32: Option<u32>,
    pub restriction: Option<u8>,
}

impl ExtendedHeaderV4 {
    pub fn crc_present(&self) -> bool {
        self.crc32.is_some()
    }
    pub fn restriction_present(&self) -> bool {
        self.restriction.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedHeader {
    V3(ExtendedHeaderV3),
    V4(ExtendedHeaderV4),
}

/// Frame status and format flags. Where each one lives on disk depends on
/// the tag version, see `flags.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameOptions {
    pub tag_alter_preservation: bool,
    pub file_alter_preservation: bool,
    pub read_only: bool,
    pub grouping_identity: bool,
    pub compression: bool,
    pub encryption: bool,
    // v2.4 only
    pub unsynchronisation: bool,
    pub data_length_indicator: bool,
}

/// A frame exactly as stored in the tag: id, flags and undecoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    id: [u8; 4],
    payload: Vec<u8>,
    options: FrameOptions,
}

impl RawFrame {
    pub fn new(id: [u8; 4], payload: Vec<u8>, options: FrameOptions) -> RawFrame {
        RawFrame {
            id,
            payload,
            options,
        }
    }

    /// Builds a frame from a textual id, which must be exactly 4 bytes.
    pub fn with_id(id: &str, payload: Vec<u8>, options: FrameOptions) -> Result<RawFrame, Error> {
        let bytes = id.as_bytes();
        if bytes.len() != 4 {
            return Err(Error::StructureError(format!(
                "Frame ID \"{}\" is not 4 bytes long",
                id
            )));
        }
        let mut arr = [0; 4];
        arr.copy_from_slice(bytes);
        Ok(RawFrame::new(arr, payload, options))
    }

    pub fn id(&self) -> [u8; 4] {
        self.id
    }
    pub fn id_str(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.id)
    }
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
    pub fn options(&self) -> FrameOptions {
        self.options
    }

    /// The payload as a frame body decoder should see it.
    ///
    /// Skips the v2.4 data length indicator and undoes per-frame
    /// unsynchronisation, unless the whole tag body was already
    /// resynchronised (`tag_unsynchronised`). Compressed and encrypted
    /// payloads cannot be interpreted here.
    pub fn content(&self, tag_unsynchronised: bool) -> Result<Cow<[u8]>, Error> {
        if self.options.compression {
            return Err(unsupported("Compressed frames are not supported"));
        }
        if self.options.encryption {
            return Err(unsupported("Encrypted frames are not supported"));
        }
        let mut data = &self.payload[..];
        let mut declared = None;
        if self.options.data_length_indicator {
            if data.len() < 4 {
                return Err(structure_error("Frame too short for its data length indicator"));
            }
            declared = Some(decode_synch_int(&data[0..4])? as usize);
            data = &data[4..];
        }
        let data = if self.options.unsynchronisation && !tag_unsynchronised {
            Cow::Owned(strip(data))
        } else {
            Cow::Borrowed(data)
        };
        if let Some(n) = declared {
            if n != data.len() {
                warn!(
                    "Frame {} declares {} content bytes, found {}",
                    self.id_str(),
                    n,
                    data.len()
                );
            }
        }
        Ok(data)
    }
}

/// Everything `read` found in a tag, frames in on-disk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub header: TagHeader,
    pub extended_header: Option<ExtendedHeader>,
    pub frames: Vec<RawFrame>,
    /// Bytes left in the body after the last frame.
    pub padding: u32,
}

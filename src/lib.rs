#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;

mod id3v1;
pub mod id3v2;

mod dispatch;
mod tools;

pub use crate::dispatch::determine_tag_status;
pub use crate::dispatch::read_tag;
pub use crate::dispatch::write_tag;
pub use crate::dispatch::TagStatus;

pub use crate::id3v2::decode_frames;
pub use crate::id3v2::frames::Frame;
pub use crate::id3v2::structure::{
    ExtendedHeader, ExtendedHeaderV3, ExtendedHeaderV4, FrameOptions, HeaderFlags, RawFrame,
    TagHeader, TagInfo, Version,
};
pub use crate::id3v2::text::{TextCodec, TextEncoding};
pub use crate::id3v2::TagContainer;
pub use crate::tools::encoding::CodePage;

use std::io;

#[derive(Debug)]
pub enum Error {
    IOError(io::Error),
    HeaderNotFound(String),
    StructureError(String),
    ChecksumError { expected: u32, actual: u32 },
    UnsupportedError(String),
}

use std::fmt;
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::IOError(ref e) => write!(f, "IO error: {}", e),
            Error::HeaderNotFound(ref e) => write!(f, "Tag header not found: {}", e),
            Error::StructureError(ref e) => write!(f, "Malformed tag: {}", e),
            Error::ChecksumError { expected, actual } => write!(
                f,
                "CRC mismatch: tag declares {:08X}, frames hash to {:08X}",
                expected, actual
            ),
            Error::UnsupportedError(ref e) => write!(f, "Unsupported: {}", e),
        }
    }
}

use std::error;
impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IOError(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IOError(err)
    }
}

use std::any::Any;

use super::{plain, Frame, FrameImport};
use crate::id3v2::structure::{FrameOptions, RawFrame, Version};
use crate::id3v2::text::{write_var_uint, FrameReader, TextCodec};
use crate::Error;

/// `PCNT`: how often the file was played. At least 32 bits wide on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayCounterFrame {
    count: u64,
    options: FrameOptions,
}

impl PlayCounterFrame {
    pub fn new(count: u64) -> PlayCounterFrame {
        PlayCounterFrame {
            count,
            options: FrameOptions::default(),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Frame for PlayCounterFrame {
    fn id(&self) -> [u8; 4] {
        *b"PCNT"
    }

    fn convert(&self, _version: Version, _codec: &TextCodec) -> Result<RawFrame, Error> {
        let mut buf = Vec::with_capacity(4);
        write_var_uint(&mut buf, self.count);
        Ok(RawFrame::new(*b"PCNT", buf, plain(self.options)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl FrameImport for PlayCounterFrame {
    fn import(raw: &RawFrame, content: &[u8], _codec: &TextCodec) -> Result<PlayCounterFrame, Error> {
        Ok(PlayCounterFrame {
            count: FrameReader::new(content).read_var_uint()?,
            options: raw.options(),
        })
    }
}

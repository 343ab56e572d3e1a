use std::io::prelude::*;

use crate::tools::encoding::CodePage;
use crate::tools::header_not_found;
use crate::Error;

pub mod crc;
pub mod extended;
pub mod flags;
pub mod frames;
mod read;
mod regex;
pub mod structure;
pub mod text;
pub mod tools;
mod write;

use self::frames::{decode_frame, Frame};
use self::structure::*;
use self::text::TextCodec;

/// Reads the ID3v2 tag at the start of `input`.
pub fn read<T: Read + Seek>(input: &mut T) -> Result<TagInfo, Error> {
    read::tag(input)
}

/// Writes the tag described by `container` to `output`, followed by the
/// audio of `input`. A tag already at the start of `input` is dropped.
///
/// Nothing is written when the container cannot be encoded; the output
/// should still be a scratch stream, as a failing write leaves it partial.
pub fn write<R: Read + Seek, W: Write>(
    container: &TagContainer,
    input: &mut R,
    output: &mut W,
) -> Result<(), Error> {
    let vec = write::tag(container)?;
    read::skip_tag(input)?;

    output.write_all(&vec)?;
    std::io::copy(input, output)?;
    output.flush()?;
    Ok(())
}

/// Copies `input` to `output` without its leading ID3v2 tag.
pub fn remove<R: Read + Seek, W: Write>(input: &mut R, output: &mut W) -> Result<(), Error> {
    if !read::skip_tag(input)? {
        return Err(header_not_found("No ID3v2 tag to remove"));
    }
    std::io::copy(input, output)?;
    output.flush()?;
    Ok(())
}

/// Decodes every frame of `info` into its high-level type, in tag order.
pub fn decode_frames(info: &TagInfo, code_page: CodePage) -> Result<Vec<Box<dyn Frame>>, Error> {
    let codec = TextCodec::new(code_page)?;
    info.frames
        .iter()
        .map(|raw| decode_frame(raw, &codec, info.header.flags.unsynchronisation))
        .collect()
}

/// Everything needed to write a tag. Built once, never changed afterwards.
///
/// ```ignore
/// let container = TagContainer::new(Version::V3)
///     .with_frame(Box::new(TextFrame::new("TIT2", TextEncoding::Utf16, "Title")?))
///     .with_crc()
///     .with_padding(256);
/// ```
#[derive(Debug)]
pub struct TagContainer {
    version: Version,
    revision: u8,
    code_page: CodePage,
    unsynchronisation: bool,
    experimental: bool,
    footer: bool,
    extended_header: bool,
    crc: bool,
    update_tag: bool,
    restriction: Option<u8>,
    padding: u32,
    frames: Vec<Box<dyn Frame>>,
}

impl TagContainer {
    pub fn new(version: Version) -> TagContainer {
        TagContainer {
            version,
            revision: 0,
            code_page: CodePage::default(),
            unsynchronisation: false,
            experimental: false,
            footer: false,
            extended_header: false,
            crc: false,
            update_tag: false,
            restriction: None,
            padding: 1024,
            frames: Vec::new(),
        }
    }

    /// A container that writes `info` back as it was read: same flags,
    /// same frames in the same order, same padding.
    pub fn from_info(info: &TagInfo) -> TagContainer {
        let h = &info.header;
        let mut c = TagContainer::new(h.version);
        c.revision = h.revision;
        c.unsynchronisation = h.flags.unsynchronisation;
        c.experimental = h.flags.experimental;
        c.footer = h.flags.footer;
        c.extended_header = h.flags.extended_header;
        c.padding = info.padding;
        match info.extended_header {
            Some(ExtendedHeader::V3(e)) => c.crc = e.crc_present(),
            Some(ExtendedHeader::V4(e)) => {
                c.update_tag = e.update_tag;
                c.restriction = e.restriction;
            }
            None => (),
        }
        c.frames = info
            .frames
            .iter()
            .map(|f| Box::new(f.clone()) as Box<dyn Frame>)
            .collect();
        c
    }

    pub fn with_revision(mut self, revision: u8) -> TagContainer {
        self.revision = revision;
        self
    }
    pub fn with_code_page(mut self, code_page: CodePage) -> TagContainer {
        self.code_page = code_page;
        self
    }
    pub fn with_unsynchronisation(mut self) -> TagContainer {
        self.unsynchronisation = true;
        self
    }
    pub fn with_experimental(mut self) -> TagContainer {
        self.experimental = true;
        self
    }
    /// ID3v2.4 only. A tag with a footer carries no padding.
    pub fn with_footer(mut self) -> TagContainer {
        self.footer = true;
        self
    }
    pub fn with_extended_header(mut self) -> TagContainer {
        self.extended_header = true;
        self
    }
    /// CRC-32 over all frames, stored in the extended header. ID3v2.3 only.
    pub fn with_crc(mut self) -> TagContainer {
        self.crc = true;
        self
    }
    pub fn with_update_flag(mut self) -> TagContainer {
        self.update_tag = true;
        self
    }
    pub fn with_restrictions(mut self, restriction: u8) -> TagContainer {
        self.restriction = Some(restriction);
        self
    }
    pub fn with_padding(mut self, padding: u32) -> TagContainer {
        self.padding = padding;
        self
    }
    pub fn with_frame(mut self, frame: Box<dyn Frame>) -> TagContainer {
        self.frames.push(frame);
        self
    }

    pub fn version(&self) -> Version {
        self.version
    }
    pub fn frames(&self) -> &[Box<dyn Frame>] {
        &self.frames
    }
}

#[cfg(test)]
mod tests;

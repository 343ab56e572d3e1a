use std::any::Any;

use super::{plain, Frame, FrameImport};
use crate::id3v2::structure::{FrameOptions, RawFrame, Version};
use crate::id3v2::text::{FrameReader, TextCodec, TextEncoding};
use crate::Error;

// Text encoding           $xx
// Language                $xx xx xx
// Short content descrip.  <text string according to encoding> $00 (00)
// The actual text         <full text string according to encoding>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFrame {
    encoding: TextEncoding,
    language: String,
    description: String,
    text: String,
    options: FrameOptions,
}

impl CommentFrame {
    /// `language` is an ISO-639-2 code; it is cut or padded to 3 bytes.
    pub fn new(encoding: TextEncoding, language: &str, description: &str, text: &str) -> CommentFrame {
        CommentFrame {
            encoding,
            language: language.to_string(),
            description: description.to_string(),
            text: text.to_string(),
            options: FrameOptions::default(),
        }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }
    pub fn language(&self) -> &str {
        &self.language
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Frame for CommentFrame {
    fn id(&self) -> [u8; 4] {
        *b"COMM"
    }

    fn convert(&self, version: Version, codec: &TextCodec) -> Result<RawFrame, Error> {
        self.encoding.check_version(version)?;
        let mut buf = Vec::new();
        codec.write_encoding(&mut buf, self.encoding);
        codec.write_fixed_string(&mut buf, &self.language, 3, TextEncoding::Ansi);
        codec.write_string(&mut buf, &self.description, self.encoding, true);
        codec.write_string(&mut buf, &self.text, self.encoding, false);
        Ok(RawFrame::new(*b"COMM", buf, plain(self.options)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl FrameImport for CommentFrame {
    fn import(raw: &RawFrame, content: &[u8], codec: &TextCodec) -> Result<CommentFrame, Error> {
        let mut input = FrameReader::new(content);
        let encoding = codec.read_encoding(&mut input)?;
        let language = codec.read_fixed_string(&mut input, 3, TextEncoding::Ansi)?;
        let description = codec.read_string(&mut input, encoding)?;
        let text = codec.read_string(&mut input, encoding)?;
        Ok(CommentFrame {
            encoding,
            language,
            description,
            text,
            options: raw.options(),
        })
    }
}

use std::any::Any;

use super::{plain, Frame, FrameImport};
use crate::id3v2::regex::is_text_id;
use crate::id3v2::structure::{FrameOptions, RawFrame, Version};
use crate::id3v2::text::{FrameReader, TextCodec, TextEncoding};
use crate::id3v2::tools::encode_frame_id;
use crate::tools::structure_error;
use crate::Error;

/// Any `T???` frame except `TXXX`: an encoding byte and one or more strings.
/// Several values are only allowed in ID3v2.4, each followed by a
/// terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
    id: [u8; 4],
    encoding: TextEncoding,
    values: Vec<String>,
    options: FrameOptions,
}

impl TextFrame {
    pub fn new(id: &str, encoding: TextEncoding, value: &str) -> Result<TextFrame, Error> {
        if !is_text_id(id) || id == "TXXX" {
            return Err(Error::StructureError(format!("{} is not a text frame", id)));
        }
        Ok(TextFrame {
            id: encode_frame_id(id)?,
            encoding,
            values: vec![value.to_string()],
            options: FrameOptions::default(),
        })
    }

    pub fn with_value(mut self, value: &str) -> TextFrame {
        self.values.push(value.to_string());
        self
    }

    pub fn with_options(mut self, options: FrameOptions) -> TextFrame {
        self.options = options;
        self
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }
    pub fn values(&self) -> &[String] {
        &self.values
    }
    pub fn text(&self) -> &str {
        self.values.first().map_or("", |s| s.as_str())
    }
}

impl Frame for TextFrame {
    fn id(&self) -> [u8; 4] {
        self.id
    }

    fn convert(&self, version: Version, codec: &TextCodec) -> Result<RawFrame, Error> {
        self.encoding.check_version(version)?;
        if self.values.len() > 1 && version == Version::V3 {
            return Err(structure_error("Multiple text values need ID3v2.4"));
        }
        let mut buf = Vec::new();
        codec.write_encoding(&mut buf, self.encoding);
        // several values are each terminated, a single one is not
        let terminate = self.values.len() > 1;
        for v in self.values.iter() {
            codec.write_string(&mut buf, v, self.encoding, terminate);
        }
        Ok(RawFrame::new(self.id, buf, plain(self.options)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl FrameImport for TextFrame {
    fn import(raw: &RawFrame, content: &[u8], codec: &TextCodec) -> Result<TextFrame, Error> {
        let mut input = FrameReader::new(content);
        let encoding = codec.read_encoding(&mut input)?;
        // at most one terminator closes the list, any other ends a value
        let terminator = encoding.terminator();
        let mut body = input.rest();
        let closed = |b: &[u8]| b.len() % terminator.len() == 0 && b.ends_with(terminator);
        if closed(body) {
            body = &body[..body.len() - terminator.len()];
        }

        let mut input = FrameReader::new(body);
        let mut values = Vec::new();
        while input.remaining() > 0 {
            values.push(codec.read_string(&mut input, encoding)?);
        }
        if values.is_empty() || closed(body) {
            values.push(String::new());
        }
        Ok(TextFrame {
            id: raw.id(),
            encoding,
            values,
            options: raw.options(),
        })
    }
}

/// `TXXX`: user defined text, a description and a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTextFrame {
    encoding: TextEncoding,
    description: String,
    value: String,
    options: FrameOptions,
}

impl UserTextFrame {
    pub fn new(encoding: TextEncoding, description: &str, value: &str) -> UserTextFrame {
        UserTextFrame {
            encoding,
            description: description.to_string(),
            value: value.to_string(),
            options: FrameOptions::default(),
        }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Frame for UserTextFrame {
    fn id(&self) -> [u8; 4] {
        *b"TXXX"
    }

    fn convert(&self, version: Version, codec: &TextCodec) -> Result<RawFrame, Error> {
        self.encoding.check_version(version)?;
        let mut buf = Vec::new();
        codec.write_encoding(&mut buf, self.encoding);
        codec.write_string(&mut buf, &self.description, self.encoding, true);
        codec.write_string(&mut buf, &self.value, self.encoding, false);
        Ok(RawFrame::new(*b"TXXX", buf, plain(self.options)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl FrameImport for UserTextFrame {
    fn import(raw: &RawFrame, content: &[u8], codec: &TextCodec) -> Result<UserTextFrame, Error> {
        let mut input = FrameReader::new(content);
        let encoding = codec.read_encoding(&mut input)?;
        let description = codec.read_string(&mut input, encoding)?;
        let value = codec.read_string(&mut input, encoding)?;
        Ok(UserTextFrame {
            encoding,
            description,
            value,
            options: raw.options(),
        })
    }
}

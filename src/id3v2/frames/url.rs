use std::any::Any;

use super::{plain, Frame, FrameImport};
use crate::id3v2::regex::is_url_id;
use crate::id3v2::structure::{FrameOptions, RawFrame, Version};
use crate::id3v2::text::{FrameReader, TextCodec, TextEncoding};
use crate::id3v2::tools::encode_frame_id;
use crate::Error;

/// Any `W???` frame except `WXXX`. The url is always single-byte text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFrame {
    id: [u8; 4],
    url: String,
    options: FrameOptions,
}

impl UrlFrame {
    pub fn new(id: &str, url: &str) -> Result<UrlFrame, Error> {
        if !is_url_id(id) || id == "WXXX" {
            return Err(Error::StructureError(format!("{} is not a url frame", id)));
        }
        Ok(UrlFrame {
            id: encode_frame_id(id)?,
            url: url.to_string(),
            options: FrameOptions::default(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Frame for UrlFrame {
    fn id(&self) -> [u8; 4] {
        self.id
    }

    fn convert(&self, _version: Version, codec: &TextCodec) -> Result<RawFrame, Error> {
        let mut buf = Vec::new();
        codec.write_string(&mut buf, &self.url, TextEncoding::Ansi, false);
        Ok(RawFrame::new(self.id, buf, plain(self.options)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl FrameImport for UrlFrame {
    fn import(raw: &RawFrame, content: &[u8], codec: &TextCodec) -> Result<UrlFrame, Error> {
        let url = codec.read_string(&mut FrameReader::new(content), TextEncoding::Ansi)?;
        Ok(UrlFrame {
            id: raw.id(),
            url,
            options: raw.options(),
        })
    }
}

/// `WXXX`: a described url. The description follows the frame encoding,
/// the url does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUrlFrame {
    encoding: TextEncoding,
    description: String,
    url: String,
    options: FrameOptions,
}

impl UserUrlFrame {
    pub fn new(encoding: TextEncoding, description: &str, url: &str) -> UserUrlFrame {
        UserUrlFrame {
            encoding,
            description: description.to_string(),
            url: url.to_string(),
            options: FrameOptions::default(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Frame for UserUrlFrame {
    fn id(&self) -> [u8; 4] {
        *b"WXXX"
    }

    fn convert(&self, version: Version, codec: &TextCodec) -> Result<RawFrame, Error> {
        self.encoding.check_version(version)?;
        let mut buf = Vec::new();
        codec.write_encoding(&mut buf, self.encoding);
        codec.write_string(&mut buf, &self.description, self.encoding, true);
        codec.write_string(&mut buf, &self.url, TextEncoding::Ansi, false);
        Ok(RawFrame::new(*b"WXXX", buf, plain(self.options)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl FrameImport for UserUrlFrame {
    fn import(raw: &RawFrame, content: &[u8], codec: &TextCodec) -> Result<UserUrlFrame, Error> {
        let mut input = FrameReader::new(content);
        let encoding = codec.read_encoding(&mut input)?;
        let description = codec.read_string(&mut input, encoding)?;
        let url = codec.read_string(&mut input, TextEncoding::Ansi)?;
        Ok(UserUrlFrame {
            encoding,
            description,
            url,
            options: raw.options(),
        })
    }
}

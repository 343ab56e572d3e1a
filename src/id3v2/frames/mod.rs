//! High-level frames and the id -> frame type lookup.
//!
//! Every frame converts itself to a [`RawFrame`] for a given tag version and
//! can be imported back from one. Ids without a dedicated type fall back to
//! the generic text (`T???`) or url (`W???`) layouts, and anything else stays
//! a `RawFrame`, which re-emits its bytes untouched.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use crate::id3v2::regex::{is_text_id, is_url_id};
use crate::id3v2::structure::{FrameOptions, RawFrame, Version};
use crate::id3v2::text::TextCodec;
use crate::id3v2::tools::decode_frame_id;
use crate::Error;

mod comment;
mod counter;
mod text;
mod url;

pub use self::comment::CommentFrame;
pub use self::counter::PlayCounterFrame;
pub use self::text::{TextFrame, UserTextFrame};
pub use self::url::{UrlFrame, UserUrlFrame};

pub trait Frame: fmt::Debug {
    fn id(&self) -> [u8; 4];

    /// Encodes the frame for a tag of `version`. Fails with a structure
    /// error if the frame cannot be expressed in that version.
    fn convert(&self, version: Version, codec: &TextCodec) -> Result<RawFrame, Error>;

    fn as_any(&self) -> &dyn Any;
}

/// Builds a frame from a stored one. `content` is the payload with any
/// per-frame transforms already undone, see [`RawFrame::content`].
pub trait FrameImport: Sized {
    fn import(raw: &RawFrame, content: &[u8], codec: &TextCodec) -> Result<Self, Error>;
}

pub type FrameFactory = fn(&RawFrame, &[u8], &TextCodec) -> Result<Box<dyn Frame>, Error>;

fn boxed<F: Frame + FrameImport + 'static>(
    raw: &RawFrame,
    content: &[u8],
    codec: &TextCodec,
) -> Result<Box<dyn Frame>, Error> {
    Ok(Box::new(F::import(raw, content, codec)?))
}

lazy_static! {
    static ref REGISTRY: HashMap<&'static str, FrameFactory> = {
        let mut m: HashMap<&'static str, FrameFactory> = HashMap::new();
        m.insert("COMM", boxed::<CommentFrame>);
        m.insert("PCNT", boxed::<PlayCounterFrame>);
        m.insert("TXXX", boxed::<UserTextFrame>);
        m.insert("WXXX", boxed::<UserUrlFrame>);
        m
    };
}

/// Is there a dedicated frame type for `id`?
pub fn search(id: &str) -> bool {
    REGISTRY.contains_key(id)
}

pub fn instantiate(id: &str) -> Option<FrameFactory> {
    REGISTRY.get(id).copied()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameKind {
    Known(String),
    GenericText,
    GenericUrl,
    Unknown,
}

impl FrameKind {
    pub fn resolve(id: &str) -> FrameKind {
        if search(id) {
            FrameKind::Known(id.to_string())
        } else if is_text_id(id) {
            FrameKind::GenericText
        } else if is_url_id(id) {
            FrameKind::GenericUrl
        } else {
            FrameKind::Unknown
        }
    }

    fn factory(&self) -> Option<FrameFactory> {
        match self {
            FrameKind::Known(id) => instantiate(id),
            FrameKind::GenericText => Some(boxed::<TextFrame> as FrameFactory),
            FrameKind::GenericUrl => Some(boxed::<UrlFrame> as FrameFactory),
            FrameKind::Unknown => None,
        }
    }
}

/// Turns a stored frame into its high-level type. Frames whose content
/// cannot be reached (compressed, encrypted) or does not parse are kept as
/// they are.
pub fn decode_frame(
    raw: &RawFrame,
    codec: &TextCodec,
    tag_unsynchronised: bool,
) -> Result<Box<dyn Frame>, Error> {
    let kind = match decode_frame_id(&raw.id()) {
        Ok(id) => FrameKind::resolve(&id),
        Err(_) => FrameKind::Unknown,
    };
    let factory = match kind.factory() {
        Some(f) => f,
        None => return Ok(Box::new(raw.clone())),
    };
    let decoded = raw
        .content(tag_unsynchronised)
        .and_then(|content| factory(raw, &content, codec));
    match decoded {
        Ok(frame) => Ok(frame),
        Err(Error::UnsupportedError(e)) | Err(Error::StructureError(e)) => {
            warn!("Keeping frame {} undecoded: {}", raw.id_str(), e);
            Ok(Box::new(raw.clone()))
        }
        Err(e) => Err(e),
    }
}

impl Frame for RawFrame {
    fn id(&self) -> [u8; 4] {
        RawFrame::id(self)
    }

    fn convert(&self, _version: Version, _codec: &TextCodec) -> Result<RawFrame, Error> {
        Ok(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// decoded frames are written back without the per-frame transforms
fn plain(options: FrameOptions) -> FrameOptions {
    FrameOptions {
        unsynchronisation: false,
        data_length_indicator: false,
        ..options
    }
}

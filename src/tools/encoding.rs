extern crate encoding;
use self::encoding::label::encoding_from_windows_code_page;
use self::encoding::{DecoderTrap, EncoderTrap, Encoding};
pub use self::encoding::EncodingRef;

use crate::tools::unsupported;
use crate::Error;

// anything in here can put 0x00 inside a character or needs more than
// one byte per character, which the Ansi kind cannot carry
const MULTI_BYTE: &[&str] = &[
    "utf-8",
    "utf-16le",
    "utf-16be",
    "windows-31j",
    "shift_jis",
    "gbk",
    "gb18030",
    "hz",
    "hz-gb-2312",
    "big5",
    "big5-2003",
    "euc-jp",
    "iso-2022-jp",
    "windows-949",
    "euc-kr",
];

/// Windows code page number used for the single-byte (Ansi) text kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePage(pub u16);

impl Default for CodePage {
    /// ISO-8859-1, the encoding ID3v2 prescribes for selector 0.
    fn default() -> CodePage {
        CodePage(28591)
    }
}

impl CodePage {
    pub fn resolve(self) -> Result<EncodingRef, Error> {
        let enc = match encoding_from_windows_code_page(self.0 as usize) {
            Some(e) => e,
            None => {
                return Err(Error::UnsupportedError(format!(
                    "Unknown code page {}",
                    self.0
                )))
            }
        };
        let multi = MULTI_BYTE.contains(&enc.name())
            || enc.whatwg_name().map_or(false, |n| MULTI_BYTE.contains(&n));
        if multi {
            return Err(unsupported(&format!(
                "Code page {} ({}) is multi-byte, single-byte required",
                self.0,
                enc.name()
            )));
        }
        Ok(enc)
    }
}

pub fn encode_ansi(enc: EncodingRef, input: &str) -> Vec<u8> {
    enc.encode(input, EncoderTrap::Replace)
        .unwrap_or_default()
}

pub fn decode_ansi(enc: EncodingRef, input: &[u8]) -> String {
    enc.decode(input, DecoderTrap::Replace)
        .unwrap_or_default()
}

pub fn encode_utf16(input: &str, little_endian: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() * 2);
    for unit in input.encode_utf16() {
        if little_endian {
            out.extend_from_slice(&unit.to_le_bytes());
        } else {
            out.extend_from_slice(&unit.to_be_bytes());
        }
    }
    out
}

pub fn decode_utf16(input: &[u8], little_endian: bool) -> String {
    use self::encoding::all::{UTF_16BE, UTF_16LE};
    match little_endian {
        true => UTF_16LE.decode(input, DecoderTrap::Replace),
        false => UTF_16BE.decode(input, DecoderTrap::Replace),
    }
    .unwrap_or_default()
}

pub fn decode_utf8(input: &[u8]) -> String {
    use self::encoding::all::UTF_8;
    UTF_8
        .decode(input, DecoderTrap::Replace)
        .unwrap_or_default()
}

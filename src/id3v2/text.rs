//! Text and integer primitives shared by all frame bodies.

use std::fmt;

use crate::id3v2::structure::Version;
use crate::tools::encoding::*;
use crate::tools::{decode_int_be_u32, decode_int_be_u64, encode_int_be_u16, encode_int_be_u32};
use crate::tools::structure_error;
use crate::Error;

const BOM_LE: [u8; 2] = [0xFF, 0xFE];
const BOM_BE: [u8; 2] = [0xFE, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Single byte, in the codec's code page.
    Ansi,
    /// UTF-16 with a byte order mark in front of every string.
    Utf16,
    Utf16BE,
    Utf8,
}

impl TextEncoding {
    pub fn from_byte(b: u8) -> Result<TextEncoding, Error> {
        match b {
            0 => Ok(TextEncoding::Ansi),
            1 => Ok(TextEncoding::Utf16),
            2 => Ok(TextEncoding::Utf16BE),
            3 => Ok(TextEncoding::Utf8),
            _ => Err(Error::StructureError(format!(
                "Unknown text encoding selector {:#04X}",
                b
            ))),
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            TextEncoding::Ansi => 0,
            TextEncoding::Utf16 => 1,
            TextEncoding::Utf16BE => 2,
            TextEncoding::Utf8 => 3,
        }
    }

    pub fn terminator(self) -> &'static [u8] {
        match self {
            TextEncoding::Ansi | TextEncoding::Utf8 => b"\x00",
            TextEncoding::Utf16 | TextEncoding::Utf16BE => b"\x00\x00",
        }
    }

    /// ID3v2.3 only knows ISO-8859-1 and UTF-16 with BOM.
    pub fn check_version(self, version: Version) -> Result<(), Error> {
        match (self, version) {
            (TextEncoding::Utf16BE, Version::V3) | (TextEncoding::Utf8, Version::V3) => {
                Err(Error::StructureError(format!(
                    "Text encoding {:?} needs ID3v2.4",
                    self
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Cursor over a frame payload. Reading past the end is a structure error.
#[derive(Debug)]
pub struct FrameReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FrameReader<'a> {
    pub fn new(data: &'a [u8]) -> FrameReader<'a> {
        FrameReader { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if n > self.remaining() {
            return Err(Error::StructureError(format!(
                "Frame needs {} more bytes, {} left",
                n,
                self.remaining()
            )));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn rest(&mut self) -> &'a [u8] {
        let out = &self.data[self.pos..];
        self.pos = self.data.len();
        out
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }
    pub fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(decode_int_be_u32(self.take(2)?) as u16)
    }
    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(decode_int_be_u32(self.take(4)?))
    }

    /// Reads the rest of the payload as one big-endian unsigned integer.
    pub fn read_var_uint(&mut self) -> Result<u64, Error> {
        let bytes = self.rest();
        // leading zero bytes don't add anything
        let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        match (bytes.len(), bytes.len() - first) {
            (0, _) => Err(structure_error("Integer field is empty")),
            (_, n) if n > 8 => Err(Error::StructureError(format!(
                "Integer field of {} bytes does not fit 64 bits",
                bytes.len()
            ))),
            _ => Ok(decode_int_be_u64(&bytes[first..])),
        }
    }
}

pub fn write_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&encode_int_be_u16(value));
}
pub fn write_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&encode_int_be_u32(value));
}

/// Big-endian, never fewer than 4 bytes, more only when the value needs them.
pub fn write_var_uint(buf: &mut Vec<u8>, value: u64) {
    let bytes = value.to_be_bytes();
    let significant = 8 - (value.leading_zeros() / 8) as usize;
    let width = significant.max(4);
    buf.extend_from_slice(&bytes[8 - width..]);
}

/// Encodes and decodes strings in the four ID3v2 text encodings.
///
/// The Ansi kind goes through a single-byte code page chosen at construction.
#[derive(Clone, Copy)]
pub struct TextCodec {
    code_page: CodePage,
    ansi: EncodingRef,
}

impl fmt::Debug for TextCodec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TextCodec")
            .field("code_page", &self.code_page)
            .finish()
    }
}

impl TextCodec {
    pub fn new(code_page: CodePage) -> Result<TextCodec, Error> {
        Ok(TextCodec {
            code_page,
            ansi: code_page.resolve()?,
        })
    }

    pub fn code_page(&self) -> CodePage {
        self.code_page
    }

    pub fn write_encoding(&self, buf: &mut Vec<u8>, encoding: TextEncoding) {
        buf.push(encoding.byte());
    }

    pub fn read_encoding(&self, input: &mut FrameReader) -> Result<TextEncoding, Error> {
        TextEncoding::from_byte(input.read_u8()?)
    }

    /// Writes the byte order mark; only `Utf16` has one. We always write
    /// little-endian.
    pub fn write_bom(&self, buf: &mut Vec<u8>, encoding: TextEncoding) {
        if encoding == TextEncoding::Utf16 {
            buf.extend_from_slice(&BOM_LE);
        }
    }

    fn encode(&self, text: &str, encoding: TextEncoding) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len() + 2);
        self.write_bom(&mut out, encoding);
        match encoding {
            TextEncoding::Ansi => out.append(&mut encode_ansi(self.ansi, text)),
            TextEncoding::Utf16 => out.append(&mut encode_utf16(text, true)),
            TextEncoding::Utf16BE => out.append(&mut encode_utf16(text, false)),
            TextEncoding::Utf8 => out.extend_from_slice(text.as_bytes()),
        }
        out
    }

    // `input` holds exactly one string, BOM included, terminator excluded
    fn decode(&self, input: &[u8], encoding: TextEncoding) -> Result<String, Error> {
        Ok(match encoding {
            TextEncoding::Ansi => decode_ansi(self.ansi, input),
            TextEncoding::Utf8 => decode_utf8(input),
            TextEncoding::Utf16BE => decode_utf16(input, false),
            TextEncoding::Utf16 => {
                let little_endian = read_bom(input)?;
                decode_utf16(&input[2..], little_endian)
            }
        })
    }

    /// Writes `text`, followed by the encoding's terminator if `terminate`.
    pub fn write_string(
        &self,
        buf: &mut Vec<u8>,
        text: &str,
        encoding: TextEncoding,
        terminate: bool,
    ) {
        buf.append(&mut self.encode(text, encoding));
        if terminate {
            buf.extend_from_slice(encoding.terminator());
        }
    }

    /// Writes exactly `len` bytes: the encoded text, cut or padded with 0x00.
    pub fn write_fixed_string(
        &self,
        buf: &mut Vec<u8>,
        text: &str,
        len: usize,
        encoding: TextEncoding,
    ) {
        let mut bytes = self.encode(text, encoding);
        bytes.resize(len, 0x00);
        buf.append(&mut bytes);
    }

    pub fn read_fixed_string(
        &self,
        input: &mut FrameReader,
        len: usize,
        encoding: TextEncoding,
    ) -> Result<String, Error> {
        let bytes = input.take(len)?;
        let end = terminator_position(bytes, encoding).unwrap_or(bytes.len());
        self.decode(&bytes[..end], encoding)
    }

    /// Reads up to the first terminator or the end of the payload, whichever
    /// comes first. The terminator is consumed.
    pub fn read_string(
        &self,
        input: &mut FrameReader,
        encoding: TextEncoding,
    ) -> Result<String, Error> {
        let rest = &input.data[input.pos..];
        if encoding == TextEncoding::Utf16 && rest.len() >= 2 && rest[0..2] == [0x00, 0x00] {
            // BOM-less empty string, seen from several writers
            input.take(2)?;
            return Ok(String::new());
        }
        if rest.is_empty() {
            return Ok(String::new());
        }
        match terminator_position(rest, encoding) {
            Some(end) => {
                let s = self.decode(&rest[..end], encoding)?;
                input.take(end + encoding.terminator().len())?;
                Ok(s)
            }
            None => self.decode(input.rest(), encoding),
        }
    }
}

// true for little-endian
fn read_bom(input: &[u8]) -> Result<bool, Error> {
    if input.len() < 2 {
        return Err(structure_error("UTF-16 string misses its byte order mark"));
    }
    match [input[0], input[1]] {
        BOM_LE => Ok(true),
        BOM_BE => Ok(false),
        other => Err(Error::StructureError(format!(
            "Invalid UTF-16 byte order mark {:02X?}",
            other
        ))),
    }
}

// where the string in `input` ends; UTF-16 terminators sit on unit boundaries
fn terminator_position(input: &[u8], encoding: TextEncoding) -> Option<usize> {
    match encoding {
        TextEncoding::Ansi | TextEncoding::Utf8 => input.iter().position(|&b| b == 0x00),
        TextEncoding::Utf16 | TextEncoding::Utf16BE => input
            .chunks(2)
            .position(|c| c == [0x00, 0x00])
            .map(|i| i * 2),
    }
}

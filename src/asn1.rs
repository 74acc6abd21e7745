//! Minimal DER scanner and writer
//!
//! Only what the signature envelope needs: read a tag/length header at an
//! offset, search a subtree for a universal tag, and emit definite-length
//! elements. This is not a general ASN.1 library.

use thiserror::Error;

/// Universal tag numbers used by the signature envelope
pub mod tags {
    pub const BIT_STRING: u32 = 0x03;
    pub const NULL: u32 = 0x05;
    pub const OBJECT_IDENTIFIER: u32 = 0x06;
    pub const SEQUENCE: u32 = 0x10;
}

/// Identifier octets for the elements the writer emits
pub mod identifiers {
    pub const BIT_STRING: u8 = 0x03;
    pub const NULL: u8 = 0x05;
    pub const OBJECT_IDENTIFIER: u8 = 0x06;
    pub const SEQUENCE: u8 = 0x30;
}

/// Headers whose content claims more than this are rejected
const MAX_LENGTH: usize = 1 << 23;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Asn1Error {
    #[error("DER element at offset {offset} is truncated")]
    Truncated { offset: usize },

    #[error("Indefinite length at offset {offset} is not allowed in DER")]
    IndefiniteLength { offset: usize },

    #[error("Non-minimal length encoding at offset {offset}")]
    NonMinimalLength { offset: usize },

    #[error("Length at offset {offset} is too large")]
    LengthTooLarge { offset: usize },

    #[error("Invalid high tag number at offset {offset}")]
    InvalidTag { offset: usize },
}

/// ASN.1 tag class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl TagClass {
    fn from_bits(bits: u8) -> Self {
        match bits >> 6 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }
}

/// A parsed tag/length header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub class: TagClass,
    pub constructed: bool,
    pub number: u32,
    /// Content length in bytes
    pub length: usize,
    /// Offset of the first content byte
    pub content_offset: usize,
}

impl Header {
    /// Offset one past the last content byte
    pub fn content_end(&self) -> usize {
        self.content_offset + self.length
    }

    /// True for a universal-class tag with the given number
    pub fn is_universal(&self, number: u32) -> bool {
        self.class == TagClass::Universal && self.number == number
    }
}

/// Parse the tag/length header at `offset`
///
/// The declared content must fit inside `bytes`.
pub fn parse_header(bytes: &[u8], offset: usize) -> Result<Header, Asn1Error> {
    let mut pos = offset;
    let first = *bytes.get(pos).ok_or(Asn1Error::Truncated { offset })?;
    pos += 1;

    let class = TagClass::from_bits(first);
    let constructed = first & 0x20 != 0;
    let mut number = u32::from(first & 0x1F);
    if number == 0x1F {
        number = 0;
        let mut digits = 0;
        loop {
            let b = *bytes.get(pos).ok_or(Asn1Error::Truncated { offset })?;
            pos += 1;
            // leading 0x80 would be a non-minimal encoding
            if digits == 0 && b == 0x80 {
                return Err(Asn1Error::InvalidTag { offset });
            }
            digits += 1;
            if digits > 4 {
                return Err(Asn1Error::InvalidTag { offset });
            }
            number = (number << 7) | u32::from(b & 0x7F);
            if b & 0x80 == 0 {
                break;
            }
        }
        if number < 0x1F {
            return Err(Asn1Error::InvalidTag { offset });
        }
    }

    let b = *bytes.get(pos).ok_or(Asn1Error::Truncated { offset })?;
    pos += 1;
    let length = if b & 0x80 == 0 {
        usize::from(b)
    } else {
        let count = usize::from(b & 0x7F);
        if count == 0 {
            return Err(Asn1Error::IndefiniteLength { offset });
        }
        let mut length = 0usize;
        for i in 0..count {
            let b = *bytes.get(pos).ok_or(Asn1Error::Truncated { offset })?;
            pos += 1;
            if i == 0 && b == 0 {
                return Err(Asn1Error::NonMinimalLength { offset });
            }
            if length >= MAX_LENGTH {
                return Err(Asn1Error::LengthTooLarge { offset });
            }
            length = (length << 8) | usize::from(b);
        }
        if length < 0x80 {
            return Err(Asn1Error::NonMinimalLength { offset });
        }
        length
    };

    let header = Header {
        class,
        constructed,
        number,
        length,
        content_offset: pos,
    };
    if header.content_end() > bytes.len() {
        return Err(Asn1Error::Truncated { offset });
    }
    Ok(header)
}

/// Content of the first universal element numbered `target`, depth-first
///
/// SEQUENCE contents are searched before the elements that follow them.
pub fn find_first(bytes: &[u8], target: u32) -> Option<&[u8]> {
    let mut offset = 0;
    while offset < bytes.len() {
        let header = parse_header(bytes, offset).ok()?;
        let content = &bytes[header.content_offset..header.content_end()];
        if header.is_universal(target) {
            return Some(content);
        }
        if header.is_universal(tags::SEQUENCE) {
            if let Some(found) = find_first(content, target) {
                return Some(found);
            }
        }
        offset = header.content_end();
    }
    None
}

/// Contents of every universal element numbered `target`, depth-first
///
/// Scanning stops at the first malformed header; matches found before it
/// are kept.
pub fn find_all(bytes: &[u8], target: u32) -> Vec<&[u8]> {
    let mut out = Vec::new();
    collect(bytes, target, &mut out);
    out
}

fn collect<'a>(bytes: &'a [u8], target: u32, out: &mut Vec<&'a [u8]>) {
    let mut offset = 0;
    while offset < bytes.len() {
        let Ok(header) = parse_header(bytes, offset) else {
            return;
        };
        let content = &bytes[header.content_offset..header.content_end()];
        if header.is_universal(target) {
            out.push(content);
        } else if header.is_universal(tags::SEQUENCE) {
            collect(content, target, out);
        }
        offset = header.content_end();
    }
}

/// Append one definite-length element
pub fn write_element(out: &mut Vec<u8>, identifier: u8, content: &[u8]) {
    out.push(identifier);
    write_length(out, content.len());
    out.extend_from_slice(content);
}

fn write_length(out: &mut Vec<u8>, length: usize) {
    if length < 0x80 {
        out.push(length as u8);
        return;
    }
    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

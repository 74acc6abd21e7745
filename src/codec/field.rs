//! A single tag/length/value field
//!
//! Layout:
//! ```text
//! ┌──────────┬────────────┬──────────────────┬────────────┬───────────────┐
//! │ Tag (2B) │ Length (2B)│ Ext. length (4B) │ Data (var) │ Padding (0-3B)│
//! └──────────┴────────────┴──────────────────┴────────────┴───────────────┘
//! ```
//!
//! The extended length is present only when the 2-byte length holds the
//! sentinel `0xFFFF`. Padding brings the whole field to a multiple of 4 bytes.

use super::binary::{
    le_u32, padding, read_bytes, read_i32_le, read_u16_le, write_i32_le, write_u16_le,
    BinaryRead, BinaryWrite,
};
use super::{CodecError, FieldTag};
use std::io::{self, Read, Write};

/// Largest data length that still fits the 2-byte length form
pub const MAX_SHORT_LENGTH: usize = 65_534;

/// 2-byte length value announcing a 4-byte extended length
pub const EXTENDED_LENGTH_SENTINEL: u16 = 0xFFFF;

const ZERO_PADDING: [u8; 3] = [0; 3];

/// One typed, length-prefixed, 4-byte aligned field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    tag: FieldTag,
    data: Vec<u8>,
}

impl Field {
    /// Create a field carrying raw bytes
    pub fn new(tag: FieldTag, data: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            data: data.into(),
        }
    }

    /// Create a field carrying a 4-byte little-endian integer
    pub fn from_u32(tag: FieldTag, value: u32) -> Self {
        Self::new(tag, le_u32(value).to_vec())
    }

    pub fn tag(&self) -> FieldTag {
        self.tag
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// True when the data is too long for the 2-byte length form
    pub fn is_extended(&self) -> bool {
        self.data.len() > MAX_SHORT_LENGTH
    }

    /// Interpret the data as a 4-byte little-endian integer
    pub fn as_u32(&self) -> Result<u32, CodecError> {
        let bytes: [u8; 4] = self
            .data
            .as_slice()
            .try_into()
            .map_err(|_| CodecError::InvalidInteger {
                tag: self.tag,
                len: self.data.len(),
            })?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Interpret the data as UTF-8 text
    pub fn as_str(&self) -> Result<&str, CodecError> {
        std::str::from_utf8(&self.data).map_err(|_| CodecError::InvalidUtf8 { tag: self.tag })
    }

    /// Serialize into a fresh buffer
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_size());
        self.write_into(&mut buf);
        buf
    }

    /// Append the serialized field to `out`
    pub(crate) fn write_into(&self, out: &mut Vec<u8>) {
        // Writes into a Vec cannot fail
        let _ = self.write_to(out);
    }
}

impl BinaryRead for Field {
    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let tag = FieldTag::from(read_u16_le(reader)?);
        let short = read_u16_le(reader)?;
        let length = if short == EXTENDED_LENGTH_SENTINEL {
            let extended = read_i32_le(reader)?;
            usize::try_from(extended).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("negative extended length {} for tag {}", extended, tag),
                )
            })?
        } else {
            usize::from(short)
        };
        let data = read_bytes(reader, length)?;
        let pad = padding(length);
        if pad > 0 {
            let mut skip = [0u8; 3];
            reader.read_exact(&mut skip[..pad])?;
        }
        Ok(Self { tag, data })
    }
}

impl BinaryWrite for Field {
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_u16_le(writer, self.tag.value())?;
        if self.is_extended() {
            let length = i32::try_from(self.data.len()).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "field data exceeds i32 length")
            })?;
            write_u16_le(writer, EXTENDED_LENGTH_SENTINEL)?;
            write_i32_le(writer, length)?;
        } else {
            write_u16_le(writer, self.data.len() as u16)?;
        }
        writer.write_all(&self.data)?;
        writer.write_all(&ZERO_PADDING[..padding(self.data.len())])
    }

    fn serialized_size(&self) -> usize {
        let header = if self.is_extended() { 8 } else { 4 };
        header + self.data.len() + padding(self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_short_form_layout() {
        let field = Field::new(FieldTag::LABEL_UTF8STRING, b"gt_ec_08".to_vec());
        assert_eq!(
            field.to_bytes(),
            vec![0x02, 0x10, 0x08, 0x00, b'g', b't', b'_', b'e', b'c', b'_', b'0', b'8']
        );
    }

    #[test]
    fn test_integer_field() {
        let field = Field::from_u32(FieldTag::EKA_OPERATION, 1);
        assert_eq!(
            field.to_bytes(),
            vec![0x3b, 0x00, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
        assert_eq!(field.as_u32().unwrap(), 1);
    }

    #[test]
    fn test_padding_is_zeroed() {
        let field = Field::new(FieldTag::new(7), vec![0xAA]);
        assert_eq!(field.to_bytes(), vec![0x07, 0x00, 0x01, 0x00, 0xAA, 0, 0, 0]);
        assert_eq!(field.serialized_size(), 8);
    }

    #[test]
    fn test_size_is_multiple_of_four() {
        for len in 0..40 {
            let field = Field::new(FieldTag::new(1), vec![0x5A; len]);
            assert_eq!(field.serialized_size() % 4, 0);
            assert_eq!(field.to_bytes().len(), field.serialized_size());
        }
    }

    #[test]
    fn test_extended_length_boundary() {
        let short = Field::new(FieldTag::new(1), vec![1u8; MAX_SHORT_LENGTH]);
        let bytes = short.to_bytes();
        assert!(!short.is_extended());
        assert_eq!(&bytes[2..4], &[0xFE, 0xFF]);
        let back = Field::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(back, short);

        let long = Field::new(FieldTag::new(1), vec![2u8; MAX_SHORT_LENGTH + 1]);
        let bytes = long.to_bytes();
        assert!(long.is_extended());
        assert_eq!(&bytes[2..8], &[0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00]);
        assert_eq!(bytes.len() % 4, 0);
        let back = Field::read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(back, long);
    }

    #[test]
    fn test_as_u32_wrong_width() {
        let field = Field::new(FieldTag::SIGNATURES_REQUIRED, vec![1, 0]);
        assert!(matches!(
            field.as_u32(),
            Err(CodecError::InvalidInteger { len: 2, .. })
        ));
    }

    #[test]
    fn test_negative_extended_length_rejected() {
        let bytes = vec![0x01, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
        let err = Field::read_from(&mut Cursor::new(bytes)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}

//! Little-endian primitives and the read/write traits used by the TLV codec
//!
//! Every multi-byte integer on the Primus wire is little-endian. Field tags
//! and short lengths are 16-bit, extended lengths and integer values 32-bit.

use std::io::{self, Read, Write};

/// Trait for types that can be read from the TLV wire format
pub trait BinaryRead: Sized {
    /// Read this type from a binary reader
    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self>;
}

/// Trait for types that can be written to the TLV wire format
pub trait BinaryWrite {
    /// Write this type to a binary writer
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()>;

    /// Get the size in bytes when serialized
    fn serialized_size(&self) -> usize;
}

/// Read a u16 (little-endian) from a reader
pub fn read_u16_le<R: Read>(reader: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

/// Read an i32 (little-endian) from a reader
pub fn read_i32_le<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read exactly n bytes from a reader
///
/// The buffer grows with the bytes actually available, so a corrupt length
/// cannot force a large allocation up front.
pub fn read_bytes<R: Read>(reader: &mut R, n: usize) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.by_ref().take(n as u64).read_to_end(&mut buf)?;
    if buf.len() != n {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, got {}", n, buf.len()),
        ));
    }
    Ok(buf)
}

/// Write a u16 (little-endian) to a writer
pub fn write_u16_le<W: Write>(writer: &mut W, value: u16) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Write an i32 (little-endian) to a writer
pub fn write_i32_le<W: Write>(writer: &mut W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Encode a u32 as the 4 little-endian bytes stored in integer fields
pub fn le_u32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Round `n` up to the next multiple of 4
pub fn align4(n: usize) -> usize {
    (n + 3) & !3
}

/// Number of zero bytes needed after `n` data bytes to reach 4-byte alignment
pub fn padding(n: usize) -> usize {
    align4(n) - n
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_u16_roundtrip() {
        let mut buf = Vec::new();
        write_u16_le(&mut buf, 0x1052).unwrap();
        assert_eq!(buf, vec![0x52, 0x10]);

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_u16_le(&mut cursor).unwrap(), 0x1052);
    }

    #[test]
    fn test_read_bytes_short_input() {
        let mut cursor = Cursor::new(vec![1, 2, 3]);
        let err = read_bytes(&mut cursor, 8).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_i32_roundtrip() {
        let mut buf = Vec::new();
        write_i32_le(&mut buf, 65_535).unwrap();
        assert_eq!(buf, vec![0xFF, 0xFF, 0x00, 0x00]);

        let mut cursor = Cursor::new(buf);
        assert_eq!(read_i32_le(&mut cursor).unwrap(), 65_535);
    }

    #[test]
    fn test_short_read_is_eof() {
        let mut cursor = Cursor::new(vec![0x01]);
        let err = read_u16_le(&mut cursor).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_padding() {
        assert_eq!(padding(0), 0);
        assert_eq!(padding(1), 3);
        assert_eq!(padding(4), 0);
        assert_eq!(padding(18), 2);
        assert_eq!(align4(65_534), 65_536);
    }
}

//! 4-byte length header framing
//!
//! Tokens travel as `len (4B LE) || message`, where `len` counts the message
//! bytes only.

use super::CodecError;
use tracing::debug;

const HEADER_LEN: usize = 4;

/// Prefix `data` with its own little-endian byte count
pub fn length_header(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + data.len());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    out
}

/// Remove a length header, requiring it to match the remaining byte count
pub fn strip_length_header(data: &[u8]) -> Result<&[u8], CodecError> {
    if data.len() < HEADER_LEN {
        return Err(CodecError::TruncatedInput {
            offset: 0,
            remaining: data.len(),
        });
    }
    let (header, rest) = data.split_at(HEADER_LEN);
    let declared = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
    if declared != rest.len() {
        return Err(CodecError::LengthMismatch {
            declared,
            actual: rest.len(),
        });
    }
    Ok(rest)
}

/// Remove a length header when present and self-consistent
///
/// Anything else is treated as a headerless message and returned unchanged.
pub fn optionally_strip_length_header(data: &[u8]) -> &[u8] {
    match strip_length_header(data) {
        Ok(rest) => rest,
        Err(err) => {
            debug!(len = data.len(), %err, "no length header, decoding as headerless");
            data
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let framed = length_header(b"abcd");
        assert_eq!(framed, vec![4, 0, 0, 0, b'a', b'b', b'c', b'd']);
        assert_eq!(strip_length_header(&framed).unwrap(), b"abcd");
    }

    #[test]
    fn test_mismatch() {
        let err = strip_length_header(&[9, 0, 0, 0, 1, 2]).unwrap_err();
        assert_eq!(
            err,
            CodecError::LengthMismatch {
                declared: 9,
                actual: 2
            }
        );
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            strip_length_header(&[1, 0]),
            Err(CodecError::TruncatedInput { remaining: 2, .. })
        ));
    }

    #[test]
    fn test_lenient_strip() {
        let headerless = [0x3b, 0x00, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00];
        assert_eq!(optionally_strip_length_header(&headerless), &headerless);
        let framed = length_header(&headerless);
        assert_eq!(optionally_strip_length_header(&framed), &headerless);
    }
}

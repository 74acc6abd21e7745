//! Reserved field tags
//!
//! A tag is stored on the wire as 16 bits. Wider constants are masked on
//! construction so `FieldTag::new(0x1_1052)` and `FieldTag::new(0x1052)`
//! produce the same tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 16-bit type tag of a TLV field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTag(u16);

impl FieldTag {
    pub const KEYCOUNT_INT32: FieldTag = FieldTag(3);
    pub const EKA_OPERATION: FieldTag = FieldTag(59);
    /// Empty marker field that opens an HSM timestamp
    pub const APPROVAL_COUNT: FieldTag = FieldTag(60);
    pub const TIME_MINUTE: FieldTag = FieldTag(85);
    pub const TIME_SECOND: FieldTag = FieldTag(86);
    pub const TOKEN_COUNT: FieldTag = FieldTag(89);
    pub const GROUP_COUNT: FieldTag = FieldTag(90);
    pub const SIGNATURES_REQUIRED: FieldTag = FieldTag(91);
    pub const TIME_SECONDS_SINCE_EPOCH: FieldTag = FieldTag(263);
    pub const LABEL_UTF8STRING: FieldTag = FieldTag(4098);
    pub const CERTIFICATEDATA_BYTES: FieldTag = FieldTag(4105);
    pub const SIGN_BLOB: FieldTag = FieldTag(4174);
    pub const BLOCK_BLOB: FieldTag = FieldTag(4175);
    pub const UNBLOCK_BLOB: FieldTag = FieldTag(4176);
    pub const MODIFY_BLOB: FieldTag = FieldTag(4177);
    pub const PUBLIC_KEY_ENCODED: FieldTag = FieldTag(4178);
    pub const EKA_TIME_STAMP: FieldTag = FieldTag(4180);
    pub const APPROVAL_TOKEN: FieldTag = FieldTag(4181);
    pub const DER_SIGNATURE: FieldTag = FieldTag(4182);
    pub const EKA_SIGN_PAYLOAD: FieldTag = FieldTag(4183);
    pub const EKA_MODIFY_PAYLOAD: FieldTag = FieldTag(4184);

    /// Create a tag, keeping only the low 16 bits
    pub const fn new(value: u32) -> Self {
        FieldTag((value & 0xFFFF) as u16)
    }

    /// Raw 16-bit value
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Symbolic name for reserved tags
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            FieldTag::KEYCOUNT_INT32 => "KEYCOUNT_INT32",
            FieldTag::EKA_OPERATION => "EKA_OPERATION",
            FieldTag::APPROVAL_COUNT => "APPROVAL_COUNT",
            FieldTag::TIME_MINUTE => "TIME_MINUTE",
            FieldTag::TIME_SECOND => "TIME_SECOND",
            FieldTag::TOKEN_COUNT => "TOKEN_COUNT",
            FieldTag::GROUP_COUNT => "GROUP_COUNT",
            FieldTag::SIGNATURES_REQUIRED => "SIGNATURES_REQUIRED",
            FieldTag::TIME_SECONDS_SINCE_EPOCH => "TIME_SECONDS_SINCE_EPOCH",
            FieldTag::LABEL_UTF8STRING => "LABEL_UTF8STRING",
            FieldTag::CERTIFICATEDATA_BYTES => "CERTIFICATEDATA_BYTES",
            FieldTag::SIGN_BLOB => "SIGN_BLOB",
            FieldTag::BLOCK_BLOB => "BLOCK_BLOB",
            FieldTag::UNBLOCK_BLOB => "UNBLOCK_BLOB",
            FieldTag::MODIFY_BLOB => "MODIFY_BLOB",
            FieldTag::PUBLIC_KEY_ENCODED => "PUBLIC_KEY_ENCODED",
            FieldTag::EKA_TIME_STAMP => "EKA_TIME_STAMP",
            FieldTag::APPROVAL_TOKEN => "APPROVAL_TOKEN",
            FieldTag::DER_SIGNATURE => "DER_SIGNATURE",
            FieldTag::EKA_SIGN_PAYLOAD => "EKA_SIGN_PAYLOAD",
            FieldTag::EKA_MODIFY_PAYLOAD => "EKA_MODIFY_PAYLOAD",
            _ => return None,
        };
        Some(name)
    }
}

impl From<u16> for FieldTag {
    fn from(value: u16) -> Self {
        FieldTag(value)
    }
}

impl From<FieldTag> for u16 {
    fn from(tag: FieldTag) -> Self {
        tag.0
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({})", name, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_to_16_bits() {
        assert_eq!(FieldTag::new(0x1_1052), FieldTag::PUBLIC_KEY_ENCODED);
        assert_eq!(FieldTag::new(4178).value(), 0x1052);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldTag::SIGN_BLOB.to_string(), "SIGN_BLOB(4174)");
        assert_eq!(FieldTag::new(7).to_string(), "7");
    }
}

use super::{AccessError, AccessToken};
use crate::codec::{length_header, strip_length_header, FieldCursor, FieldTag, Payload};
use crate::config::CodecConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The four operation kinds an access policy covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlobName {
    Signing,
    Block,
    UnBlock,
    Modify,
}

impl BlobName {
    /// Wire order of the blobs inside an [`Access`](super::Access)
    pub const ALL: [BlobName; 4] = [
        BlobName::Signing,
        BlobName::Block,
        BlobName::UnBlock,
        BlobName::Modify,
    ];

    pub fn tag(self) -> FieldTag {
        match self {
            BlobName::Signing => FieldTag::SIGN_BLOB,
            BlobName::Block => FieldTag::BLOCK_BLOB,
            BlobName::UnBlock => FieldTag::UNBLOCK_BLOB,
            BlobName::Modify => FieldTag::MODIFY_BLOB,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlobName::Signing => "Signing",
            BlobName::Block => "Block",
            BlobName::UnBlock => "Unblock",
            BlobName::Modify => "ChangeAttributes",
        }
    }

    pub fn from_tag(tag: FieldTag) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.tag() == tag)
    }
}

impl fmt::Display for BlobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All alternative policies for one operation kind
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessBlob {
    pub tokens: Vec<AccessToken>,
}

impl AccessBlob {
    pub fn new(tokens: Vec<AccessToken>) -> Self {
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True when any group of any token holds `encoded`
    pub fn contains_public_key(&self, encoded: &[u8]) -> bool {
        self.tokens
            .iter()
            .flat_map(|token| &token.groups)
            .any(|group| group.contains_key(encoded))
    }

    pub fn serialize(&self, payload: &mut Payload, config: &CodecConfig) {
        payload.push_u32(FieldTag::TOKEN_COUNT, self.tokens.len() as u32);
        for token in &self.tokens {
            token.serialize(payload, config);
        }
    }

    pub fn deserialize(
        cursor: &mut FieldCursor<'_>,
        config: &CodecConfig,
    ) -> Result<Self, AccessError> {
        let count = cursor.next_tagged(FieldTag::TOKEN_COUNT)?.as_u32()?;
        let mut tokens = Vec::new();
        for _ in 0..count {
            tokens.push(AccessToken::deserialize(cursor, config)?);
        }
        Ok(Self { tokens })
    }
}

impl From<Vec<AccessToken>> for AccessBlob {
    fn from(tokens: Vec<AccessToken>) -> Self {
        Self { tokens }
    }
}

/// An [`AccessBlob`] under its operation tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessNamedBlob {
    pub name: BlobName,
    pub blob: AccessBlob,
}

impl AccessNamedBlob {
    pub fn new(name: BlobName, blob: AccessBlob) -> Self {
        Self { name, blob }
    }

    /// As one field `tag(name) = length_header(blob)`, or spliced into
    /// `payload` when blob wrapping is disabled
    pub fn serialize(&self, payload: &mut Payload, config: &CodecConfig) {
        write_named(self.name, &self.blob, payload, config);
    }

    /// Read the next blob
    ///
    /// A wrapped blob names itself through its tag. Spliced blobs carry no
    /// name, so `slot` is used.
    pub fn deserialize(
        cursor: &mut FieldCursor<'_>,
        slot: BlobName,
        config: &CodecConfig,
    ) -> Result<Self, AccessError> {
        if !config.serialize_blob_as_one {
            return Ok(Self::new(slot, AccessBlob::deserialize(cursor, config)?));
        }

        let field = cursor.next_field()?;
        let name = BlobName::from_tag(field.tag()).ok_or_else(|| {
            debug!(tag = field.tag().value(), "unknown access blob tag");
            AccessError::UnknownBlobTag { tag: field.tag() }
        })?;
        let inner = Payload::from_bytes(strip_length_header(field.data())?)?;
        let blob = AccessBlob::deserialize(&mut inner.cursor(), config)?;
        Ok(Self::new(name, blob))
    }
}

pub(crate) fn write_named(
    name: BlobName,
    blob: &AccessBlob,
    payload: &mut Payload,
    config: &CodecConfig,
) {
    if config.serialize_blob_as_one {
        let mut inner = Payload::new();
        blob.serialize(&mut inner, config);
        payload.push(name.tag(), length_header(&inner.to_bytes()));
    } else {
        blob.serialize(payload, config);
    }
}

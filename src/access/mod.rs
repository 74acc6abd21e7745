//! Quorum-based access policy
//!
//! An [`Access`] holds one [`AccessBlob`] per operation kind. Each blob lists
//! alternative [`AccessToken`]s, and each token names the [`AccessGroup`]s
//! whose quorum can approve the operation. Everything here is decoded in
//! strict field order.

pub mod attributes;
mod blob;
mod group;
mod token;

pub use attributes::{KeyAlgorithm, KeyAttribute};
pub use blob::{AccessBlob, AccessNamedBlob, BlobName};
pub use group::{AccessGroup, PublicKey};
pub use token::AccessToken;

use crate::codec::{length_header, strip_length_header, CodecError, FieldTag, Payload};
use crate::config::CodecConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Invalid blob type {tag}")]
    UnknownBlobTag { tag: FieldTag },

    #[error("Invalid payload type {found}, required TIME_SECOND or TIME_MINUTE")]
    MissingTimeField { found: FieldTag },
}

impl AccessError {
    /// Returns a stable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::Codec(err) => err.error_code(),
            AccessError::UnknownBlobTag { .. } => "PRIMUS_E_ACCESS_BLOB_TAG_UNKNOWN",
            AccessError::MissingTimeField { .. } => "PRIMUS_E_ACCESS_TIME_FIELD_MISSING",
        }
    }
}

/// Access policy of a key: one blob per operation kind
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Access {
    pub sign: AccessBlob,
    pub block: AccessBlob,
    pub unblock: AccessBlob,
    pub modify: AccessBlob,
}

impl Access {
    pub fn new(sign: AccessBlob, block: AccessBlob, unblock: AccessBlob, modify: AccessBlob) -> Self {
        Self {
            sign,
            block,
            unblock,
            modify,
        }
    }

    pub fn blob(&self, name: BlobName) -> &AccessBlob {
        match name {
            BlobName::Signing => &self.sign,
            BlobName::Block => &self.block,
            BlobName::UnBlock => &self.unblock,
            BlobName::Modify => &self.modify,
        }
    }

    pub fn blob_mut(&mut self, name: BlobName) -> &mut AccessBlob {
        match name {
            BlobName::Signing => &mut self.sign,
            BlobName::Block => &mut self.block,
            BlobName::UnBlock => &mut self.unblock,
            BlobName::Modify => &mut self.modify,
        }
    }

    /// Blobs in wire order
    pub fn blobs(&self) -> [&AccessBlob; 4] {
        [&self.sign, &self.block, &self.unblock, &self.modify]
    }

    pub fn serialize(&self, config: &CodecConfig) -> Vec<u8> {
        let mut payload = Payload::new();
        for name in BlobName::ALL {
            blob::write_named(name, self.blob(name), &mut payload, config);
        }
        payload.to_bytes()
    }

    /// Decode four blobs; fields after the fourth are ignored
    pub fn deserialize(bytes: &[u8], config: &CodecConfig) -> Result<Self, AccessError> {
        let payload = Payload::from_bytes(bytes)?;
        let mut cursor = payload.cursor();
        let mut access = Access::default();
        for slot in BlobName::ALL {
            let named = AccessNamedBlob::deserialize(&mut cursor, slot, config)?;
            *access.blob_mut(named.name) = named.blob;
        }
        trace!(unread = cursor.remaining(), "decoded access policy");
        Ok(access)
    }

    /// Length-headered form used as the payload of a Modify approval
    pub fn to_modify_payload(&self, config: &CodecConfig) -> Vec<u8> {
        length_header(&self.serialize(config))
    }

    pub fn from_modify_payload(bytes: &[u8], config: &CodecConfig) -> Result<Self, AccessError> {
        Self::deserialize(strip_length_header(bytes)?, config)
    }
}

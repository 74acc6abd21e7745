//! Primus prelude
//!
//! ```rust
//! use primus_auth::prelude::*;
//!
//! let token = ApprovalToken::new(Operation::Sign, b"digest".to_vec(), "gt_ec_08");
//! let bytes = token.serialize();
//! assert_eq!(ApprovalToken::deserialize(&bytes).unwrap(), token);
//! ```

pub use crate::access::{
    Access, AccessBlob, AccessGroup, AccessNamedBlob, AccessToken, BlobName, KeyAlgorithm,
    KeyAttribute, PublicKey,
};
pub use crate::codec::{length_header, strip_length_header, Field, FieldTag, Payload};
pub use crate::config::{CodecConfig, PublicKeyFormat};
pub use crate::error::Error;
pub use crate::signature::{
    unwrap_signature, wrap_signature, EcdsaSigner, EcdsaVerifier, EnvelopedSignature,
    SignatureAlgorithm,
};
pub use crate::token::{
    ApprovalToken, AuthorizationToken, AuthorizationTokenBuilder, Operation, Timestamp,
};

#[cfg(feature = "p256")]
pub use crate::signature::{P256Signer, P256Verifier};

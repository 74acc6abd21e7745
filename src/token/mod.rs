//! Approval and authorization tokens
//!
//! An [`ApprovalToken`] asks for one operation on one key, optionally with an
//! HSM-issued [`Timestamp`] proving when the request was registered. An
//! [`AuthorizationToken`] wraps the serialized approval together with the
//! requester's signature over it and the key that made that signature.
//!
//! Both are decoded by tag lookup, so field order inside them is free.

mod approval;
mod authorization;
mod timestamp;

pub use approval::{ApprovalToken, Operation};
pub use authorization::{AuthorizationToken, AuthorizationTokenBuilder};
pub use timestamp::Timestamp;

use crate::access::AccessError;
use crate::codec::CodecError;
use crate::signature::SignatureError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Invalid token: missing {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Unknown approval operation code {code}")]
    UnknownOperation { code: u32 },
}

impl TokenError {
    /// Returns a stable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::Codec(err) => err.error_code(),
            TokenError::Signature(err) => err.error_code(),
            TokenError::Access(err) => err.error_code(),
            TokenError::MissingRequiredField { .. } => "PRIMUS_E_TOKEN_FIELD_MISSING",
            TokenError::UnknownOperation { .. } => "PRIMUS_E_TOKEN_OPERATION_UNKNOWN",
        }
    }
}

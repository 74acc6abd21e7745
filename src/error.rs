//! Unified error type for the public API
//!
//! Each layer keeps its own error enum for precise matching; [`Error`] rolls
//! them up for callers that only need one type.
//!
//! # Example
//!
//! ```
//! use primus_auth::{ApprovalToken, Error};
//!
//! fn operation_of(bytes: &[u8]) -> Result<String, Error> {
//!     Ok(ApprovalToken::deserialize(bytes)?.operation.to_string())
//! }
//!
//! let err = operation_of(&[]).unwrap_err();
//! assert!(err.is_token_error());
//! assert_eq!(err.error_code(), "PRIMUS_E_TOKEN_FIELD_MISSING");
//! ```

use thiserror::Error;

/// Any failure raised by this crate
///
/// # Error Categories
///
/// - **Codec**: TLV framing, truncation, or field order errors
/// - **Asn1**: malformed DER headers
/// - **Signature**: unknown algorithms or signing backend failures
/// - **Access**: access policy structure errors
/// - **Token**: approval or authorization token errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Codec error: {0}")]
    Codec(#[from] crate::codec::CodecError),

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] crate::asn1::Asn1Error),

    #[error("Signature error: {0}")]
    Signature(#[from] crate::signature::SignatureError),

    #[error("Access error: {0}")]
    Access(#[from] crate::access::AccessError),

    #[error("Token error: {0}")]
    Token(#[from] crate::token::TokenError),
}

impl Error {
    /// Returns a stable error code, `PRIMUS_E_<CATEGORY>_<SPECIFIC>`
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Codec(e) => e.error_code(),
            Self::Asn1(_) => "PRIMUS_E_ASN1_MALFORMED",
            Self::Signature(e) => e.error_code(),
            Self::Access(e) => e.error_code(),
            Self::Token(e) => e.error_code(),
        }
    }

    /// Returns a suggestion for resolving this error
    pub fn suggestion(&self) -> Option<&str> {
        use crate::codec::CodecError;
        use crate::signature::SignatureError;
        use crate::token::TokenError;

        let codec = match self {
            Self::Codec(e) => Some(e),
            Self::Access(crate::access::AccessError::Codec(e)) => Some(e),
            Self::Token(TokenError::Codec(e)) => Some(e),
            _ => None,
        };
        if let Some(CodecError::TruncatedInput { .. } | CodecError::LengthMismatch { .. }) = codec {
            return Some("Input was cut short or framed incorrectly; check the length header");
        }
        if let Some(CodecError::UnexpectedFieldTag { .. }) = codec {
            return Some("Check that encoder and decoder use the same CodecConfig");
        }

        match self {
            Self::Signature(SignatureError::UnsupportedAlgorithm { .. })
            | Self::Token(TokenError::Signature(SignatureError::UnsupportedAlgorithm { .. })) => {
                Some("Use one of SHA1/224/256/384/512withECDSA")
            }
            Self::Token(TokenError::MissingRequiredField { .. }) => {
                Some("Token must carry a signature, a public key and an approval token")
            }
            _ => None,
        }
    }

    pub fn is_codec_error(&self) -> bool {
        matches!(self, Self::Codec(_) | Self::Asn1(_))
    }

    pub fn is_signature_error(&self) -> bool {
        matches!(self, Self::Signature(_))
    }

    pub fn is_access_error(&self) -> bool {
        matches!(self, Self::Access(_))
    }

    pub fn is_token_error(&self) -> bool {
        matches!(self, Self::Token(_))
    }
}

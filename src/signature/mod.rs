//! Signature algorithms and the DER signature envelope
//!
//! Signatures inside tokens travel as an X.509-style AlgorithmIdentifier plus
//! BIT STRING pair. This module wraps and unwraps that envelope, recovers the
//! algorithm from its OID, and hashes inputs before handing them to an
//! [`EcdsaSigner`] or [`EcdsaVerifier`].

mod algorithm;
mod backend;
mod envelope;

pub use algorithm::SignatureAlgorithm;
#[cfg(feature = "p256")]
pub use backend::{P256Signer, P256Verifier};
pub use backend::{EcdsaSigner, EcdsaVerifier};
pub use envelope::{
    extract_algorithm, is_wrapped, unwrap_signature, wrap_signature, wrap_signature_named,
    EnvelopedSignature,
};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Unsupported signature algorithm: {name}")]
    UnsupportedAlgorithm { name: String },

    #[error("Signature envelope carries no registered algorithm OID")]
    UnknownOid,

    #[error("Signature backend error: {0}")]
    Backend(String),
}

impl SignatureError {
    /// Returns a stable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            SignatureError::UnsupportedAlgorithm { .. } => "PRIMUS_E_SIGNATURE_ALGORITHM_UNSUPPORTED",
            SignatureError::UnknownOid => "PRIMUS_E_SIGNATURE_OID_UNKNOWN",
            SignatureError::Backend(_) => "PRIMUS_E_SIGNATURE_BACKEND",
        }
    }
}

//! Elliptic-curve signing seam
//!
//! The protocol only hashes; the ECDSA operation itself is supplied by a
//! backend. [`P256Signer`] and [`P256Verifier`] cover NIST P-256 keys.

use super::SignatureError;

/// Produces ASN.1 DER ECDSA signatures over a precomputed digest
pub trait EcdsaSigner {
    fn sign_digest(&self, digest: &[u8]) -> Result<Vec<u8>, SignatureError>;
}

/// Checks ASN.1 DER ECDSA signatures over a precomputed digest
pub trait EcdsaVerifier {
    /// `public_key` is X.509 SubjectPublicKeyInfo DER
    fn verify_digest(&self, public_key: &[u8], digest: &[u8], signature: &[u8]) -> bool;
}

#[cfg(feature = "p256")]
pub use self::p256_backend::{P256Signer, P256Verifier};

#[cfg(feature = "p256")]
mod p256_backend {
    use super::{EcdsaSigner, EcdsaVerifier, SignatureError};
    use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
    use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
    use p256::pkcs8::{DecodePublicKey, EncodePublicKey};

    /// P-256 signing key
    pub struct P256Signer {
        key: SigningKey,
    }

    impl P256Signer {
        pub fn new(key: SigningKey) -> Self {
            Self { key }
        }

        /// SubjectPublicKeyInfo DER of the matching public key
        pub fn public_key_der(&self) -> Result<Vec<u8>, SignatureError> {
            self.key
                .verifying_key()
                .to_public_key_der()
                .map(|doc| doc.as_bytes().to_vec())
                .map_err(|e| SignatureError::Backend(e.to_string()))
        }
    }

    impl EcdsaSigner for P256Signer {
        fn sign_digest(&self, digest: &[u8]) -> Result<Vec<u8>, SignatureError> {
            let signature: Signature = self
                .key
                .sign_prehash(digest)
                .map_err(|e| SignatureError::Backend(e.to_string()))?;
            Ok(signature.to_der().as_bytes().to_vec())
        }
    }

    /// Verifies P-256 signatures against SubjectPublicKeyInfo keys
    #[derive(Debug, Clone, Copy, Default)]
    pub struct P256Verifier;

    impl EcdsaVerifier for P256Verifier {
        fn verify_digest(&self, public_key: &[u8], digest: &[u8], signature: &[u8]) -> bool {
            let Ok(key) = VerifyingKey::from_public_key_der(public_key) else {
                return false;
            };
            let Ok(signature) = Signature::from_der(signature) else {
                return false;
            };
            key.verify_prehash(digest, &signature).is_ok()
        }
    }
}

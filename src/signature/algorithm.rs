//! ECDSA signature algorithm registry

use super::{EcdsaSigner, EcdsaVerifier, SignatureError};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;
use subtle::{Choice, ConstantTimeEq};

/// Signature algorithms an HSM approval may be signed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    #[serde(rename = "SHA1withECDSA")]
    Sha1WithEcdsa,
    #[serde(rename = "SHA224withECDSA")]
    Sha224WithEcdsa,
    #[serde(rename = "SHA256withECDSA")]
    Sha256WithEcdsa,
    #[serde(rename = "SHA384withECDSA")]
    Sha384WithEcdsa,
    #[serde(rename = "SHA512withECDSA")]
    Sha512WithEcdsa,
}

impl SignatureAlgorithm {
    /// Every registered algorithm
    pub const ALL: [SignatureAlgorithm; 5] = [
        SignatureAlgorithm::Sha1WithEcdsa,
        SignatureAlgorithm::Sha224WithEcdsa,
        SignatureAlgorithm::Sha256WithEcdsa,
        SignatureAlgorithm::Sha384WithEcdsa,
        SignatureAlgorithm::Sha512WithEcdsa,
    ];

    /// Registered name, e.g. `SHA256withECDSA`
    pub fn name(self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha1WithEcdsa => "SHA1withECDSA",
            SignatureAlgorithm::Sha224WithEcdsa => "SHA224withECDSA",
            SignatureAlgorithm::Sha256WithEcdsa => "SHA256withECDSA",
            SignatureAlgorithm::Sha384WithEcdsa => "SHA384withECDSA",
            SignatureAlgorithm::Sha512WithEcdsa => "SHA512withECDSA",
        }
    }

    /// DER content octets of the algorithm's OBJECT IDENTIFIER
    pub fn oid(self) -> &'static [u8] {
        match self {
            // 1.2.840.10045.4.1
            SignatureAlgorithm::Sha1WithEcdsa => &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x01],
            // 1.2.840.10045.4.3.1 - 4
            SignatureAlgorithm::Sha224WithEcdsa => {
                &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x01]
            }
            SignatureAlgorithm::Sha256WithEcdsa => {
                &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x02]
            }
            SignatureAlgorithm::Sha384WithEcdsa => {
                &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x03]
            }
            SignatureAlgorithm::Sha512WithEcdsa => {
                &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x04]
            }
        }
    }

    /// Match OID content octets against the registry
    ///
    /// Every entry is compared in constant time; the scan does not stop early.
    pub fn from_oid(oid: &[u8]) -> Option<Self> {
        let mut found = None;
        for algorithm in Self::ALL {
            let matched: Choice = algorithm.oid().ct_eq(oid);
            if bool::from(matched) && found.is_none() {
                found = Some(algorithm);
            }
        }
        found
    }

    /// Hash `input` with the algorithm's digest
    pub fn digest(self, input: &[u8]) -> Vec<u8> {
        match self {
            SignatureAlgorithm::Sha1WithEcdsa => Sha1::digest(input).to_vec(),
            SignatureAlgorithm::Sha224WithEcdsa => Sha224::digest(input).to_vec(),
            SignatureAlgorithm::Sha256WithEcdsa => Sha256::digest(input).to_vec(),
            SignatureAlgorithm::Sha384WithEcdsa => Sha384::digest(input).to_vec(),
            SignatureAlgorithm::Sha512WithEcdsa => Sha512::digest(input).to_vec(),
        }
    }

    /// Hash `input` and sign the digest, yielding an ASN.1 DER ECDSA signature
    pub fn sign<S: EcdsaSigner + ?Sized>(
        self,
        signer: &S,
        input: &[u8],
    ) -> Result<Vec<u8>, SignatureError> {
        signer.sign_digest(&self.digest(input))
    }

    /// Hash `input` and verify a DER ECDSA signature over the digest
    ///
    /// `public_key` is X.509 SubjectPublicKeyInfo DER.
    pub fn verify<V: EcdsaVerifier + ?Sized>(
        self,
        verifier: &V,
        public_key: &[u8],
        input: &[u8],
        signature: &[u8],
    ) -> bool {
        verifier.verify_digest(public_key, &self.digest(input), signature)
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| SignatureError::UnsupportedAlgorithm {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

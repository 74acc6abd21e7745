//! AlgorithmIdentifier + BIT STRING signature envelope
//!
//! ```text
//! SEQUENCE {
//!     SEQUENCE { OBJECT IDENTIFIER <algorithm>, NULL }
//!     BIT STRING <0x00 unused-bits byte || raw signature>
//! }
//! ```

use super::{SignatureAlgorithm, SignatureError};
use crate::asn1::{self, identifiers, tags};
use serde::{Deserialize, Serialize};

/// Wrap a raw DER ECDSA signature with its algorithm identifier
pub fn wrap_signature(algorithm: SignatureAlgorithm, raw: &[u8]) -> Vec<u8> {
    let mut algorithm_id = Vec::with_capacity(algorithm.oid().len() + 4);
    asn1::write_element(&mut algorithm_id, identifiers::OBJECT_IDENTIFIER, algorithm.oid());
    asn1::write_element(&mut algorithm_id, identifiers::NULL, &[]);

    let mut bits = Vec::with_capacity(raw.len() + 1);
    bits.push(0x00);
    bits.extend_from_slice(raw);

    let mut body = Vec::with_capacity(algorithm_id.len() + bits.len() + 8);
    asn1::write_element(&mut body, identifiers::SEQUENCE, &algorithm_id);
    asn1::write_element(&mut body, identifiers::BIT_STRING, &bits);

    let mut out = Vec::with_capacity(body.len() + 4);
    asn1::write_element(&mut out, identifiers::SEQUENCE, &body);
    out
}

/// Wrap using an algorithm looked up by its registered name
pub fn wrap_signature_named(name: &str, raw: &[u8]) -> Result<Vec<u8>, SignatureError> {
    let algorithm: SignatureAlgorithm = name.parse()?;
    Ok(wrap_signature(algorithm, raw))
}

/// Structural check: a SEQUENCE whose first element is a SEQUENCE
pub fn is_wrapped(bytes: &[u8]) -> bool {
    let Ok(outer) = asn1::parse_header(bytes, 0) else {
        return false;
    };
    if !outer.is_universal(tags::SEQUENCE) {
        return false;
    }
    asn1::parse_header(bytes, outer.content_offset)
        .map(|inner| inner.is_universal(tags::SEQUENCE))
        .unwrap_or(false)
}

/// Raw signature carried in the envelope's BIT STRING
///
/// The leading unused-bits byte is dropped. `None` when no BIT STRING is found.
pub fn unwrap_signature(bytes: &[u8]) -> Option<&[u8]> {
    asn1::find_first(bytes, tags::BIT_STRING).map(|bits| bits.get(1..).unwrap_or_default())
}

/// Algorithm named by the first OBJECT IDENTIFIER in the envelope
pub fn extract_algorithm(bytes: &[u8]) -> Option<SignatureAlgorithm> {
    asn1::find_first(bytes, tags::OBJECT_IDENTIFIER).and_then(SignatureAlgorithm::from_oid)
}

/// A signature together with the algorithm it was produced with
///
/// `algorithm` is `None` when the signature arrived without an envelope, or
/// with an OID outside the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopedSignature {
    pub algorithm: Option<SignatureAlgorithm>,
    pub raw: Vec<u8>,
}

impl EnvelopedSignature {
    pub fn new(algorithm: SignatureAlgorithm, raw: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm: Some(algorithm),
            raw: raw.into(),
        }
    }

    /// Parse signature bytes, unwrapping them if they are an envelope
    pub fn from_der(bytes: &[u8]) -> Self {
        if is_wrapped(bytes) {
            Self {
                algorithm: extract_algorithm(bytes),
                raw: unwrap_signature(bytes).unwrap_or_default().to_vec(),
            }
        } else {
            Self {
                algorithm: None,
                raw: bytes.to_vec(),
            }
        }
    }

    /// Envelope encoding
    ///
    /// Bytes that already form an envelope are returned unchanged; a signature
    /// without a known algorithm is emitted as-is.
    pub fn to_der(&self) -> Vec<u8> {
        if is_wrapped(&self.raw) {
            return self.raw.clone();
        }
        match self.algorithm {
            Some(algorithm) => wrap_signature(algorithm, &self.raw),
            None => self.raw.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_HEX: &str = "30440220760d9ef0fae729dbdb73ff12ea58baa7b3ba116b7c53b963a195bcfc14b0a316022011b3ecd2f18b598a2f87e6c091efb740c7ceb9828551b64e48d36505267ee181";
    const WRAPPED_HEX: &str = "3057300c06082a8648ce3d040302050003470030440220760d9ef0fae729dbdb73ff12ea58baa7b3ba116b7c53b963a195bcfc14b0a316022011b3ecd2f18b598a2f87e6c091efb740c7ceb9828551b64e48d36505267ee181";

    #[test]
    fn test_wrap_matches_reference_vector() {
        let raw = hex::decode(RAW_HEX).unwrap();
        let wrapped = wrap_signature(SignatureAlgorithm::Sha256WithEcdsa, &raw);
        assert_eq!(hex::encode(&wrapped), WRAPPED_HEX);
        assert_eq!(unwrap_signature(&wrapped), Some(raw.as_slice()));
    }

    #[test]
    fn test_scan_reference_vector() {
        let wrapped = hex::decode(WRAPPED_HEX).unwrap();
        assert_eq!(
            asn1::find_first(&wrapped, tags::OBJECT_IDENTIFIER),
            Some(&[42, 134, 72, 206, 61, 4, 3, 2][..])
        );
        assert_eq!(
            hex::encode(asn1::find_first(&wrapped, tags::BIT_STRING).unwrap()),
            format!("00{}", RAW_HEX)
        );
        assert_eq!(
            extract_algorithm(&wrapped),
            Some(SignatureAlgorithm::Sha256WithEcdsa)
        );
    }

    #[test]
    fn test_roundtrip_every_algorithm() {
        let raw = vec![11u8; 32];
        for algorithm in SignatureAlgorithm::ALL {
            let wrapped = wrap_signature(algorithm, &raw);
            assert!(is_wrapped(&wrapped));
            assert_eq!(unwrap_signature(&wrapped), Some(raw.as_slice()));
            assert_eq!(extract_algorithm(&wrapped), Some(algorithm));
        }
    }

    #[test]
    fn test_long_signature_uses_long_form_lengths() {
        let raw = vec![0x5A; 300];
        let wrapped = wrap_signature(SignatureAlgorithm::Sha512WithEcdsa, &raw);
        assert_eq!(&wrapped[..2], &[0x30, 0x82]);
        assert_eq!(unwrap_signature(&wrapped), Some(raw.as_slice()));
    }

    #[test]
    fn test_wrap_named_rejects_unknown() {
        assert!(matches!(
            wrap_signature_named("MD5withECDSA", b"sig"),
            Err(SignatureError::UnsupportedAlgorithm { name }) if name == "MD5withECDSA"
        ));
        assert!(wrap_signature_named("SHA1withECDSA", b"sig").is_ok());
    }

    #[test]
    fn test_is_wrapped_heuristic() {
        let raw = hex::decode(RAW_HEX).unwrap();
        // a bare ECDSA signature is SEQUENCE { INTEGER, INTEGER }
        assert!(!is_wrapped(&raw));
        assert!(!is_wrapped(&[]));
        assert!(!is_wrapped(&[0x04, 0x00]));
    }

    #[test]
    fn test_enveloped_signature() {
        let signature = EnvelopedSignature::new(SignatureAlgorithm::Sha256WithEcdsa, vec![11u8; 32]);
        let der = signature.to_der();
        assert_eq!(EnvelopedSignature::from_der(&der), signature);

        let plain = EnvelopedSignature::from_der(b"not an envelope");
        assert_eq!(plain.algorithm, None);
        assert_eq!(plain.to_der(), b"not an envelope".to_vec());
    }
}

//! Key algorithm and key attribute vocabulary
//!
//! Used by callers composing a ChangeAttributes request for a key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown key {kind}: {name}")]
pub struct UnknownName {
    kind: &'static str,
    name: String,
}

/// Curves an HSM key can be created on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    #[serde(rename = "SECP224R1")]
    Secp224r1,
    #[serde(rename = "SECP256K1")]
    Secp256k1,
    #[serde(rename = "SECP256R1")]
    Secp256r1,
    #[serde(rename = "SECP384R1")]
    Secp384r1,
    #[serde(rename = "SECP521R1")]
    Secp521r1,
    #[serde(rename = "ED25519")]
    Ed25519,
    #[serde(rename = "CURVE25519", alias = "X25519")]
    X25519,
}

impl KeyAlgorithm {
    pub const ALL: [KeyAlgorithm; 7] = [
        KeyAlgorithm::Secp224r1,
        KeyAlgorithm::Secp256k1,
        KeyAlgorithm::Secp256r1,
        KeyAlgorithm::Secp384r1,
        KeyAlgorithm::Secp521r1,
        KeyAlgorithm::Ed25519,
        KeyAlgorithm::X25519,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KeyAlgorithm::Secp224r1 => "SECP224R1",
            KeyAlgorithm::Secp256k1 => "SECP256K1",
            KeyAlgorithm::Secp256r1 => "SECP256R1",
            KeyAlgorithm::Secp384r1 => "SECP384R1",
            KeyAlgorithm::Secp521r1 => "SECP521R1",
            KeyAlgorithm::Ed25519 => "ED25519",
            KeyAlgorithm::X25519 => "CURVE25519",
        }
    }

    /// Signatures on this curve are produced as an (r, s) pair
    pub fn is_rs_signature(self) -> bool {
        match self {
            KeyAlgorithm::Secp224r1
            | KeyAlgorithm::Secp256k1
            | KeyAlgorithm::Secp256r1
            | KeyAlgorithm::Secp384r1
            | KeyAlgorithm::Secp521r1
            | KeyAlgorithm::Ed25519
            | KeyAlgorithm::X25519 => true,
        }
    }
}

impl FromStr for KeyAlgorithm {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "X25519" {
            return Ok(KeyAlgorithm::X25519);
        }
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| UnknownName {
                kind: "algorithm",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key capability and access flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyAttribute {
    CapabilitySign,
    CapabilityDecrypt,
    CapabilityDerive,
    CapabilityIntegrity,
    AccessAlwaysSensitive,
    AccessNoPublicKey,
    AccessBlocked,
    AccessIndestructible,
    AccessToken,
    AccessCopyable,
    AccessExtractable,
    AccessSensitive,
    AccessModifiable,
}

impl KeyAttribute {
    pub const ALL: [KeyAttribute; 13] = [
        KeyAttribute::CapabilitySign,
        KeyAttribute::CapabilityDecrypt,
        KeyAttribute::CapabilityDerive,
        KeyAttribute::CapabilityIntegrity,
        KeyAttribute::AccessAlwaysSensitive,
        KeyAttribute::AccessNoPublicKey,
        KeyAttribute::AccessBlocked,
        KeyAttribute::AccessIndestructible,
        KeyAttribute::AccessToken,
        KeyAttribute::AccessCopyable,
        KeyAttribute::AccessExtractable,
        KeyAttribute::AccessSensitive,
        KeyAttribute::AccessModifiable,
    ];

    pub const CAPABILITIES: [KeyAttribute; 4] = [
        KeyAttribute::CapabilitySign,
        KeyAttribute::CapabilityDecrypt,
        KeyAttribute::CapabilityDerive,
        KeyAttribute::CapabilityIntegrity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KeyAttribute::CapabilitySign => "CAPABILITY_SIGN",
            KeyAttribute::CapabilityDecrypt => "CAPABILITY_DECRYPT",
            KeyAttribute::CapabilityDerive => "CAPABILITY_DERIVE",
            KeyAttribute::CapabilityIntegrity => "CAPABILITY_INTEGRITY",
            KeyAttribute::AccessAlwaysSensitive => "ACCESS_ALWAYS_SENSITIVE",
            KeyAttribute::AccessNoPublicKey => "ACCESS_NO_PUBLIC_KEY",
            KeyAttribute::AccessBlocked => "ACCESS_BLOCKED",
            KeyAttribute::AccessIndestructible => "ACCESS_INDESTRUCTIBLE",
            KeyAttribute::AccessToken => "ACCESS_TOKEN",
            KeyAttribute::AccessCopyable => "ACCESS_COPYABLE",
            KeyAttribute::AccessExtractable => "ACCESS_EXTRACTABLE",
            KeyAttribute::AccessSensitive => "ACCESS_SENSITIVE",
            KeyAttribute::AccessModifiable => "ACCESS_MODIFIABLE",
        }
    }

    /// Bit within the capability or access flag word
    ///
    /// Capability and access bits live in separate words, so values overlap
    /// across the two families.
    pub fn flag(self) -> u32 {
        match self {
            KeyAttribute::CapabilitySign => 4,
            KeyAttribute::CapabilityDecrypt => 2,
            KeyAttribute::CapabilityDerive => 64,
            KeyAttribute::CapabilityIntegrity => 128,
            KeyAttribute::AccessAlwaysSensitive => 4096,
            KeyAttribute::AccessNoPublicKey => 2048,
            KeyAttribute::AccessBlocked => 512,
            KeyAttribute::AccessIndestructible => 64,
            KeyAttribute::AccessToken => 32,
            KeyAttribute::AccessCopyable => 8,
            KeyAttribute::AccessExtractable => 2,
            KeyAttribute::AccessSensitive => 1,
            KeyAttribute::AccessModifiable => 4,
        }
    }

    pub fn is_capability(self) -> bool {
        Self::CAPABILITIES.contains(&self)
    }

    pub fn is_access(self) -> bool {
        !self.is_capability()
    }

    /// Whether every bit of this attribute is set in `flags`
    pub fn has_flag(self, flags: u32) -> bool {
        flags & self.flag() == self.flag()
    }

    /// Combine attributes of one family into a flag word
    pub fn combine<'a>(attributes: impl IntoIterator<Item = &'a KeyAttribute>) -> u32 {
        attributes
            .into_iter()
            .fold(0, |flags, attribute| flags | attribute.flag())
    }

    /// Attributes a newly created key carries unless overridden
    pub fn defaults() -> BTreeMap<KeyAttribute, bool> {
        BTreeMap::from([
            (KeyAttribute::AccessExtractable, false),
            (KeyAttribute::AccessSensitive, true),
            (KeyAttribute::AccessModifiable, true),
        ])
    }
}

impl FromStr for KeyAttribute {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.name() == s)
            .ok_or_else(|| UnknownName {
                kind: "attribute",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for KeyAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_algorithm_names() {
        for algorithm in KeyAlgorithm::ALL {
            assert_eq!(algorithm.name().parse::<KeyAlgorithm>().unwrap(), algorithm);
            assert!(algorithm.is_rs_signature());
        }
        assert_eq!("X25519".parse::<KeyAlgorithm>().unwrap(), KeyAlgorithm::X25519);
        assert_eq!(KeyAlgorithm::X25519.to_string(), "CURVE25519");
        assert!("RSA2048".parse::<KeyAlgorithm>().is_err());
    }

    #[test]
    fn test_attribute_families() {
        assert!(KeyAttribute::CapabilityIntegrity.is_capability());
        assert!(!KeyAttribute::CapabilityIntegrity.is_access());
        assert!(KeyAttribute::AccessBlocked.is_access());
        assert_eq!(
            KeyAttribute::ALL.iter().filter(|a| a.is_access()).count(),
            9
        );
    }

    #[test]
    fn test_flags() {
        let flags = KeyAttribute::combine(&[
            KeyAttribute::AccessSensitive,
            KeyAttribute::AccessModifiable,
        ]);
        assert_eq!(flags, 5);
        assert!(KeyAttribute::AccessSensitive.has_flag(flags));
        assert!(KeyAttribute::AccessModifiable.has_flag(flags));
        assert!(!KeyAttribute::AccessExtractable.has_flag(flags));
    }

    #[test]
    fn test_defaults() {
        let defaults = KeyAttribute::defaults();
        assert_eq!(defaults.get(&KeyAttribute::AccessExtractable), Some(&false));
        assert_eq!(defaults.get(&KeyAttribute::AccessSensitive), Some(&true));
        assert_eq!(defaults.len(), 3);
    }

    #[test]
    fn test_attribute_parse() {
        assert_eq!(
            "ACCESS_NO_PUBLIC_KEY".parse::<KeyAttribute>().unwrap(),
            KeyAttribute::AccessNoPublicKey
        );
        assert_eq!(
            serde_json::to_string(&KeyAttribute::CapabilitySign).unwrap(),
            "\"CAPABILITY_SIGN\""
        );
    }
}

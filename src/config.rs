//! Wire-format negotiation switches
//!
//! Different HSM firmware generations accept slightly different encodings.
//! A [`CodecConfig`] is an immutable value threaded into every encode/decode
//! call; there is no process-wide state.
//!
//! # Example
//!
//! ```
//! use primus_auth::CodecConfig;
//!
//! let legacy = CodecConfig::default()
//!     .with_naming_support(false)
//!     .with_seconds_support(false);
//! assert!(legacy.serialize_blob_as_one);
//!
//! let loaded = CodecConfig::from_json(r#"{ "supports_seconds": false }"#).unwrap();
//! assert!(!loaded.supports_seconds);
//! assert!(loaded.naming_support);
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Emit LABEL_UTF8STRING name fields for groups and access tokens
    pub naming_support: bool,
    /// Allow seconds-resolution delay/time-limit fields
    pub supports_seconds: bool,
    /// Wrap each access blob in a single length-headered field
    pub serialize_blob_as_one: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            naming_support: true,
            supports_seconds: true,
            serialize_blob_as_one: true,
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_naming_support(mut self, enabled: bool) -> Self {
        self.naming_support = enabled;
        self
    }

    pub fn with_seconds_support(mut self, enabled: bool) -> Self {
        self.supports_seconds = enabled;
        self
    }

    pub fn with_blob_as_one(mut self, enabled: bool) -> Self {
        self.serialize_blob_as_one = enabled;
        self
    }

    /// Load from JSON; absent keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// How the signer's key travels inside an authorization token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicKeyFormat {
    /// X.509 SubjectPublicKeyInfo DER under PUBLIC_KEY_ENCODED
    #[default]
    SubjectPublicKeyInfo,
    /// Certificate blob under CERTIFICATEDATA_BYTES
    Certificate,
}

impl PublicKeyFormat {
    pub fn tag(self) -> crate::codec::FieldTag {
        match self {
            PublicKeyFormat::SubjectPublicKeyInfo => crate::codec::FieldTag::PUBLIC_KEY_ENCODED,
            PublicKeyFormat::Certificate => crate::codec::FieldTag::CERTIFICATEDATA_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert!(config.naming_support);
        assert!(config.supports_seconds);
        assert!(config.serialize_blob_as_one);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CodecConfig::new().with_blob_as_one(false);
        let json = config.to_json().unwrap();
        assert_eq!(CodecConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(CodecConfig::from_json(r#"{ "naming": true }"#).is_err());
    }

    #[test]
    fn test_public_key_format_tags() {
        assert_eq!(
            PublicKeyFormat::default().tag(),
            crate::codec::FieldTag::PUBLIC_KEY_ENCODED
        );
        assert_eq!(
            PublicKeyFormat::Certificate.tag(),
            crate::codec::FieldTag::CERTIFICATEDATA_BYTES
        );
    }
}

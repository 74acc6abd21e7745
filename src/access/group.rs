use super::AccessError;
use crate::codec::{FieldCursor, FieldTag, Payload};
use crate::config::CodecConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A keyholder's public key, X.509 SubjectPublicKeyInfo DER
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PublicKey {
    Named { name: String, encoded: Vec<u8> },
    Anonymous(Vec<u8>),
}

impl PublicKey {
    /// A labelled key; an empty name yields an anonymous key
    pub fn named(name: impl Into<String>, encoded: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        if name.is_empty() {
            PublicKey::Anonymous(encoded.into())
        } else {
            PublicKey::Named {
                name,
                encoded: encoded.into(),
            }
        }
    }

    pub fn anonymous(encoded: impl Into<Vec<u8>>) -> Self {
        PublicKey::Anonymous(encoded.into())
    }

    pub fn encoded(&self) -> &[u8] {
        match self {
            PublicKey::Named { encoded, .. } => encoded,
            PublicKey::Anonymous(encoded) => encoded,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            PublicKey::Named { name, .. } => Some(name),
            PublicKey::Anonymous(_) => None,
        }
    }

    /// Key labels are written whenever present, independent of naming support
    pub fn serialize(&self, payload: &mut Payload) {
        if let Some(name) = self.name() {
            payload.push(FieldTag::LABEL_UTF8STRING, name.as_bytes());
        }
        payload.push(FieldTag::PUBLIC_KEY_ENCODED, self.encoded());
    }

    pub fn deserialize(cursor: &mut FieldCursor<'_>) -> Result<Self, AccessError> {
        let name = match cursor.next_if(FieldTag::LABEL_UTF8STRING) {
            Some(label) => Some(label.as_str()?.to_string()),
            None => None,
        };
        let encoded = cursor.next_tagged(FieldTag::PUBLIC_KEY_ENCODED)?.data().to_vec();
        Ok(match name {
            Some(name) => PublicKey::named(name, encoded),
            None => PublicKey::Anonymous(encoded),
        })
    }
}

/// A set of keyholders, any `quorum` of whom may approve an operation
///
/// The quorum is recorded as found on the wire; it is not checked against
/// the number of keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "GroupJson", try_from = "GroupJson")]
pub struct AccessGroup {
    pub name: Option<String>,
    pub quorum: u32,
    pub keys: Vec<PublicKey>,
}

impl AccessGroup {
    pub fn new(name: Option<String>, quorum: u32, keys: Vec<PublicKey>) -> Self {
        Self { name, quorum, keys }
    }

    pub fn serialize(&self, payload: &mut Payload, config: &CodecConfig) {
        if let Some(name) = self.name.as_deref().filter(|name| !name.is_empty()) {
            if config.naming_support {
                payload.push(FieldTag::LABEL_UTF8STRING, name.as_bytes());
            }
        }
        payload.push_u32(FieldTag::SIGNATURES_REQUIRED, self.quorum);
        payload.push_u32(FieldTag::KEYCOUNT_INT32, self.keys.len() as u32);
        for key in &self.keys {
            key.serialize(payload);
        }
    }

    pub fn deserialize(
        cursor: &mut FieldCursor<'_>,
        _config: &CodecConfig,
    ) -> Result<Self, AccessError> {
        Self::read(cursor).inspect_err(|err| {
            debug!(position = cursor.position(), %err, "rejected access group");
        })
    }

    fn read(cursor: &mut FieldCursor<'_>) -> Result<Self, AccessError> {
        let name = match cursor.next_if(FieldTag::LABEL_UTF8STRING) {
            Some(label) => Some(label.as_str()?.to_string()),
            None => None,
        };
        let quorum = cursor.next_tagged(FieldTag::SIGNATURES_REQUIRED)?.as_u32()?;
        let count = cursor.next_tagged(FieldTag::KEYCOUNT_INT32)?.as_u32()?;

        // count is untrusted; the cursor bounds the loop
        let mut keys = Vec::new();
        for _ in 0..count {
            keys.push(PublicKey::deserialize(cursor)?);
        }
        Ok(Self { name, quorum, keys })
    }

    /// How many of `candidates` byte-equal a key held by this group
    pub fn count_matches<K: AsRef<[u8]>>(&self, candidates: &[K]) -> usize {
        candidates
            .iter()
            .filter(|candidate| {
                self.keys
                    .iter()
                    .any(|key| key.encoded() == candidate.as_ref())
            })
            .count()
    }

    pub fn is_satisfied_by<K: AsRef<[u8]>>(&self, candidates: &[K]) -> bool {
        self.count_matches(candidates) >= self.quorum as usize
    }

    pub fn contains_key(&self, encoded: &[u8]) -> bool {
        self.keys.iter().any(|key| key.encoded() == encoded)
    }
}

/// JSON shape: keys are hex strings, an absent name is the empty string
#[derive(Serialize, Deserialize)]
struct GroupJson {
    #[serde(default)]
    name: String,
    quorum: u32,
    #[serde(default)]
    public_keys: Vec<String>,
}

impl From<AccessGroup> for GroupJson {
    fn from(group: AccessGroup) -> Self {
        Self {
            name: group.name.unwrap_or_default(),
            quorum: group.quorum,
            public_keys: group.keys.iter().map(|key| hex::encode(key.encoded())).collect(),
        }
    }
}

impl TryFrom<GroupJson> for AccessGroup {
    type Error = hex::FromHexError;

    fn try_from(json: GroupJson) -> Result<Self, Self::Error> {
        let keys = json
            .public_keys
            .iter()
            .map(|key| hex::decode(key).map(PublicKey::Anonymous))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: Some(json.name).filter(|name| !name.is_empty()),
            quorum: json.quorum,
            keys,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;

    fn group() -> AccessGroup {
        AccessGroup::new(
            Some("ops".to_string()),
            2,
            vec![
                PublicKey::named("alice", vec![0xA1; 8]),
                PublicKey::anonymous(vec![0xB2; 8]),
                PublicKey::anonymous(vec![0xC3; 8]),
            ],
        )
    }

    #[test]
    fn test_field_order() {
        let mut payload = Payload::new();
        group().serialize(&mut payload, &CodecConfig::default());
        let tags: Vec<FieldTag> = payload.fields().iter().map(|f| f.tag()).collect();
        assert_eq!(
            tags,
            vec![
                FieldTag::LABEL_UTF8STRING,
                FieldTag::SIGNATURES_REQUIRED,
                FieldTag::KEYCOUNT_INT32,
                FieldTag::LABEL_UTF8STRING,
                FieldTag::PUBLIC_KEY_ENCODED,
                FieldTag::PUBLIC_KEY_ENCODED,
                FieldTag::PUBLIC_KEY_ENCODED,
            ]
        );
    }

    #[test]
    fn test_roundtrip() {
        let config = CodecConfig::default();
        let mut payload = Payload::new();
        group().serialize(&mut payload, &config);

        let decoded = Payload::from_bytes(&payload.to_bytes()).unwrap();
        let mut cursor = decoded.cursor();
        assert_eq!(AccessGroup::deserialize(&mut cursor, &config).unwrap(), group());
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_name_dropped_without_naming_support() {
        let config = CodecConfig::default().with_naming_support(false);
        let mut payload = Payload::new();
        group().serialize(&mut payload, &config);
        assert_eq!(payload.fields()[0].tag(), FieldTag::SIGNATURES_REQUIRED);

        let decoded = AccessGroup::deserialize(&mut payload.cursor(), &config).unwrap();
        assert_eq!(decoded.name, None);
        // key labels are unaffected
        assert_eq!(decoded.keys[0].name(), Some("alice"));
    }

    #[test]
    fn test_wrong_quorum_tag() {
        let mut payload = Payload::new();
        payload.push_u32(FieldTag::KEYCOUNT_INT32, 0);
        let err = AccessGroup::deserialize(&mut payload.cursor(), &CodecConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            AccessError::Codec(CodecError::UnexpectedFieldTag {
                found: FieldTag::KEYCOUNT_INT32,
                required: FieldTag::SIGNATURES_REQUIRED,
            })
        );
    }

    #[test]
    fn test_key_count_exceeds_fields() {
        let mut payload = Payload::new();
        payload.push_u32(FieldTag::SIGNATURES_REQUIRED, 1);
        payload.push_u32(FieldTag::KEYCOUNT_INT32, u32::MAX);
        payload.push(FieldTag::PUBLIC_KEY_ENCODED, vec![1, 2, 3]);
        let err = AccessGroup::deserialize(&mut payload.cursor(), &CodecConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            AccessError::Codec(CodecError::MissingField { .. })
        ));
    }

    #[test]
    fn test_quorum_not_validated() {
        let mut payload = Payload::new();
        AccessGroup::new(None, 5, vec![PublicKey::anonymous(vec![1])])
            .serialize(&mut payload, &CodecConfig::default());
        let decoded =
            AccessGroup::deserialize(&mut payload.cursor(), &CodecConfig::default()).unwrap();
        assert_eq!(decoded.quorum, 5);
    }

    #[test]
    fn test_count_matches() {
        let a = vec![0xAu8; 4];
        let b = vec![0xBu8; 4];
        let c = vec![0xCu8; 4];
        let d = vec![0xDu8; 4];
        let group = AccessGroup::new(
            None,
            2,
            vec![
                PublicKey::anonymous(a.clone()),
                PublicKey::anonymous(b),
                PublicKey::anonymous(c.clone()),
            ],
        );
        assert_eq!(group.count_matches(&[a.clone(), c.clone(), d.clone()]), 2);
        assert!(group.is_satisfied_by(&[a.clone(), c]));
        assert!(!group.is_satisfied_by(&[a, d]));
    }

    #[test]
    fn test_json_shape() {
        let group = AccessGroup::new(
            Some("Test".to_string()),
            2,
            vec![
                PublicKey::anonymous(vec![1, 2, 3]),
                PublicKey::anonymous(vec![4, 5, 6]),
                PublicKey::anonymous(vec![7, 8, 9]),
            ],
        );
        let json = serde_json::to_string(&group).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Test","quorum":2,"public_keys":["010203","040506","070809"]}"#
        );
        let back: AccessGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(back, group);
    }

    #[test]
    fn test_json_rejects_bad_hex() {
        let result: Result<AccessGroup, _> =
            serde_json::from_str(r#"{"name":"","quorum":1,"public_keys":["zz"]}"#);
        assert!(result.is_err());
    }
}

use super::{AccessError, AccessGroup};
use crate::codec::{FieldCursor, FieldTag, Payload};
use crate::config::CodecConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// One alternative policy for an operation
///
/// The operation may proceed once `delay` has elapsed after approval, and the
/// approval lapses after `time_limit`, provided any group's quorum is met.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "delay_ms", with = "millis")]
    pub delay: Duration,
    #[serde(rename = "time_limit_ms", with = "millis")]
    pub time_limit: Duration,
    #[serde(default)]
    pub groups: Vec<AccessGroup>,
}

impl AccessToken {
    pub fn new(delay: Duration, time_limit: Duration, groups: Vec<AccessGroup>) -> Self {
        Self {
            name: None,
            delay,
            time_limit,
            groups,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether the token will be written with seconds resolution
    pub fn uses_seconds(&self, config: &CodecConfig) -> bool {
        let delay = self.delay.as_secs();
        let limit = self.time_limit.as_secs();
        let max = i32::MAX as u64;
        config.supports_seconds && (delay % 60 != 0 || limit % 60 != 0) && delay < max && limit < max
    }

    pub fn serialize(&self, payload: &mut Payload, config: &CodecConfig) {
        if let Some(name) = self.name.as_deref().filter(|name| !name.is_empty()) {
            if config.naming_support {
                payload.push(FieldTag::LABEL_UTF8STRING, name.as_bytes());
            }
        }

        if self.uses_seconds(config) {
            payload.push_u32(FieldTag::TIME_SECOND, self.delay.as_secs() as u32);
            payload.push_u32(FieldTag::TIME_SECOND, self.time_limit.as_secs() as u32);
        } else {
            payload.push_u32(FieldTag::TIME_MINUTE, whole_minutes(self.delay));
            payload.push_u32(FieldTag::TIME_MINUTE, whole_minutes(self.time_limit));
        }

        payload.push_u32(FieldTag::GROUP_COUNT, self.groups.len() as u32);
        for group in &self.groups {
            group.serialize(payload, config);
        }
    }

    pub fn deserialize(
        cursor: &mut FieldCursor<'_>,
        config: &CodecConfig,
    ) -> Result<Self, AccessError> {
        Self::read(cursor, config).inspect_err(|err| {
            debug!(position = cursor.position(), %err, "rejected access token");
        })
    }

    fn read(cursor: &mut FieldCursor<'_>, config: &CodecConfig) -> Result<Self, AccessError> {
        let name = match cursor.next_if(FieldTag::LABEL_UTF8STRING) {
            Some(label) => Some(label.as_str()?.to_string()),
            None => None,
        };

        let first = cursor.next_field()?;
        let unit = match first.tag() {
            FieldTag::TIME_SECOND => 1,
            FieldTag::TIME_MINUTE => 60,
            found => return Err(AccessError::MissingTimeField { found }),
        };
        let delay = Duration::from_secs(u64::from(first.as_u32()?) * unit);
        let limit = cursor.next_tagged(first.tag())?.as_u32()?;
        let time_limit = Duration::from_secs(u64::from(limit) * unit);

        let count = cursor.next_tagged(FieldTag::GROUP_COUNT)?.as_u32()?;
        let mut groups = Vec::new();
        for _ in 0..count {
            groups.push(AccessGroup::deserialize(cursor, config)?);
        }

        Ok(Self {
            name,
            delay,
            time_limit,
            groups,
        })
    }

    /// True when any group's quorum is met by `candidates`
    pub fn is_satisfied_by<K: AsRef<[u8]>>(&self, candidates: &[K]) -> bool {
        self.groups
            .iter()
            .any(|group| group.is_satisfied_by(candidates))
    }
}

fn whole_minutes(duration: Duration) -> u32 {
    u32::try_from(duration.as_secs() / 60).unwrap_or(u32::MAX)
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis().min(u128::from(u64::MAX)) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

use super::TokenError;
use crate::codec::{FieldTag, Payload};
use chrono::{DateTime, Utc};

/// HSM countersignature context for a delayed operation
///
/// Records which integrity key stamped the payload and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    pub payload: Vec<u8>,
    pub key_name: String,
    pub seconds: i64,
}

impl Timestamp {
    pub fn new(payload: impl Into<Vec<u8>>, key_name: impl Into<String>, seconds: i64) -> Self {
        Self {
            payload: payload.into(),
            key_name: key_name.into(),
            seconds,
        }
    }

    /// Headerless sub-message: empty marker, payload, 8-byte seconds, key name
    pub fn encode(&self) -> Vec<u8> {
        let mut payload = Payload::new();
        payload.push(FieldTag::APPROVAL_COUNT, Vec::new());
        payload.push(FieldTag::EKA_SIGN_PAYLOAD, self.payload.as_slice());
        payload.push(
            FieldTag::TIME_SECONDS_SINCE_EPOCH,
            (self.seconds as u64).to_le_bytes(),
        );
        payload.push(FieldTag::LABEL_UTF8STRING, self.key_name.as_bytes());
        payload.to_bytes()
    }

    /// Lenient decode
    ///
    /// Only the low 32 bits of the seconds field are read; a missing or
    /// short seconds field yields zero and a missing key name is empty.
    pub fn decode(bytes: &[u8]) -> Result<Self, TokenError> {
        let payload = Payload::from_framed_bytes(bytes)?;
        let key_name = payload
            .find_data(FieldTag::LABEL_UTF8STRING)
            .map(|data| String::from_utf8_lossy(data).into_owned())
            .unwrap_or_default();
        let seconds = payload
            .find_data(FieldTag::TIME_SECONDS_SINCE_EPOCH)
            .and_then(|data| data.get(..4))
            .map(|low| i64::from(u32::from_le_bytes([low[0], low[1], low[2], low[3]])))
            .unwrap_or(0);
        Ok(Self {
            payload: payload
                .find_data(FieldTag::EKA_SIGN_PAYLOAD)
                .unwrap_or_default()
                .to_vec(),
            key_name,
            seconds,
        })
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, 0)
    }
}

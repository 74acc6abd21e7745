use super::{Timestamp, TokenError};
use crate::access::{Access, BlobName};
use crate::codec::{FieldTag, Payload};
use crate::config::CodecConfig;
use crate::signature::EnvelopedSignature;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Key operation an approval asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Sign,
    Block,
    UnBlock,
    Modify,
}

impl Operation {
    /// Unwrapping shares the signing code on the wire
    pub const UNWRAP: Operation = Operation::Sign;

    pub fn code(self) -> u32 {
        match self {
            Operation::Sign => 1,
            Operation::Block => 2,
            Operation::UnBlock => 3,
            Operation::Modify => 4,
        }
    }

    pub fn from_code(code: u32) -> Result<Self, TokenError> {
        match code {
            1 => Ok(Operation::Sign),
            2 => Ok(Operation::Block),
            3 => Ok(Operation::UnBlock),
            4 => Ok(Operation::Modify),
            _ => Err(TokenError::UnknownOperation { code }),
        }
    }

    /// Access blob governing this operation
    pub fn blob_name(self) -> BlobName {
        match self {
            Operation::Sign => BlobName::Signing,
            Operation::Block => BlobName::Block,
            Operation::UnBlock => BlobName::UnBlock,
            Operation::Modify => BlobName::Modify,
        }
    }

    fn payload_tag(self) -> FieldTag {
        match self {
            Operation::Modify => FieldTag::EKA_MODIFY_PAYLOAD,
            Operation::Sign | Operation::Block | Operation::UnBlock => FieldTag::EKA_SIGN_PAYLOAD,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Sign => "SIGN",
            Operation::Block => "BLOCK",
            Operation::UnBlock => "UNBLOCK",
            Operation::Modify => "MODIFY",
        })
    }
}

/// A request to perform one operation on one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalToken {
    pub operation: Operation,
    pub key_name: String,
    /// Content to sign, or the new access policy for [`Operation::Modify`]
    pub payload: Vec<u8>,
    pub timestamp: Option<Vec<u8>>,
    pub timestamp_signature: Option<EnvelopedSignature>,
}

impl ApprovalToken {
    pub fn new(operation: Operation, payload: impl Into<Vec<u8>>, key_name: impl Into<String>) -> Self {
        Self {
            operation,
            key_name: key_name.into(),
            payload: payload.into(),
            timestamp: None,
            timestamp_signature: None,
        }
    }

    /// A Modify request carrying `access` as the key's new policy
    pub fn modify_access(access: &Access, key_name: impl Into<String>, config: &CodecConfig) -> Self {
        Self::new(Operation::Modify, access.to_modify_payload(config), key_name)
    }

    /// Attach an HSM timestamp and its signature
    pub fn with_timestamp(
        mut self,
        timestamp: impl Into<Vec<u8>>,
        signature: Option<EnvelopedSignature>,
    ) -> Self {
        self.timestamp = Some(timestamp.into());
        self.timestamp_signature = signature;
        self
    }

    /// Length-headered encoding
    pub fn serialize(&self) -> Vec<u8> {
        let mut payload = Payload::new();
        payload.push_u32(FieldTag::EKA_OPERATION, self.operation.code());
        payload.push(FieldTag::LABEL_UTF8STRING, self.key_name.as_bytes());
        if let Some(timestamp) = self.timestamp.as_deref().filter(|t| !t.is_empty()) {
            payload.push(FieldTag::EKA_TIME_STAMP, timestamp);
            if let Some(signature) = &self.timestamp_signature {
                payload.push(FieldTag::DER_SIGNATURE, signature.to_der());
            }
        }
        if !self.payload.is_empty() {
            payload.push(self.operation.payload_tag(), self.payload.as_slice());
        }
        payload.to_framed_bytes()
    }

    /// Decode with or without the length header
    pub fn deserialize(bytes: &[u8]) -> Result<Self, TokenError> {
        let payload = Payload::from_framed_bytes(bytes)?;

        let operation = match payload.find(FieldTag::EKA_OPERATION) {
            Some(field) => Operation::from_code(field.as_u32()?)?,
            None => {
                debug!(fields = payload.len(), "approval token without operation");
                return Err(TokenError::MissingRequiredField { field: "operation" });
            }
        };
        let key_name = match payload.find(FieldTag::LABEL_UTF8STRING) {
            Some(field) => field.as_str()?.to_string(),
            None => String::new(),
        };
        // a modify payload takes precedence
        let body = payload
            .find_data(FieldTag::EKA_MODIFY_PAYLOAD)
            .or_else(|| payload.find_data(FieldTag::EKA_SIGN_PAYLOAD))
            .unwrap_or_default()
            .to_vec();
        let timestamp = payload
            .find_data(FieldTag::EKA_TIME_STAMP)
            .filter(|data| !data.is_empty())
            .map(<[u8]>::to_vec);
        let timestamp_signature = payload
            .find_data(FieldTag::DER_SIGNATURE)
            .map(EnvelopedSignature::from_der)
            .filter(|signature| !signature.is_empty());

        Ok(Self {
            operation,
            key_name,
            payload: body,
            timestamp,
            timestamp_signature,
        })
    }

    /// Decoded HSM timestamp, if one is attached
    pub fn timestamp_info(&self) -> Result<Option<Timestamp>, TokenError> {
        self.timestamp
            .as_deref()
            .map(Timestamp::decode)
            .transpose()
    }

    /// Access policy carried by a Modify request
    pub fn access(&self, config: &CodecConfig) -> Result<Option<Access>, TokenError> {
        if self.operation != Operation::Modify {
            return Ok(None);
        }
        Ok(Some(Access::from_modify_payload(&self.payload, config)?))
    }
}

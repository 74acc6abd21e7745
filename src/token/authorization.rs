use super::{ApprovalToken, TokenError};
use crate::codec::{FieldTag, Payload};
use crate::config::PublicKeyFormat;
use crate::signature::{
    extract_algorithm, unwrap_signature, wrap_signature, EcdsaSigner, EcdsaVerifier,
    SignatureAlgorithm, SignatureError,
};
use tracing::debug;

/// Fully decoded and validated authorization token
///
/// Only produced by [`AuthorizationToken::decode`]; every part is present
/// and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationToken {
    encoded: Vec<u8>,
    der_signature: Vec<u8>,
    raw_signature: Vec<u8>,
    public_key: Vec<u8>,
    public_key_format: PublicKeyFormat,
    approval_token_bytes: Vec<u8>,
    approval_token: ApprovalToken,
}

fn required<'a>(data: Option<&'a [u8]>, field: &'static str) -> Result<&'a [u8], TokenError> {
    match data {
        Some(data) if !data.is_empty() => Ok(data),
        _ => {
            debug!(field, "authorization token rejected");
            Err(TokenError::MissingRequiredField { field })
        }
    }
}

impl AuthorizationToken {
    pub fn decode(bytes: &[u8]) -> Result<Self, TokenError> {
        let payload = Payload::from_framed_bytes(bytes)?;

        let der_signature = required(payload.find_data(FieldTag::DER_SIGNATURE), "der_signature")?;
        let approval_token_bytes =
            required(payload.find_data(FieldTag::APPROVAL_TOKEN), "approval_token")?;

        // whichever key field comes first
        let key_field = payload.fields().iter().find(|field| {
            field.tag() == FieldTag::PUBLIC_KEY_ENCODED
                || field.tag() == FieldTag::CERTIFICATEDATA_BYTES
        });
        let public_key = required(key_field.map(|field| field.data()), "public_key")?;
        let public_key_format = match key_field.map(|field| field.tag()) {
            Some(FieldTag::CERTIFICATEDATA_BYTES) => PublicKeyFormat::Certificate,
            _ => PublicKeyFormat::SubjectPublicKeyInfo,
        };

        let raw_signature = required(unwrap_signature(der_signature), "raw_signature")?;
        let approval_token = ApprovalToken::deserialize(approval_token_bytes)?;

        Ok(Self {
            encoded: bytes.to_vec(),
            der_signature: der_signature.to_vec(),
            raw_signature: raw_signature.to_vec(),
            public_key: public_key.to_vec(),
            public_key_format,
            approval_token_bytes: approval_token_bytes.to_vec(),
            approval_token,
        })
    }

    /// The bytes this token was decoded from
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    pub fn der_signature(&self) -> &[u8] {
        &self.der_signature
    }

    pub fn raw_signature(&self) -> &[u8] {
        &self.raw_signature
    }

    /// SubjectPublicKeyInfo DER or certificate, see [`Self::public_key_format`]
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn public_key_format(&self) -> PublicKeyFormat {
        self.public_key_format
    }

    /// The signed challenge
    pub fn approval_token_bytes(&self) -> &[u8] {
        &self.approval_token_bytes
    }

    pub fn approval_token(&self) -> &ApprovalToken {
        &self.approval_token
    }

    pub fn signature_algorithm(&self) -> Option<SignatureAlgorithm> {
        extract_algorithm(&self.der_signature)
    }

    /// Check the signature over the approval token bytes
    ///
    /// The key is handed to `verifier` as carried in the token.
    pub fn verify<V: EcdsaVerifier + ?Sized>(&self, verifier: &V) -> Result<bool, TokenError> {
        let algorithm = self
            .signature_algorithm()
            .ok_or(SignatureError::UnknownOid)?;
        Ok(algorithm.verify(
            verifier,
            &self.public_key,
            &self.approval_token_bytes,
            &self.raw_signature,
        ))
    }

    pub fn builder() -> AuthorizationTokenBuilder {
        AuthorizationTokenBuilder::default()
    }

    /// Serialize `approval`, sign it, and assemble the token
    pub fn sign<S: EcdsaSigner + ?Sized>(
        approval: &ApprovalToken,
        algorithm: SignatureAlgorithm,
        signer: &S,
        public_key: impl Into<Vec<u8>>,
    ) -> Result<Vec<u8>, TokenError> {
        let challenge = approval.serialize();
        let signature = algorithm.sign(signer, &challenge)?;
        Ok(Self::builder()
            .challenge(challenge)
            .signature(algorithm, signature)
            .public_key(public_key)
            .build())
    }
}

/// Encode path for authorization tokens
///
/// Empty parts are left out of the message.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationTokenBuilder {
    challenge: Vec<u8>,
    signature: Option<(SignatureAlgorithm, Vec<u8>)>,
    public_key: Vec<u8>,
    format: PublicKeyFormat,
}

impl AuthorizationTokenBuilder {
    /// Serialized approval token that was signed
    pub fn challenge(mut self, challenge: impl Into<Vec<u8>>) -> Self {
        self.challenge = challenge.into();
        self
    }

    /// Raw ASN.1 DER ECDSA signature and the algorithm that produced it
    pub fn signature(mut self, algorithm: SignatureAlgorithm, raw: impl Into<Vec<u8>>) -> Self {
        self.signature = Some((algorithm, raw.into()));
        self
    }

    /// Like [`Self::signature`], looking the algorithm up by name
    ///
    /// An unregistered name is rejected only when a signature is supplied.
    pub fn signature_named(self, name: &str, raw: impl Into<Vec<u8>>) -> Result<Self, SignatureError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Ok(self);
        }
        let algorithm: SignatureAlgorithm = name.parse()?;
        Ok(self.signature(algorithm, raw))
    }

    pub fn public_key(mut self, spki_der: impl Into<Vec<u8>>) -> Self {
        self.public_key = spki_der.into();
        self.format = PublicKeyFormat::SubjectPublicKeyInfo;
        self
    }

    pub fn certificate(mut self, certificate: impl Into<Vec<u8>>) -> Self {
        self.public_key = certificate.into();
        self.format = PublicKeyFormat::Certificate;
        self
    }

    /// Length-headered token bytes
    pub fn build(self) -> Vec<u8> {
        let mut payload = Payload::new();
        if !self.challenge.is_empty() {
            payload.push(FieldTag::APPROVAL_TOKEN, self.challenge);
        }
        if let Some((algorithm, raw)) = self.signature.filter(|(_, raw)| !raw.is_empty()) {
            payload.push(FieldTag::DER_SIGNATURE, wrap_signature(algorithm, &raw));
        }
        if !self.public_key.is_empty() {
            payload.push(self.format.tag(), self.public_key);
        }
        payload.to_framed_bytes()
    }
}

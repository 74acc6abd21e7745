pub mod access;
pub mod asn1;
pub mod codec;
pub mod config;
pub mod error;
pub mod prelude;
pub mod signature;
pub mod token;

pub use access::{
    Access, AccessBlob, AccessError, AccessGroup, AccessNamedBlob, AccessToken, BlobName,
    PublicKey,
};
pub use codec::{CodecError, Field, FieldCursor, FieldTag, Payload};
pub use config::{CodecConfig, PublicKeyFormat};
pub use error::Error;
pub use signature::{EnvelopedSignature, SignatureAlgorithm, SignatureError};
pub use token::{
    ApprovalToken, AuthorizationToken, AuthorizationTokenBuilder, Operation, Timestamp, TokenError,
};

pub type Result<T> = std::result::Result<T, Error>;

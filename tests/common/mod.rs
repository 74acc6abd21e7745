//! Common test utilities for primus-auth integration tests
#![allow(dead_code)]

pub use primus_auth::prelude::*;

/// Timestamped SIGN approval for key `gt_ec_08`, captured from an HSM
pub const APPROVAL_TOKEN_HEX: &str = "d00000003b000400010000000210080067745f65635f3038541040003c00000057101200636f6e74656e7420746f206265207369676e00000701080038db15670000000002101400676c6f62616c2d696e746567726974792d6b657956105a003058300c06082a8648ce3d0403020500034800304502206a1682a7afac732ab4ab7f9576ff70880b8414d3ff04448778e1b6ebb877a3d4022100b7b004e29f23454ab13dc73ec0aa70d9b428d656b35465dc6cbaefe38e338a58000057101200636f6e74656e7420746f206265207369676e0000";

/// Authorization token wrapping an untimestamped SIGN approval, P-256 key
pub const AUTHORIZATION_TOKEN_HEX: &str = "f4000000551030002c0000003b000400010000000210080067745f65635f303857101200636f6e74656e7420746f206265207369676e000056105a003058300c06082a8648ce3d04030205000348003045022100d795ee0d3b53f3474f0b96d2963577ee1299c40bcdcbe221de72b3d8c735f4e202204834dd924a200348c93afa5ab2bc59e84faa8ad7bad1c378eac9406418fb9ea3000052105b003059301306072a8648ce3d020106082a8648ce3d03010703420004b72d37ba3ca4b9f3406fcbca53b9a6cc051c2a9763c22859466f5b36ace044ce7d26a4cfabfbe2e9a147c51ab73732bdd0b8e9e7310861863999eb82590151c900";

pub fn decode_hex(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).expect("valid test vector")
}

/// Route library tracing to the test output; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Distinct fake SubjectPublicKeyInfo blobs
pub fn test_key(seed: u8) -> Vec<u8> {
    let mut key = vec![0x30, 0x59, 0x30, 0x13];
    key.extend(std::iter::repeat(seed).take(87));
    key
}

/// Rebuild a length-headered message without the fields carrying `tag`
pub fn without_field(bytes: &[u8], tag: FieldTag) -> Vec<u8> {
    let payload = Payload::from_framed_bytes(bytes).expect("decodable message");
    let kept: Vec<Field> = payload
        .fields()
        .iter()
        .filter(|field| field.tag() != tag)
        .cloned()
        .collect();
    Payload::from(kept).to_framed_bytes()
}

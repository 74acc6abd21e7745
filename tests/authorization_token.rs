mod common;

use common::*;
use primus_auth::{CodecError, TokenError};

#[test]
fn test_reference_authorization_token() {
    init_tracing();
    let bytes = decode_hex(AUTHORIZATION_TOKEN_HEX);
    let token = AuthorizationToken::decode(&bytes).unwrap();

    assert_eq!(token.encoded(), bytes.as_slice());
    assert_eq!(token.der_signature().len(), 90);
    assert_eq!(token.raw_signature().len(), 71);
    assert_eq!(&token.raw_signature()[..2], &[0x30, 0x45]);
    assert_eq!(token.public_key().len(), 91);
    assert_eq!(token.public_key_format(), PublicKeyFormat::SubjectPublicKeyInfo);
    assert_eq!(token.approval_token_bytes().len(), 48);
    assert_eq!(
        token.signature_algorithm(),
        Some(SignatureAlgorithm::Sha256WithEcdsa)
    );

    let approval = token.approval_token();
    assert_eq!(approval.operation, Operation::Sign);
    assert_eq!(approval.key_name, "gt_ec_08");
    assert_eq!(approval.payload, b"content to be sign");
    assert_eq!(approval.timestamp, None);
}

#[test]
fn test_reference_token_rebuilds_from_parts() {
    let bytes = decode_hex(AUTHORIZATION_TOKEN_HEX);
    let token = AuthorizationToken::decode(&bytes).unwrap();

    let rebuilt = AuthorizationToken::builder()
        .challenge(token.approval_token_bytes().to_vec())
        .signature(
            token.signature_algorithm().unwrap(),
            token.raw_signature().to_vec(),
        )
        .public_key(token.public_key().to_vec())
        .build();
    assert_eq!(rebuilt, bytes);
}

#[test]
fn test_each_required_field_is_enforced() {
    let bytes = decode_hex(AUTHORIZATION_TOKEN_HEX);
    for (tag, field) in [
        (FieldTag::DER_SIGNATURE, "der_signature"),
        (FieldTag::APPROVAL_TOKEN, "approval_token"),
        (FieldTag::PUBLIC_KEY_ENCODED, "public_key"),
    ] {
        let stripped = without_field(&bytes, tag);
        assert_eq!(
            AuthorizationToken::decode(&stripped).unwrap_err(),
            TokenError::MissingRequiredField { field },
            "without {tag}"
        );
    }
}

#[test]
fn test_inner_approval_must_parse() {
    let bytes = decode_hex(AUTHORIZATION_TOKEN_HEX);
    let token = AuthorizationToken::decode(&bytes).unwrap();

    let approval = without_field(token.approval_token_bytes(), FieldTag::EKA_OPERATION);
    let forged = AuthorizationToken::builder()
        .challenge(approval)
        .signature(SignatureAlgorithm::Sha256WithEcdsa, token.raw_signature().to_vec())
        .public_key(token.public_key().to_vec())
        .build();
    assert_eq!(
        AuthorizationToken::decode(&forged).unwrap_err(),
        TokenError::MissingRequiredField { field: "operation" }
    );
}

#[test]
fn test_headerless_token_accepted() {
    let bytes = decode_hex(AUTHORIZATION_TOKEN_HEX);
    let token = AuthorizationToken::decode(&bytes[4..]).unwrap();
    assert_eq!(token.approval_token().key_name, "gt_ec_08");
}

#[test]
fn test_garbage_rejected() {
    assert!(matches!(
        AuthorizationToken::decode(&[0x55, 0x10, 0xff, 0x00, 0x01]),
        Err(TokenError::Codec(CodecError::TruncatedInput { .. }))
    ));
    assert_eq!(
        AuthorizationToken::decode(&[]).unwrap_err(),
        TokenError::MissingRequiredField {
            field: "der_signature"
        }
    );
}

#[cfg(feature = "p256")]
#[test]
fn test_sign_then_verify_end_to_end() {
    use p256::ecdsa::SigningKey;
    use rand::rngs::OsRng;

    init_tracing();
    let signer = P256Signer::new(SigningKey::random(&mut OsRng));
    let public_key = signer.public_key_der().unwrap();

    let approval = ApprovalToken::new(Operation::Sign, b"content to be sign".to_vec(), "gt_ec_08");
    for algorithm in [
        SignatureAlgorithm::Sha1WithEcdsa,
        SignatureAlgorithm::Sha256WithEcdsa,
        SignatureAlgorithm::Sha512WithEcdsa,
    ] {
        let bytes =
            AuthorizationToken::sign(&approval, algorithm, &signer, public_key.clone()).unwrap();
        let token = AuthorizationToken::decode(&bytes).unwrap();
        assert_eq!(token.signature_algorithm(), Some(algorithm));
        assert!(token.verify(&P256Verifier).unwrap());
    }
}

//! Tests for HMAC-signed tokens: issue, verify, and every claim policy

use serde::Deserialize;
use serde_json::{json, Value};
use systemix_common::base64url_encode;
use systemix_token::{
    decode_signed, encode_signed, split_compact, verify_signed, verify_signed_as, EncodeOptions,
    SignedAlgorithm, TokenError, TokenErrorKind, VerifyOptions,
};

const SECRET: &str = "secret-key";

fn hs256() -> VerifyOptions {
    VerifyOptions::new([SignedAlgorithm::HS256])
}

#[tokio::test]
async fn test_default_issue_adds_only_iat() {
    let token = encode_signed(&json!({ "userId": "123" }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");

    let payload = verify_signed(&token, SECRET, &hs256())
        .await
        .expect("verify");

    assert_eq!(payload["userId"], "123");
    assert!(payload["iat"].is_i64());
    let mut keys: Vec<&str> = payload.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["iat", "userId"]);

    let decoded = decode_signed(&token).expect("decode");
    assert_eq!(decoded.header.alg.as_deref(), Some("HS256"));
    assert_eq!(decoded.header.typ.as_deref(), Some("ST"));
    assert!(decoded.header.kid.is_none());
}

#[tokio::test]
async fn test_iat_is_current_time_unless_given() {
    let before = chrono::Utc::now().timestamp();
    let token = encode_signed(&json!({}), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");
    let after = chrono::Utc::now().timestamp();

    let iat = decode_signed(&token).expect("decode").payload["iat"]
        .as_i64()
        .expect("numeric iat");
    assert!(before <= iat && iat <= after);

    let token = encode_signed(&json!({}), SECRET, &EncodeOptions::new().issued_at(1_000))
        .await
        .expect("encode");
    assert_eq!(decode_signed(&token).expect("decode").payload["iat"], 1_000);
}

#[tokio::test]
async fn test_every_hmac_algorithm_round_trips() {
    for (alg, signature_len) in [
        (SignedAlgorithm::HS256, 43),
        (SignedAlgorithm::HS384, 64),
        (SignedAlgorithm::HS512, 86),
    ] {
        let token = encode_signed(
            &json!({ "role": "admin" }),
            SECRET,
            &EncodeOptions::new().with_algorithm(alg),
        )
        .await
        .expect("encode");

        let [_, _, signature] = split_compact(&token).expect("three segments");
        assert_eq!(signature.len(), signature_len, "{alg}");

        let payload = verify_signed(&token, SECRET, &VerifyOptions::new([alg]))
            .await
            .expect("verify");
        assert_eq!(payload["role"], "admin");
    }
}

#[tokio::test]
async fn test_wrong_secret_is_invalid_signature() {
    let token = encode_signed(&json!({ "userId": "123" }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");

    let err = verify_signed(&token, "another-secret", &hs256())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::InvalidSignature);
    assert!(err.is_verification_failure());
}

#[tokio::test]
async fn test_tampered_signature_is_rejected() {
    let token = encode_signed(&json!({ "userId": "123" }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");

    let [header, payload, signature] = split_compact(&token).expect("three segments");
    let first = if signature.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{header}.{payload}.{first}{}", &signature[1..]);

    let err = verify_signed(&tampered, SECRET, &hs256())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::InvalidSignature);
}

#[tokio::test]
async fn test_swapped_payload_is_rejected() {
    let token = encode_signed(&json!({ "userId": "123" }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");

    let [header, _, signature] = split_compact(&token).expect("three segments");
    let forged_payload = base64url_encode(r#"{"userId":"admin"}"#);
    let forged = format!("{header}.{forged_payload}.{signature}");

    let err = verify_signed(&forged, SECRET, &hs256()).await.unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::InvalidSignature);
}

#[tokio::test]
async fn test_algorithm_outside_whitelist_is_rejected() {
    let token = encode_signed(&json!({}), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");

    let err = verify_signed(&token, SECRET, &VerifyOptions::new([SignedAlgorithm::HS512]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::InvalidSignature);
    assert!(err.to_string().contains("HS256"));
}

#[tokio::test]
async fn test_empty_whitelist_is_invalid_token() {
    let token = encode_signed(&json!({}), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");

    let err = verify_signed(&token, SECRET, &VerifyOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::InvalidToken);
}

#[tokio::test]
async fn test_missing_alg_is_invalid_token() {
    let header = base64url_encode(r#"{"typ":"ST"}"#);
    let payload = base64url_encode(r#"{"userId":"123"}"#);
    let token = format!("{header}.{payload}.c2ln");

    let err = verify_signed(&token, SECRET, &hs256()).await.unwrap_err();
    assert_eq!(err, TokenError::invalid_token("Token header missing algorithm"));
}

#[tokio::test]
async fn test_expired_token_reports_exp() {
    let token = encode_signed(&json!({}), SECRET, &EncodeOptions::new().expires_in(-10))
        .await
        .expect("encode");
    let exp = decode_signed(&token).expect("decode").payload["exp"]
        .as_i64()
        .expect("numeric exp");

    let err = verify_signed(&token, SECRET, &hs256()).await.unwrap_err();
    assert_eq!(err, TokenError::TokenExpired { expired_at: exp });
    assert_eq!(err.expired_at(), Some(exp));
}

#[tokio::test]
async fn test_clock_tolerance_and_ignore_expiration_accept_expired_token() {
    let token = encode_signed(&json!({}), SECRET, &EncodeOptions::new().expires_in(-10))
        .await
        .expect("encode");

    verify_signed(&token, SECRET, &hs256().with_clock_tolerance(60))
        .await
        .expect("within tolerance");
    verify_signed(&token, SECRET, &hs256().ignore_expiration(true))
        .await
        .expect("expiration ignored");
}

#[tokio::test]
async fn test_future_exp_is_accepted() {
    let token = encode_signed(&json!({}), SECRET, &EncodeOptions::new().expires_in(3600))
        .await
        .expect("encode");

    let payload = verify_signed(&token, SECRET, &hs256())
        .await
        .expect("verify");
    let exp = payload["exp"].as_i64().expect("numeric exp");
    let iat = payload["iat"].as_i64().expect("numeric iat");
    assert_eq!(exp - iat, 3600);
}

#[tokio::test]
async fn test_not_before_in_future_is_rejected() {
    let token = encode_signed(&json!({}), SECRET, &EncodeOptions::new().not_before(60))
        .await
        .expect("encode");
    let nbf = decode_signed(&token).expect("decode").payload["nbf"]
        .as_i64()
        .expect("numeric nbf");

    let err = verify_signed(&token, SECRET, &hs256()).await.unwrap_err();
    assert_eq!(err, TokenError::NotBefore { not_before: nbf });

    verify_signed(&token, SECRET, &hs256().with_clock_tolerance(120))
        .await
        .expect("within tolerance");
    verify_signed(&token, SECRET, &hs256().ignore_not_before(true))
        .await
        .expect("nbf ignored");
}

#[tokio::test]
async fn test_non_numeric_exp_is_invalid_token() {
    let token = encode_signed(&json!({ "exp": "tomorrow" }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");

    let err = verify_signed(&token, SECRET, &hs256()).await.unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::InvalidToken);
}

#[tokio::test]
async fn test_issuer_policy() {
    let options = EncodeOptions::new().with_issuer("auth.example.com");
    let token = encode_signed(&json!({}), SECRET, &options)
        .await
        .expect("encode");

    verify_signed(&token, SECRET, &hs256().with_issuer("auth.example.com"))
        .await
        .expect("matching issuer");
    verify_signed(
        &token,
        SECRET,
        &hs256().with_issuer(vec!["legacy.example.com", "auth.example.com"]),
    )
    .await
    .expect("issuer in list");

    let err = verify_signed(&token, SECRET, &hs256().with_issuer("evil.example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::IssuerMismatch);

    let anonymous = encode_signed(&json!({}), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");
    let err = verify_signed(&anonymous, SECRET, &hs256().with_issuer("auth.example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::IssuerMismatch);
}

#[tokio::test]
async fn test_audience_policy_uses_intersection() {
    let options = EncodeOptions::new().with_audience(vec!["api", "web"]);
    let token = encode_signed(&json!({}), SECRET, &options)
        .await
        .expect("encode");
    assert_eq!(
        decode_signed(&token).expect("decode").payload["aud"],
        json!(["api", "web"])
    );

    verify_signed(&token, SECRET, &hs256().with_audience("web"))
        .await
        .expect("overlapping audience");
    verify_signed(&token, SECRET, &hs256().with_audience(vec!["mobile", "api"]))
        .await
        .expect("overlapping audience list");

    let err = verify_signed(&token, SECRET, &hs256().with_audience("admin"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::AudienceMismatch);

    let single = encode_signed(&json!({}), SECRET, &EncodeOptions::new().with_audience("api"))
        .await
        .expect("encode");
    assert_eq!(decode_signed(&single).expect("decode").payload["aud"], "api");

    let none = encode_signed(&json!({}), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");
    let err = verify_signed(&none, SECRET, &hs256().with_audience("api"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::AudienceMismatch);
}

#[tokio::test]
async fn test_subject_policy() {
    let token = encode_signed(&json!({}), SECRET, &EncodeOptions::new().with_subject("user-1"))
        .await
        .expect("encode");

    verify_signed(&token, SECRET, &hs256().with_subject("user-1"))
        .await
        .expect("matching subject");

    let err = verify_signed(&token, SECRET, &hs256().with_subject("user-2"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::InvalidToken);
}

#[tokio::test]
async fn test_generated_token_ids_are_random_hex() {
    let options = EncodeOptions::new().with_generated_token_id();
    let first = encode_signed(&json!({}), SECRET, &options)
        .await
        .expect("encode");
    let second = encode_signed(&json!({}), SECRET, &options)
        .await
        .expect("encode");

    let jti = |token: &str| -> String {
        decode_signed(token).expect("decode").payload["jti"]
            .as_str()
            .expect("string jti")
            .to_string()
    };
    let (a, b) = (jti(&first), jti(&second));

    for id in [&a, &b] {
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_fixed_token_id() {
    let token = encode_signed(&json!({}), SECRET, &EncodeOptions::new().with_token_id("req-42"))
        .await
        .expect("encode");
    assert_eq!(decode_signed(&token).expect("decode").payload["jti"], "req-42");
}

#[tokio::test]
async fn test_header_fields_from_options() {
    let options = EncodeOptions::new()
        .with_typ("JWT")
        .with_key_id("key-2024")
        .with_content_type("application/json");
    let token = encode_signed(&json!({}), SECRET, &options)
        .await
        .expect("encode");

    let header = decode_signed(&token).expect("decode").header;
    assert_eq!(header.typ.as_deref(), Some("JWT"));
    assert_eq!(header.kid.as_deref(), Some("key-2024"));
    assert_eq!(header.cty.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_caller_payload_is_not_modified() {
    let payload = json!({ "userId": "123", "roles": ["a", "b"] });
    let snapshot = payload.clone();

    let options = EncodeOptions::new()
        .expires_in(60)
        .with_issuer("svc")
        .with_generated_token_id();
    encode_signed(&payload, SECRET, &options)
        .await
        .expect("encode");

    assert_eq!(payload, snapshot);
}

#[tokio::test]
async fn test_non_object_payload_is_serialization_error() {
    let err = encode_signed(&json!(["not", "an", "object"]), SECRET, &EncodeOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::Serialization);
    assert!(!err.is_verification_failure());
}

#[tokio::test]
async fn test_typed_payload_round_trip() {
    #[derive(Debug, serde::Serialize, Deserialize, PartialEq)]
    struct Session {
        #[serde(rename = "userId")]
        user_id: String,
        admin: bool,
        #[serde(default)]
        iat: Option<i64>,
    }

    let session = Session {
        user_id: "123".to_string(),
        admin: true,
        iat: None,
    };
    let token = encode_signed(&session, SECRET, &EncodeOptions::new())
        .await
        .expect("encode");

    let verified: Session = verify_signed_as(&token, SECRET, &hs256())
        .await
        .expect("verify");
    assert_eq!(verified.user_id, "123");
    assert!(verified.admin);
    assert!(verified.iat.is_some());

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct NeedsEmail {
        email: String,
    }
    let err = verify_signed_as::<NeedsEmail>(&token, SECRET, &hs256())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::InvalidToken);
}

#[tokio::test]
async fn test_extra_claims_survive_verification() {
    let claims = json!({
        "userId": "123",
        "nested": { "depth": 2, "tags": ["x"] },
        "ratio": 0.5,
        "nothing": null
    });
    let token = encode_signed(&claims, SECRET, &EncodeOptions::new())
        .await
        .expect("encode");

    let payload = verify_signed(&token, SECRET, &hs256())
        .await
        .expect("verify");
    assert_eq!(payload["nested"], json!({ "depth": 2, "tags": ["x"] }));
    assert_eq!(payload["ratio"], 0.5);
    assert_eq!(payload["nothing"], Value::Null);
}

#[tokio::test]
async fn test_expiration_boundary_with_explicit_exp() {
    let now = chrono::Utc::now().timestamp();

    let live = encode_signed(&json!({ "exp": now + 1 }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");
    verify_signed(&live, SECRET, &hs256())
        .await
        .expect("exp = now + 1 is valid");

    let stale = encode_signed(&json!({ "exp": now - 1 }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");
    let err = verify_signed(&stale, SECRET, &hs256()).await.unwrap_err();
    assert_eq!(err.expired_at(), Some(now - 1));
    verify_signed(&stale, SECRET, &hs256().with_clock_tolerance(5))
        .await
        .expect("tolerance covers one second");

    let beyond = encode_signed(&json!({ "exp": now - 1 - 5 }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");
    let err = verify_signed(&beyond, SECRET, &hs256().with_clock_tolerance(5))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::TokenExpired);
}

#[tokio::test]
async fn test_not_before_boundary_with_explicit_nbf() {
    let now = chrono::Utc::now().timestamp();

    let active = encode_signed(&json!({ "nbf": now - 1 }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");
    verify_signed(&active, SECRET, &hs256())
        .await
        .expect("nbf in the past is valid");

    let pending = encode_signed(&json!({ "nbf": now + 30 }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");
    let err = verify_signed(&pending, SECRET, &hs256()).await.unwrap_err();
    assert_eq!(err.not_before(), Some(now + 30));
    verify_signed(&pending, SECRET, &hs256().with_clock_tolerance(60))
        .await
        .expect("within tolerance");
}

#[tokio::test]
async fn test_every_single_character_flip_is_rejected() {
    let token = encode_signed(&json!({ "userId": "123" }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");
    let signature_start = token.rfind('.').expect("separator") + 1;

    for (index, original) in token.char_indices() {
        if original == '.' {
            continue;
        }
        let replacement = if original == 'A' { 'B' } else { 'A' };
        let mut flipped = token.clone();
        flipped.replace_range(index..index + 1, &replacement.to_string());

        let err = verify_signed(&flipped, SECRET, &hs256())
            .await
            .unwrap_err();
        if index >= signature_start {
            assert_eq!(err.kind(), TokenErrorKind::InvalidSignature, "index {index}");
        } else {
            // header and payload flips may break the JSON before the signature is checked
            assert!(
                matches!(
                    err.kind(),
                    TokenErrorKind::InvalidSignature | TokenErrorKind::InvalidToken
                ),
                "index {index}: {err}"
            );
        }
    }
}

#[tokio::test]
async fn test_out_of_range_offsets_fail_encode() {
    let err = encode_signed(&json!({}), SECRET, &EncodeOptions::new().expires_in(i64::MAX))
        .await
        .unwrap_err();
    assert_eq!(err, TokenError::Serialization("expires_in out of range".to_string()));

    let err = encode_signed(&json!({}), SECRET, &EncodeOptions::new().not_before(i64::MAX))
        .await
        .unwrap_err();
    assert_eq!(err, TokenError::Serialization("not_before out of range".to_string()));
}

#[tokio::test]
async fn test_huge_clock_tolerance_saturates() {
    let now = chrono::Utc::now().timestamp();
    let claims = json!({ "nbf": now + 30, "exp": now - 30 });
    let token = encode_signed(&claims, SECRET, &EncodeOptions::new())
        .await
        .expect("encode");

    verify_signed(&token, SECRET, &hs256().with_clock_tolerance(i64::MAX))
        .await
        .expect("tolerance covers both windows");
}

#[tokio::test]
async fn test_audience_array_with_non_string_members() {
    let token = encode_signed(&json!({ "aud": ["api", 5, null] }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");

    verify_signed(&token, SECRET, &hs256().with_audience("api"))
        .await
        .expect("string member matches");

    let err = verify_signed(&token, SECRET, &hs256().with_audience("5"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::AudienceMismatch);

    let numeric = encode_signed(&json!({ "aud": 5 }), SECRET, &EncodeOptions::new())
        .await
        .expect("encode");
    let err = verify_signed(&numeric, SECRET, &hs256().with_audience("api"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), TokenErrorKind::AudienceMismatch);
}

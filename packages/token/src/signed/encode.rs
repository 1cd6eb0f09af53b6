//! Token issuer
//!
//! Builds the header, overlays the standard claims on a copy of the caller's
//! payload and signs the result with the backend for the chosen algorithm.

use super::options::{EncodeOptions, TokenId, TOKEN_ID_BYTES};
use crate::backend::backend_for;
use crate::codec::{encode_parts, SEPARATOR};
use crate::error::{TokenError, TokenResult};
use crate::future::AsyncTokenResult;
use crate::types::{Header, Payload, DEFAULT_TYP};
use serde::Serialize;
use serde_json::Value;
use systemix_common::{base64url_encode, bytes_to_hex, random_bytes};

/// Encode and sign `payload` into a compact token
///
/// `payload` must serialize to a JSON object; it is copied, never modified.
/// `key` is the shared secret for HMAC algorithms or the PEM private key for
/// RSA algorithms.
///
/// # Errors
/// The returned future resolves to [`TokenError::Serialization`] if the
/// payload is not an object, and to [`TokenError::InvalidKey`] or
/// [`TokenError::Signing`] if the key cannot sign.
pub fn encode_signed<P>(
    payload: &P,
    key: impl AsRef<[u8]>,
    options: &EncodeOptions,
) -> AsyncTokenResult<String>
where
    P: Serialize + ?Sized,
{
    let payload = match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return AsyncTokenResult::ready(Err(TokenError::serialization(
                "Payload must serialize to a JSON object",
            )))
        }
        Err(e) => return AsyncTokenResult::ready(Err(TokenError::serialization(&e.to_string()))),
    };
    let key = key.as_ref().to_vec();
    let options = options.clone();

    AsyncTokenResult::spawn(move || {
        let now = chrono::Utc::now().timestamp();
        sign_payload(payload, &key, &options, now)
    })
}

fn build_header(options: &EncodeOptions) -> Header {
    let mut header =
        Header::new(options.algorithm()).with_typ(options.typ.as_deref().unwrap_or(DEFAULT_TYP));
    if let Some(kid) = &options.kid {
        header = header.with_key_id(kid.clone());
    }
    if let Some(cty) = &options.cty {
        header = header.with_content_type(cty.clone());
    }
    header
}

fn offset_from(now: i64, seconds: i64, option: &str) -> TokenResult<i64> {
    now.checked_add(seconds)
        .ok_or_else(|| TokenError::Serialization(format!("{option} out of range")))
}

fn apply_standard_claims(
    mut claims: Payload,
    options: &EncodeOptions,
    now: i64,
) -> TokenResult<Payload> {
    if let Some(expires_in) = options.expires_in {
        let exp = offset_from(now, expires_in, "expires_in")?;
        claims.insert("exp".to_string(), Value::from(exp));
    }
    if let Some(not_before) = options.not_before {
        let nbf = offset_from(now, not_before, "not_before")?;
        claims.insert("nbf".to_string(), Value::from(nbf));
    }
    claims.insert("iat".to_string(), Value::from(options.issued_at.unwrap_or(now)));

    if let Some(issuer) = &options.issuer {
        claims.insert("iss".to_string(), Value::from(issuer.as_str()));
    }
    if let Some(subject) = &options.subject {
        claims.insert("sub".to_string(), Value::from(subject.as_str()));
    }
    if let Some(audience) = &options.audience {
        claims.insert("aud".to_string(), Value::from(audience.clone()));
    }

    match &options.token_id {
        Some(TokenId::Generate) => {
            let jti = bytes_to_hex(&random_bytes(TOKEN_ID_BYTES));
            claims.insert("jti".to_string(), Value::String(jti));
        }
        Some(TokenId::Fixed(jti)) => {
            claims.insert("jti".to_string(), Value::from(jti.as_str()));
        }
        None => {}
    }

    Ok(claims)
}

fn sign_payload(
    payload: Payload,
    key: &[u8],
    options: &EncodeOptions,
    now: i64,
) -> TokenResult<String> {
    let algorithm = options.algorithm();
    tracing::trace!(%algorithm, "signing token");
    let header = build_header(options);
    let claims = apply_standard_claims(payload, options, now)?;

    let signing_input = encode_parts(&header, &claims)?;
    let signature = backend_for(algorithm).sign(&signing_input, key, algorithm)?;

    tracing::debug!(
        %algorithm,
        kid = header.kid.as_deref().unwrap_or(""),
        has_exp = claims.contains_key("exp"),
        has_jti = claims.contains_key("jti"),
        "issued signed token"
    );

    Ok(format!("{signing_input}{SEPARATOR}{}", base64url_encode(signature)))
}

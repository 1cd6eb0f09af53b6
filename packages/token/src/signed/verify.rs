//! Token verifier
//!
//! Checks run in a fixed order and stop at the first failure: structure,
//! algorithm whitelist, signature, `exp`, `nbf`, issuer, audience, subject.

use super::options::VerifyOptions;
use crate::algorithm::SignedAlgorithm;
use crate::backend::backend_for;
use crate::codec::{decode_signed, signing_input};
use crate::error::{TokenError, TokenResult};
use crate::future::AsyncTokenResult;
use crate::types::{OneOrMany, Payload};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode `token`, check its signature and enforce the claim policies
///
/// `key` is the shared secret for HMAC algorithms or the PEM public key for
/// RSA algorithms. On success the payload is returned unchanged, standard
/// claims included.
///
/// # Errors
/// The returned future resolves to:
/// - [`TokenError::InvalidToken`] for malformed tokens, a missing `alg`, an
///   empty `options.algorithms`, non-numeric `exp`/`nbf`/`iat`, or a subject
///   mismatch
/// - [`TokenError::InvalidSignature`] when `alg` is not whitelisted or the
///   signature does not verify
/// - [`TokenError::TokenExpired`] / [`TokenError::NotBefore`] outside the
///   validity window
/// - [`TokenError::IssuerMismatch`] / [`TokenError::AudienceMismatch`] when an
///   expected claim is absent or different
pub fn verify_signed(
    token: &str,
    key: impl AsRef<[u8]>,
    options: &VerifyOptions,
) -> AsyncTokenResult<Payload> {
    let token = token.to_string();
    let key = key.as_ref().to_vec();
    let options = options.clone();

    AsyncTokenResult::spawn(move || {
        let now = chrono::Utc::now().timestamp();
        verify_token(&token, &key, &options, now).map_err(rejected)
    })
}

/// [`verify_signed`], then deserialize the payload into `T`
///
/// # Errors
/// As [`verify_signed`], plus [`TokenError::InvalidToken`] when the verified
/// payload does not match `T`.
pub fn verify_signed_as<T>(
    token: &str,
    key: impl AsRef<[u8]>,
    options: &VerifyOptions,
) -> AsyncTokenResult<T>
where
    T: DeserializeOwned + Send + 'static,
{
    let token = token.to_string();
    let key = key.as_ref().to_vec();
    let options = options.clone();

    AsyncTokenResult::spawn(move || {
        let now = chrono::Utc::now().timestamp();
        let payload = verify_token(&token, &key, &options, now).map_err(rejected)?;
        serde_json::from_value(Value::Object(payload))
            .map_err(|e| TokenError::InvalidToken(format!("Payload does not match type: {e}")))
    })
}

fn rejected(error: TokenError) -> TokenError {
    tracing::debug!(kind = ?error.kind(), "signed token rejected");
    error
}

fn verify_token(
    token: &str,
    key: &[u8],
    options: &VerifyOptions,
    now: i64,
) -> TokenResult<Payload> {
    tracing::trace!("verifying signed token");
    let decoded = decode_signed(token)?;

    let alg = decoded
        .header
        .alg
        .as_deref()
        .ok_or_else(|| TokenError::invalid_token("Token header missing algorithm"))?;

    if options.algorithms.is_empty() {
        return Err(TokenError::invalid_token(
            "algorithms option is required - pass expected algorithm(s) to prevent algorithm confusion",
        ));
    }
    let algorithm = allowed_algorithm(alg, &options.algorithms)?;

    let signing_input = signing_input(token)?;
    let backend = backend_for(algorithm);
    if !backend.verify_encoded(signing_input, &decoded.signature, key, algorithm) {
        return Err(TokenError::invalid_signature());
    }

    let payload = decoded.payload;
    let tolerance = options.clock_tolerance;

    if !options.ignore_expiration {
        if let Some(exp) = timing_claim(&payload, "exp")? {
            if exp < now.saturating_sub(tolerance) as f64 {
                return Err(TokenError::TokenExpired {
                    expired_at: exp.floor() as i64,
                });
            }
        }
    }

    if !options.ignore_not_before {
        if let Some(nbf) = timing_claim(&payload, "nbf")? {
            if nbf > now.saturating_add(tolerance) as f64 {
                return Err(TokenError::NotBefore {
                    not_before: nbf.floor() as i64,
                });
            }
        }
    }

    // iat is never compared against the clock, only type-checked
    timing_claim(&payload, "iat")?;

    if let Some(expected) = &options.issuer {
        check_issuer(&payload, expected)?;
    }
    if let Some(expected) = &options.audience {
        check_audience(&payload, expected)?;
    }
    if let Some(expected) = &options.subject {
        let actual = payload.get("sub").and_then(Value::as_str);
        if actual != Some(expected.as_str()) {
            return Err(TokenError::InvalidToken(format!(
                "Expected subject \"{expected}\", got \"{}\"",
                actual.unwrap_or("undefined")
            )));
        }
    }

    Ok(payload)
}

fn allowed_algorithm(alg: &str, allowed: &[SignedAlgorithm]) -> TokenResult<SignedAlgorithm> {
    allowed
        .iter()
        .copied()
        .find(|candidate| candidate.as_str() == alg)
        .ok_or_else(|| {
            let list: Vec<&str> = allowed.iter().map(|a| a.as_str()).collect();
            TokenError::InvalidSignature(format!(
                "Algorithm {alg} not in allowed list: {}",
                list.join(", ")
            ))
        })
}

/// `Ok(None)` when the claim is absent or null
fn timing_claim(payload: &Payload, name: &str) -> TokenResult<Option<f64>> {
    match payload.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| TokenError::InvalidToken(format!("{name} claim must be a number"))),
        Some(_) => Err(TokenError::InvalidToken(format!(
            "{name} claim must be a number"
        ))),
    }
}

fn check_issuer(payload: &Payload, expected: &OneOrMany) -> TokenResult<()> {
    let issuer = match payload.get("iss") {
        None | Some(Value::Null) => {
            return Err(TokenError::IssuerMismatch(
                "Token has no issuer claim".to_string(),
            ))
        }
        Some(Value::String(issuer)) => issuer,
        Some(other) => {
            return Err(TokenError::IssuerMismatch(format!(
                "Expected issuer in {expected}, got {other}"
            )))
        }
    };
    if !expected.contains(issuer) {
        return Err(TokenError::IssuerMismatch(format!(
            "Expected issuer in {expected}, got {issuer}"
        )));
    }
    Ok(())
}

fn check_audience(payload: &Payload, expected: &OneOrMany) -> TokenResult<()> {
    let audience = match payload.get("aud") {
        None | Some(Value::Null) => {
            return Err(TokenError::AudienceMismatch(
                "Token has no audience claim".to_string(),
            ))
        }
        Some(value) => value,
    };
    // non-string members of an aud array never match
    let actual = match audience {
        Value::String(aud) => OneOrMany::One(aud.clone()),
        Value::Array(values) => OneOrMany::Many(
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        ),
        _ => OneOrMany::Many(Vec::new()),
    };
    if !expected.intersects(&actual) {
        return Err(TokenError::AudienceMismatch(format!(
            "Expected audience in {expected}, got {audience}"
        )));
    }
    Ok(())
}

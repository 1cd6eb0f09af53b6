//! Compact token codec
//!
//! Serializes a header and payload into the dotted signing input and splits a
//! compact token back into its parts. Nothing here checks a signature.

use crate::error::{TokenError, TokenResult};
use crate::types::{DecodedToken, Header, Payload};
use serde_json::Value;
use systemix_common::{base64url_decode_to_string, base64url_encode};

/// Segment separator of the compact form
pub const SEPARATOR: char = '.';

/// Build the signing input `base64url(header) "." base64url(payload)`
///
/// # Errors
/// Returns [`TokenError::Serialization`] if either part fails to serialize.
pub fn encode_parts(header: &Header, payload: &Payload) -> TokenResult<String> {
    let header_json =
        serde_json::to_string(header).map_err(|e| TokenError::serialization(&e.to_string()))?;
    let payload_json =
        serde_json::to_string(payload).map_err(|e| TokenError::serialization(&e.to_string()))?;

    Ok(format!(
        "{}{SEPARATOR}{}",
        base64url_encode(header_json),
        base64url_encode(payload_json)
    ))
}

/// Split a compact token into its three segments
///
/// Surrounding whitespace is ignored. Every segment must be non-empty.
///
/// # Errors
/// Returns [`TokenError::InvalidToken`] for an empty input or any shape
/// other than exactly three non-empty segments.
pub fn split_compact(token: &str) -> TokenResult<[&str; 3]> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::invalid_token("Token must be a non-empty string"));
    }

    let mut parts = token.split(SEPARATOR);
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok([header, payload, signature])
        }
        _ => Err(TokenError::invalid_token(
            "Token must have exactly 3 parts (header.payload.signature)",
        )),
    }
}

/// The exact bytes covered by the signature: the first two segments as sent
///
/// # Errors
/// Same as [`split_compact`].
pub fn signing_input(token: &str) -> TokenResult<&str> {
    let [header, payload, _] = split_compact(token)?;
    let token = token.trim();
    // header and payload are adjacent, so the prefix covers both plus the dot
    Ok(&token[..header.len() + 1 + payload.len()])
}

/// Decode a compact token without verifying it
///
/// Use this to inspect claims (for instance a `kid` or `iss`) before deciding
/// whether and how to verify. For verified decoding use
/// [`crate::verify_signed`].
///
/// # Errors
/// Returns [`TokenError::InvalidToken`] if the token is malformed, a segment
/// is not base64url, a segment is not JSON, or the header or payload is not a
/// JSON object.
pub fn decode_signed(token: &str) -> TokenResult<DecodedToken> {
    tracing::trace!("decoding compact token");
    let [header_b64, payload_b64, signature_b64] = split_compact(token)?;

    let header_value: Value = base64url_decode_to_string(header_b64)
        .ok()
        .and_then(|json| serde_json::from_str(&json).ok())
        .ok_or_else(|| TokenError::invalid_token("Invalid header encoding"))?;

    let payload_value: Value = base64url_decode_to_string(payload_b64)
        .ok()
        .and_then(|json| serde_json::from_str(&json).ok())
        .ok_or_else(|| TokenError::invalid_token("Invalid payload encoding"))?;

    if !header_value.is_object() {
        return Err(TokenError::invalid_token("Header must be an object"));
    }
    let header: Header = serde_json::from_value(header_value)
        .map_err(|e| TokenError::InvalidToken(format!("Invalid header fields: {e}")))?;

    let payload = match payload_value {
        Value::Object(map) => map,
        _ => return Err(TokenError::invalid_token("Payload must be an object")),
    };

    Ok(DecodedToken {
        header,
        payload,
        signature: signature_b64.to_string(),
    })
}

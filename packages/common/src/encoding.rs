//! Byte encoding utilities
//!
//! Base64url here is always the unpadded URL-safe alphabet of RFC 4648 §5
//! (`+` becomes `-`, `/` becomes `_`, no trailing `=`), which is the form
//! used by every segment of a compact signed token.

use crate::error::Result;
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};

/// Characters used by [`bytes_to_alphanumeric`], indexed by `byte % 62`
pub const ALPHANUMERIC_CHARSET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Encode bytes or UTF-8 text as unpadded base64url
#[inline]
pub fn base64url_encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input.as_ref())
}

/// Decode unpadded base64url into raw bytes
///
/// # Errors
/// Returns [`crate::EncodingError::InvalidBase64`] if the input contains
/// characters outside the URL-safe alphabet, carries padding, or has an
/// impossible length.
#[inline]
pub fn base64url_decode(input: &str) -> Result<Vec<u8>> {
    Ok(URL_SAFE_NO_PAD.decode(input)?)
}

/// Decode unpadded base64url into a UTF-8 string
///
/// # Errors
/// Returns [`crate::EncodingError::InvalidBase64`] for malformed input and
/// [`crate::EncodingError::InvalidUtf8`] when the decoded bytes are not UTF-8.
pub fn base64url_decode_to_string(input: &str) -> Result<String> {
    let bytes = base64url_decode(input)?;
    Ok(String::from_utf8(bytes)?)
}

/// Lowercase hex, two characters per byte
#[inline]
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Standard base64 with padding
#[inline]
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Alias of [`base64url_encode`] kept next to the other byte encoders
#[inline]
pub fn bytes_to_base64url(bytes: &[u8]) -> String {
    base64url_encode(bytes)
}

/// One character per byte, taken from [`ALPHANUMERIC_CHARSET`]
///
/// The mapping is `byte % 62`, so the output is not uniformly distributed;
/// callers wanting uniform output should prefer hex or base64url.
pub fn bytes_to_alphanumeric(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| char::from(ALPHANUMERIC_CHARSET[usize::from(*b) % ALPHANUMERIC_CHARSET.len()]))
        .collect()
}

//! Common infrastructure and utilities for the systemix packages
//!
//! This crate provides shared functionality used across all systemix crates including:
//! - Unpadded base64url encoding and decoding (RFC 4648 §5)
//! - Byte-to-string encoders (hex, base64, base64url, alphanumeric)
//! - Constant-time comparison for signatures and secrets
//! - A cryptographically secure random byte source

pub mod compare;
pub mod encoding;
pub mod error;
pub mod random;

pub use compare::{bytes_equal, secure_compare};
pub use encoding::{
    base64url_decode, base64url_decode_to_string, base64url_encode, bytes_to_alphanumeric,
    bytes_to_base64, bytes_to_base64url, bytes_to_hex, ALPHANUMERIC_CHARSET,
};
pub use error::{EncodingError, Result};
pub use random::random_bytes;

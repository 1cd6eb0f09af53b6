//! Random token generation
//!
//! Opaque random tokens (session ids, API keys, CSRF tokens) rendered in one
//! of four character sets. Unlike signed tokens these carry no claims.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use systemix_common::{
    bytes_to_alphanumeric, bytes_to_base64, bytes_to_base64url, bytes_to_hex, random_bytes,
};
use thiserror::Error;

/// Largest accepted `byte_length`
pub const MAX_BYTE_LENGTH: usize = 1024;

/// Largest accepted `count`
pub const MAX_COUNT: usize = 10;

/// Invalid generator options
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// `byte_length` is zero
    #[error("Invalid byteLength. Must be a positive number.")]
    InvalidByteLength,
    /// `byte_length` exceeds [`MAX_BYTE_LENGTH`]
    #[error("Invalid byteLength. Must be less than or equal to 1024.")]
    ByteLengthTooLarge,
    /// `count` is zero
    #[error("Invalid count. Count must be a positive number.")]
    InvalidCount,
    /// `count` exceeds [`MAX_COUNT`]
    #[error("Invalid count. Count must be less than or equal to 10.")]
    CountTooLarge,
    /// Unknown charset name
    #[error("Invalid charset {0:?}. Must be one of: hex, base64, base64url, alphanumeric.")]
    InvalidCharset(String),
}

/// Output alphabet of a generated token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    /// Lowercase hex, two characters per byte
    #[default]
    Hex,
    /// Standard padded base64
    Base64,
    /// Unpadded URL-safe base64
    Base64Url,
    /// `A-Za-z0-9`, one character per byte
    Alphanumeric,
}

impl Charset {
    /// Every supported charset
    pub const ALL: [Charset; 4] = [
        Charset::Hex,
        Charset::Base64,
        Charset::Base64Url,
        Charset::Alphanumeric,
    ];

    /// Canonical name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Charset::Hex => "hex",
            Charset::Base64 => "base64",
            Charset::Base64Url => "base64url",
            Charset::Alphanumeric => "alphanumeric",
        }
    }

    /// Render random bytes in this charset
    #[must_use]
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Charset::Hex => bytes_to_hex(bytes),
            Charset::Base64 => bytes_to_base64(bytes),
            Charset::Base64Url => bytes_to_base64url(bytes),
            Charset::Alphanumeric => bytes_to_alphanumeric(bytes),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Charset {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Charset::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| GenerateError::InvalidCharset(s.to_string()))
    }
}

/// Options for [`generate_token`] and [`generate_tokens`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateTokenOptions {
    /// Random bytes per token, 1 to [`MAX_BYTE_LENGTH`]
    pub byte_length: usize,
    /// Output alphabet
    pub charset: Charset,
    /// Tokens per call to [`generate_tokens`], 1 to [`MAX_COUNT`]
    pub count: usize,
}

impl Default for GenerateTokenOptions {
    fn default() -> Self {
        Self {
            byte_length: 32,
            charset: Charset::Hex,
            count: 1,
        }
    }
}

impl GenerateTokenOptions {
    /// Set the number of random bytes
    #[must_use]
    pub fn with_byte_length(mut self, byte_length: usize) -> Self {
        self.byte_length = byte_length;
        self
    }

    /// Set the output alphabet
    #[must_use]
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Set the number of tokens
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Check the options against the accepted ranges
    ///
    /// # Errors
    /// Returns the [`GenerateError`] for the first out-of-range field.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.byte_length == 0 {
            return Err(GenerateError::InvalidByteLength);
        }
        if self.byte_length > MAX_BYTE_LENGTH {
            return Err(GenerateError::ByteLengthTooLarge);
        }
        if self.count == 0 {
            return Err(GenerateError::InvalidCount);
        }
        if self.count > MAX_COUNT {
            return Err(GenerateError::CountTooLarge);
        }
        Ok(())
    }
}

/// Generate one random token; `count` is validated but otherwise ignored
///
/// # Errors
/// Returns a [`GenerateError`] for out-of-range options.
pub fn generate_token(options: &GenerateTokenOptions) -> Result<String, GenerateError> {
    options.validate()?;
    Ok(options.charset.encode(&random_bytes(options.byte_length)))
}

/// Generate `options.count` independent random tokens
///
/// # Errors
/// Returns a [`GenerateError`] for out-of-range options.
pub fn generate_tokens(options: &GenerateTokenOptions) -> Result<Vec<String>, GenerateError> {
    options.validate()?;
    Ok((0..options.count)
        .map(|_| options.charset.encode(&random_bytes(options.byte_length)))
        .collect())
}

//! Core error types and definitions

use thiserror::Error;

/// Errors raised while decoding encoded text back into bytes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Input is not valid unpadded base64url
    #[error("invalid base64url input: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Decoded bytes are not valid UTF-8
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

impl From<std::string::FromUtf8Error> for EncodingError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        EncodingError::InvalidUtf8
    }
}

/// Result type alias using our `EncodingError`
pub type Result<T> = std::result::Result<T, EncodingError>;

//! Signed token error types
//!
//! Every failure raised by this crate is a [`TokenError`]. Verification
//! failures carry a fine-grained kind so callers can implement policy
//! (quietly drop expired tokens, log tampering attempts); encode-side failures
//! use the generic kinds since the issuer never processes untrusted input.

use thiserror::Error;

/// Token operation result type
pub type TokenResult<T> = Result<T, TokenError>;

/// Signed token error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Malformed compact string, bad base64url or JSON, missing `alg`,
    /// non-numeric timing claim, subject mismatch, or unusable options
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Signature does not verify, or the algorithm is not whitelisted
    #[error("Invalid token signature: {0}")]
    InvalidSignature(String),

    /// `exp` lies in the past beyond the clock tolerance
    #[error("Token expired at {expired_at}")]
    TokenExpired {
        /// The token's `exp` claim, seconds since the epoch
        expired_at: i64,
    },

    /// `nbf` lies in the future beyond the clock tolerance
    #[error("Token not valid before {not_before}")]
    NotBefore {
        /// The token's `nbf` claim, seconds since the epoch
        not_before: i64,
    },

    /// `aud` is absent or shares no value with the expected audience
    #[error("Audience mismatch: {0}")]
    AudienceMismatch(String),

    /// `iss` is absent or not one of the expected issuers
    #[error("Issuer mismatch: {0}")]
    IssuerMismatch(String),

    /// Key material could not be used for signing
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The signing primitive failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// Header or payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal failure, such as a dropped background task
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Fieldless tag of a [`TokenError`], convenient for matching and metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenErrorKind {
    /// See [`TokenError::InvalidToken`]
    InvalidToken,
    /// See [`TokenError::InvalidSignature`]
    InvalidSignature,
    /// See [`TokenError::TokenExpired`]
    TokenExpired,
    /// See [`TokenError::NotBefore`]
    NotBefore,
    /// See [`TokenError::AudienceMismatch`]
    AudienceMismatch,
    /// See [`TokenError::IssuerMismatch`]
    IssuerMismatch,
    /// See [`TokenError::InvalidKey`]
    InvalidKey,
    /// See [`TokenError::Signing`]
    Signing,
    /// See [`TokenError::Serialization`]
    Serialization,
    /// See [`TokenError::Internal`]
    Internal,
}

impl TokenError {
    /// Create an invalid token error
    #[inline]
    #[must_use]
    pub fn invalid_token(msg: &str) -> Self {
        TokenError::InvalidToken(msg.to_string())
    }

    /// Create an invalid signature error with the default message
    #[inline]
    #[must_use]
    pub fn invalid_signature() -> Self {
        TokenError::InvalidSignature("signature verification failed".to_string())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: &str) -> Self {
        TokenError::InvalidKey(msg.to_string())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: &str) -> Self {
        TokenError::Serialization(msg.to_string())
    }

    /// Create an internal error
    #[inline]
    #[must_use]
    pub fn internal(msg: &str) -> Self {
        TokenError::Internal(msg.to_string())
    }

    /// The fieldless kind of this error
    #[must_use]
    pub fn kind(&self) -> TokenErrorKind {
        match self {
            TokenError::InvalidToken(_) => TokenErrorKind::InvalidToken,
            TokenError::InvalidSignature(_) => TokenErrorKind::InvalidSignature,
            TokenError::TokenExpired { .. } => TokenErrorKind::TokenExpired,
            TokenError::NotBefore { .. } => TokenErrorKind::NotBefore,
            TokenError::AudienceMismatch(_) => TokenErrorKind::AudienceMismatch,
            TokenError::IssuerMismatch(_) => TokenErrorKind::IssuerMismatch,
            TokenError::InvalidKey(_) => TokenErrorKind::InvalidKey,
            TokenError::Signing(_) => TokenErrorKind::Signing,
            TokenError::Serialization(_) => TokenErrorKind::Serialization,
            TokenError::Internal(_) => TokenErrorKind::Internal,
        }
    }

    /// True for the kinds produced while checking an untrusted token
    #[must_use]
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self.kind(),
            TokenErrorKind::InvalidToken
                | TokenErrorKind::InvalidSignature
                | TokenErrorKind::TokenExpired
                | TokenErrorKind::NotBefore
                | TokenErrorKind::AudienceMismatch
                | TokenErrorKind::IssuerMismatch
        )
    }

    /// The `exp` timestamp of an expired token
    #[must_use]
    pub fn expired_at(&self) -> Option<i64> {
        match self {
            TokenError::TokenExpired { expired_at } => Some(*expired_at),
            _ => None,
        }
    }

    /// The `nbf` timestamp of a token that is not yet active
    #[must_use]
    pub fn not_before(&self) -> Option<i64> {
        match self {
            TokenError::NotBefore { not_before } => Some(*not_before),
            _ => None,
        }
    }
}

impl From<systemix_common::EncodingError> for TokenError {
    fn from(e: systemix_common::EncodingError) -> Self {
        TokenError::InvalidToken(e.to_string())
    }
}

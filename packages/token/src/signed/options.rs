//! Issuer and verifier options
//!
//! Both option sets are plain data with `Default`, fluent setters, and serde
//! support so they can be loaded from configuration. Time values are whole
//! seconds.

use crate::algorithm::SignedAlgorithm;
use crate::types::OneOrMany;
use serde::{Deserialize, Serialize};

/// Number of random bytes behind a generated `jti`
pub const TOKEN_ID_BYTES: usize = 16;

/// How the issuer fills the `jti` claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenId {
    /// Random 16 bytes rendered as 32 lowercase hex characters
    Generate,
    /// Use this value verbatim
    Fixed(String),
}

/// Options for [`crate::encode_signed`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Signing algorithm, `HS256` when unset
    pub algorithm: Option<SignedAlgorithm>,
    /// Header `typ`, `"ST"` when unset
    pub typ: Option<String>,
    /// Header `kid`
    pub kid: Option<String>,
    /// Header `cty`
    pub cty: Option<String>,
    /// `exp = now + expires_in`
    pub expires_in: Option<i64>,
    /// `nbf = now + not_before`
    pub not_before: Option<i64>,
    /// Explicit `iat`; defaults to now
    pub issued_at: Option<i64>,
    /// `iss` claim
    pub issuer: Option<String>,
    /// `sub` claim
    pub subject: Option<String>,
    /// `aud` claim
    pub audience: Option<OneOrMany>,
    /// `jti` claim
    pub token_id: Option<TokenId>,
}

impl EncodeOptions {
    /// Options with every field unset
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signing algorithm
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: SignedAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Set the header `typ`
    #[must_use]
    pub fn with_typ(mut self, typ: impl Into<String>) -> Self {
        self.typ = Some(typ.into());
        self
    }

    /// Set the header `kid`
    #[must_use]
    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Set the header `cty`
    #[must_use]
    pub fn with_content_type(mut self, cty: impl Into<String>) -> Self {
        self.cty = Some(cty.into());
        self
    }

    /// Expire `seconds` after issue; negative values produce an already
    /// expired token
    #[must_use]
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.expires_in = Some(seconds);
        self
    }

    /// Activate `seconds` after issue
    #[must_use]
    pub fn not_before(mut self, seconds: i64) -> Self {
        self.not_before = Some(seconds);
        self
    }

    /// Use an explicit `iat` instead of now
    #[must_use]
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.issued_at = Some(timestamp);
        self
    }

    /// Set the `iss` claim
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the `sub` claim
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the `aud` claim
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<OneOrMany>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Generate a random `jti`
    #[must_use]
    pub fn with_generated_token_id(mut self) -> Self {
        self.token_id = Some(TokenId::Generate);
        self
    }

    /// Use a fixed `jti`
    #[must_use]
    pub fn with_token_id(mut self, jti: impl Into<String>) -> Self {
        self.token_id = Some(TokenId::Fixed(jti.into()));
        self
    }

    /// Algorithm with default fallback
    #[inline]
    #[must_use]
    pub fn algorithm(&self) -> SignedAlgorithm {
        self.algorithm.unwrap_or(SignedAlgorithm::HS256)
    }
}

/// Options for [`crate::verify_signed`]
///
/// `algorithms` has no default: an empty whitelist makes verification fail,
/// so a token signed under one algorithm family is never accepted under
/// another by accident.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyOptions {
    /// Accepted algorithms
    pub algorithms: Vec<SignedAlgorithm>,
    /// Accepted issuers
    pub issuer: Option<OneOrMany>,
    /// Accepted audiences; any overlap with `aud` passes
    pub audience: Option<OneOrMany>,
    /// Required subject
    pub subject: Option<String>,
    /// Allowed clock skew for `exp` and `nbf`, in seconds
    pub clock_tolerance: i64,
    /// Skip the `exp` check
    pub ignore_expiration: bool,
    /// Skip the `nbf` check
    pub ignore_not_before: bool,
}

impl VerifyOptions {
    /// Accept exactly the given algorithms
    #[must_use]
    pub fn new(algorithms: impl IntoIterator<Item = SignedAlgorithm>) -> Self {
        Self {
            algorithms: algorithms.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Require one of the given issuers
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<OneOrMany>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Require an overlapping audience
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<OneOrMany>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Require this subject
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the clock tolerance in seconds
    #[must_use]
    pub fn with_clock_tolerance(mut self, seconds: i64) -> Self {
        self.clock_tolerance = seconds;
        self
    }

    /// Skip or enforce the `exp` check
    #[must_use]
    pub fn ignore_expiration(mut self, ignore: bool) -> Self {
        self.ignore_expiration = ignore;
        self
    }

    /// Skip or enforce the `nbf` check
    #[must_use]
    pub fn ignore_not_before(mut self, ignore: bool) -> Self {
        self.ignore_not_before = ignore;
        self
    }
}

//! Signing algorithm registry
//!
//! A static table over the six supported algorithms. Parsing an unknown
//! algorithm name fails at the call site (issuer options, verifier
//! whitelist, token header); the registry itself is total.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported signing algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignedAlgorithm {
    /// HMAC with SHA-256
    HS256,
    /// HMAC with SHA-384
    HS384,
    /// HMAC with SHA-512
    HS512,
    /// RSASSA-PKCS1-v1_5 with SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 with SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 with SHA-512
    RS512,
}

/// Digest underlying a signing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

/// Key interpretation of an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// Symmetric, shared secret
    Hmac,
    /// Asymmetric, PEM private key to sign and PEM public key to verify
    Rsa,
}

impl SignedAlgorithm {
    /// All supported algorithms
    pub const ALL: [SignedAlgorithm; 6] = [
        SignedAlgorithm::HS256,
        SignedAlgorithm::HS384,
        SignedAlgorithm::HS512,
        SignedAlgorithm::RS256,
        SignedAlgorithm::RS384,
        SignedAlgorithm::RS512,
    ];

    /// The symmetric algorithms
    pub const HMAC: [SignedAlgorithm; 3] = [
        SignedAlgorithm::HS256,
        SignedAlgorithm::HS384,
        SignedAlgorithm::HS512,
    ];

    /// The asymmetric algorithms
    pub const RSA: [SignedAlgorithm; 3] = [
        SignedAlgorithm::RS256,
        SignedAlgorithm::RS384,
        SignedAlgorithm::RS512,
    ];

    /// Header `alg` value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SignedAlgorithm::HS256 => "HS256",
            SignedAlgorithm::HS384 => "HS384",
            SignedAlgorithm::HS512 => "HS512",
            SignedAlgorithm::RS256 => "RS256",
            SignedAlgorithm::RS384 => "RS384",
            SignedAlgorithm::RS512 => "RS512",
        }
    }

    /// Digest used by the signing primitive
    #[must_use]
    pub const fn hash(self) -> HashAlgorithm {
        match self {
            SignedAlgorithm::HS256 | SignedAlgorithm::RS256 => HashAlgorithm::Sha256,
            SignedAlgorithm::HS384 | SignedAlgorithm::RS384 => HashAlgorithm::Sha384,
            SignedAlgorithm::HS512 | SignedAlgorithm::RS512 => HashAlgorithm::Sha512,
        }
    }

    /// Symmetric or asymmetric
    #[must_use]
    pub const fn family(self) -> AlgorithmFamily {
        match self {
            SignedAlgorithm::HS256 | SignedAlgorithm::HS384 | SignedAlgorithm::HS512 => {
                AlgorithmFamily::Hmac
            }
            SignedAlgorithm::RS256 | SignedAlgorithm::RS384 | SignedAlgorithm::RS512 => {
                AlgorithmFamily::Rsa
            }
        }
    }

    /// True for HS256, HS384 and HS512
    #[must_use]
    pub const fn is_hmac(self) -> bool {
        matches!(self.family(), AlgorithmFamily::Hmac)
    }

    /// True for RS256, RS384 and RS512
    #[must_use]
    pub const fn is_rsa(self) -> bool {
        matches!(self.family(), AlgorithmFamily::Rsa)
    }
}

impl HashAlgorithm {
    /// Conventional digest name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }

    /// Digest length in bytes, which is also the HMAC tag length
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

impl fmt::Display for SignedAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an algorithm name outside the registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for SignedAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignedAlgorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

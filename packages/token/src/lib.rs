//! Signed compact tokens and random token generation
//!
//! This crate provides:
//! - HS256/HS384/HS512 and RS256/RS384/RS512 signing
//! - An issuer that stamps standard claims (`exp`, `nbf`, `iat`, `iss`, `sub`,
//!   `aud`, `jti`) onto a caller payload
//! - A verifier with a mandatory algorithm whitelist, clock tolerance, and
//!   issuer, audience and subject policies
//! - Opaque random tokens in hex, base64, base64url or alphanumeric form
//!
//! ```no_run
//! use serde_json::json;
//! use systemix_token::{encode_signed, verify_signed, EncodeOptions, SignedAlgorithm, VerifyOptions};
//!
//! # async fn run() -> systemix_token::TokenResult<()> {
//! let token = encode_signed(
//!     &json!({ "userId": "123" }),
//!     "shared-secret",
//!     &EncodeOptions::new().expires_in(3600),
//! )
//! .await?;
//!
//! let claims = verify_signed(&token, "shared-secret", &VerifyOptions::new([SignedAlgorithm::HS256])).await?;
//! assert_eq!(claims["userId"], "123");
//! # Ok(())
//! # }
//! ```

mod algorithm;
pub mod backend;
mod codec;
mod error;
mod future;
pub mod generate;
pub mod signed;
mod types;

pub use algorithm::{AlgorithmFamily, HashAlgorithm, SignedAlgorithm, UnknownAlgorithm};
pub use backend::{backend_for, sign_rsa, verify_rsa, HmacBackend, RsaBackend, SigningBackend};
pub use codec::{decode_signed, encode_parts, signing_input, split_compact, SEPARATOR};
pub use error::*;
pub use future::AsyncTokenResult;
pub use generate::{
    generate_token, generate_tokens, Charset, GenerateError, GenerateTokenOptions,
    MAX_BYTE_LENGTH, MAX_COUNT,
};
pub use signed::{
    encode_signed, verify_signed, verify_signed_as, EncodeOptions, TokenId, VerifyOptions,
    TOKEN_ID_BYTES,
};
pub use types::*;

//! Signing backends
//!
//! Two interchangeable implementations of one capability: HMAC for the
//! symmetric algorithms and RSASSA-PKCS1-v1_5 for the asymmetric ones.
//! The issuer and verifier pick a backend through [`backend_for`] and never
//! look at backend details beyond that.

mod hmac;
mod rsa;

pub use self::hmac::HmacBackend;
pub use self::rsa::{sign_rsa, verify_rsa, RsaBackend};

use crate::algorithm::{AlgorithmFamily, SignedAlgorithm};
use crate::error::TokenResult;

/// Sign and verify a signing input with caller-supplied key material
///
/// Keys are opaque bytes: the shared secret for HMAC, PEM text for RSA.
/// Implementations must be stateless; keys are never cached.
pub trait SigningBackend: Send + Sync {
    /// Produce the raw signature bytes over the UTF-8 signing input
    ///
    /// # Errors
    /// Returns an error when the key is unusable or `alg` belongs to another
    /// backend.
    fn sign(&self, signing_input: &str, key: &[u8], alg: SignedAlgorithm) -> TokenResult<Vec<u8>>;

    /// Check raw signature bytes over the signing input
    ///
    /// Every failure (bad signature, malformed key, wrong family) is `false`.
    fn verify(&self, signing_input: &str, signature: &[u8], key: &[u8], alg: SignedAlgorithm)
        -> bool;

    /// Like [`SigningBackend::verify`], with the signature still base64url
    /// encoded; undecodable input is `false`.
    fn verify_encoded(
        &self,
        signing_input: &str,
        signature_b64: &str,
        key: &[u8],
        alg: SignedAlgorithm,
    ) -> bool {
        match systemix_common::base64url_decode(signature_b64) {
            Ok(signature) => self.verify(signing_input, &signature, key, alg),
            Err(_) => false,
        }
    }
}

static HMAC_BACKEND: HmacBackend = HmacBackend;
static RSA_BACKEND: RsaBackend = RsaBackend;

/// The backend responsible for `alg`
#[must_use]
pub fn backend_for(alg: SignedAlgorithm) -> &'static dyn SigningBackend {
    match alg.family() {
        AlgorithmFamily::Hmac => &HMAC_BACKEND,
        AlgorithmFamily::Rsa => &RSA_BACKEND,
    }
}

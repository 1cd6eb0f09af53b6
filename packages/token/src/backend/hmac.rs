//! HMAC-based signing backend (HS256, HS384, HS512)

use super::SigningBackend;
use crate::algorithm::{HashAlgorithm, SignedAlgorithm};
use crate::error::{TokenError, TokenResult};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use systemix_common::bytes_equal;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// Keyed-hash backend; the key is the shared secret, any length
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacBackend;

fn compute_mac<M: Mac + KeyInit>(message: &str, secret: &[u8]) -> TokenResult<Vec<u8>> {
    let mut mac = <M as KeyInit>::new_from_slice(secret)
        .map_err(|_| TokenError::invalid_key("Invalid HMAC key"))?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

impl SigningBackend for HmacBackend {
    fn sign(&self, signing_input: &str, key: &[u8], alg: SignedAlgorithm) -> TokenResult<Vec<u8>> {
        if !alg.is_hmac() {
            return Err(TokenError::InvalidKey(format!("{alg} is not an HMAC algorithm")));
        }
        match alg.hash() {
            HashAlgorithm::Sha256 => compute_mac::<HmacSha256>(signing_input, key),
            HashAlgorithm::Sha384 => compute_mac::<HmacSha384>(signing_input, key),
            HashAlgorithm::Sha512 => compute_mac::<HmacSha512>(signing_input, key),
        }
    }

    fn verify(
        &self,
        signing_input: &str,
        signature: &[u8],
        key: &[u8],
        alg: SignedAlgorithm,
    ) -> bool {
        match self.sign(signing_input, key, alg) {
            Ok(expected) => bytes_equal(signature, &expected),
            Err(_) => false,
        }
    }
}

//! RSA-based signing backend (RS256, RS384, RS512)
//!
//! RSASSA-PKCS1-v1_5 with the digest selected by the algorithm. Private keys
//! are PEM PKCS#8 (`BEGIN PRIVATE KEY`), public keys PEM SPKI
//! (`BEGIN PUBLIC KEY`); the PKCS#1 `BEGIN RSA ...` forms are accepted too.

use super::SigningBackend;
use crate::algorithm::{HashAlgorithm, SignedAlgorithm};
use crate::error::{TokenError, TokenResult};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::sha2::{Sha256, Sha384, Sha512};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Asymmetric backend; signs with a private key, verifies with a public key
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaBackend;

fn pem_text(key: &[u8]) -> TokenResult<&str> {
    std::str::from_utf8(key).map_err(|_| TokenError::invalid_key("RSA key must be PEM text"))
}

fn parse_private_key(key: &[u8]) -> TokenResult<RsaPrivateKey> {
    let pem = pem_text(key)?;
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| TokenError::InvalidKey(format!("Invalid RSA private key: {e}")))
}

fn parse_public_key(key: &[u8]) -> TokenResult<RsaPublicKey> {
    let pem = pem_text(key)?;
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| TokenError::InvalidKey(format!("Invalid RSA public key: {e}")))
}

impl SigningBackend for RsaBackend {
    fn sign(&self, signing_input: &str, key: &[u8], alg: SignedAlgorithm) -> TokenResult<Vec<u8>> {
        if !alg.is_rsa() {
            return Err(TokenError::InvalidKey(format!("{alg} is not an RSA algorithm")));
        }
        let private_key = parse_private_key(key)?;
        let message = signing_input.as_bytes();

        let signature = match alg.hash() {
            HashAlgorithm::Sha256 => SigningKey::<Sha256>::new(private_key)
                .try_sign(message)
                .map(|s| s.to_vec()),
            HashAlgorithm::Sha384 => SigningKey::<Sha384>::new(private_key)
                .try_sign(message)
                .map(|s| s.to_vec()),
            HashAlgorithm::Sha512 => SigningKey::<Sha512>::new(private_key)
                .try_sign(message)
                .map(|s| s.to_vec()),
        };

        signature.map_err(|e| TokenError::Signing(format!("RSA signing failed: {e}")))
    }

    fn verify(
        &self,
        signing_input: &str,
        signature: &[u8],
        key: &[u8],
        alg: SignedAlgorithm,
    ) -> bool {
        if !alg.is_rsa() {
            return false;
        }
        let public_key = match parse_public_key(key) {
            Ok(public_key) => public_key,
            Err(e) => {
                tracing::warn!(%alg, error = %e, "RSA public key rejected during verification");
                return false;
            }
        };
        let Ok(signature) = Signature::try_from(signature) else {
            return false;
        };
        let message = signing_input.as_bytes();

        match alg.hash() {
            HashAlgorithm::Sha256 => VerifyingKey::<Sha256>::new(public_key)
                .verify(message, &signature)
                .is_ok(),
            HashAlgorithm::Sha384 => VerifyingKey::<Sha384>::new(public_key)
                .verify(message, &signature)
                .is_ok(),
            HashAlgorithm::Sha512 => VerifyingKey::<Sha512>::new(public_key)
                .verify(message, &signature)
                .is_ok(),
        }
    }
}

/// Sign `signing_input` with a PEM private key, returning base64url
///
/// # Errors
/// Returns [`TokenError::InvalidKey`] for a non-RSA algorithm or an
/// unparseable key, and [`TokenError::Signing`] if the primitive fails.
pub fn sign_rsa(
    signing_input: &str,
    private_key_pem: &str,
    alg: SignedAlgorithm,
) -> TokenResult<String> {
    let signature = RsaBackend.sign(signing_input, private_key_pem.as_bytes(), alg)?;
    Ok(systemix_common::base64url_encode(signature))
}

/// Verify a base64url signature with a PEM public key
///
/// Any failure, including a malformed key, is `false`.
#[must_use]
pub fn verify_rsa(
    signing_input: &str,
    signature_b64: &str,
    public_key_pem: &str,
    alg: SignedAlgorithm,
) -> bool {
    RsaBackend.verify_encoded(signing_input, signature_b64, public_key_pem.as_bytes(), alg)
}

//! Constant-time comparison for cryptographic security
//!
//! Used when comparing a freshly computed MAC or signature against an
//! attacker-supplied one. The running time depends on the input length but
//! not on the position of the first differing byte. Length is not treated as
//! secret.

/// Compare two byte slices in constant time
#[inline]
pub fn bytes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Compare the UTF-8 bytes of two strings in constant time
#[inline]
pub fn secure_compare(a: &str, b: &str) -> bool {
    bytes_equal(a.as_bytes(), b.as_bytes())
}

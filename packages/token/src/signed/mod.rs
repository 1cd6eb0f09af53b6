//! Signed compact tokens
//!
//! Issue with [`encode_signed`], inspect without trust with
//! [`crate::decode_signed`], and accept only through [`verify_signed`].

mod encode;
mod options;
mod verify;

pub use encode::encode_signed;
pub use options::{EncodeOptions, TokenId, VerifyOptions, TOKEN_ID_BYTES};
pub use verify::{verify_signed, verify_signed_as};

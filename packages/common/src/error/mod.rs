//! Error types for the shared codecs
//!
//! Decoding is the only fallible operation in this crate; encoders and the
//! comparator are total.

pub mod types;

pub use types::{EncodingError, Result};

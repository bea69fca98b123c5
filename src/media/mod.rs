//! Inline image handling.
//!
//! - [`data_uri`]: parsing and building `data:image/...;base64,` payloads
//! - [`compressor`]: downscaling and JPEG re-encoding for the inline fallback tier

pub mod compressor;
pub mod data_uri;

pub use compressor::{fit_within, ImageCompressor};

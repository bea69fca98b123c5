//! Parsing and building `data:` URIs for inline image payloads.

use crate::domain::error::{PortfolioError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Prefix shared by every inline image payload.
pub const IMAGE_PREFIX: &str = "data:image/";

/// A borrowed view of a parsed `data:` URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    /// MIME type, e.g. `image/png`. Empty if the URI omits it.
    pub mime: &'a str,
    /// Whether the data part is base64-encoded.
    pub base64: bool,
    /// Everything after the first comma.
    pub data: &'a str,
}

/// Returns `true` if `value` is an inline image payload.
#[must_use]
pub fn is_image_data_uri(value: &str) -> bool {
    value.starts_with(IMAGE_PREFIX)
}

/// Splits a `data:` URI into its MIME type, encoding flag and data.
///
/// Returns `None` if `value` is not a `data:` URI or has no data separator.
///
/// ```
/// use portfolio_store::media::data_uri;
///
/// let uri = data_uri::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
/// assert_eq!(uri.mime, "image/png");
/// assert!(uri.base64);
/// assert_eq!(uri.data, "iVBORw0KGgo=");
/// ```
#[must_use]
pub fn parse(value: &str) -> Option<DataUri<'_>> {
    let rest = value.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;
    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default();
    let base64 = params.any(|p| p.eq_ignore_ascii_case("base64"));
    Some(DataUri { mime, base64, data })
}

/// Decodes the bytes carried by an inline image payload.
///
/// # Errors
///
/// Returns [`PortfolioError::Image`] if the value is not a base64 image data URI or
/// the base64 is malformed.
pub fn decode_image_bytes(value: &str) -> Result<Vec<u8>> {
    let uri = parse(value)
        .filter(|uri| uri.mime.starts_with("image/"))
        .ok_or_else(|| PortfolioError::Image("not an image data URI".to_string()))?;

    if !uri.base64 {
        return Err(PortfolioError::Image(format!(
            "unsupported non-base64 payload for {}",
            uri.mime
        )));
    }

    STANDARD
        .decode(uri.data.trim())
        .map_err(|e| PortfolioError::Image(format!("invalid base64 payload: {e}")))
}

/// Builds a base64 `data:` URI from raw bytes.
#[must_use]
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

pub mod sequence;
pub mod validate;

use crate::entities::Url;

/// Empty parameters are treated as missing.
pub fn parse_url_param(url: &str) -> Result<Option<Url>, crate::entities::ParseError> {
    let url = url.trim();
    if url.is_empty() {
        return Ok(None);
    }
    url.parse().map(Some)
}

//! Response body parsing.
//!
//! The relay may answer with JSON or with plain text, and the two mean
//! different things to the pipeline. The decision is made once here from
//! the `Content-Type` header and carried forward as a [`ResponseBody`].

use hookchat_types::error::RelayError;
use hookchat_types::relay::ResponseBody;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Whether a `Content-Type` header value declares a JSON body.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|value| value.to_ascii_lowercase().contains(JSON_MEDIA_TYPE))
        .unwrap_or(false)
}

/// Parse a raw body according to its declared content type.
///
/// A body declared as JSON that does not parse is an error; anything not
/// declared as JSON is kept as text, even if it happens to look like JSON.
pub fn parse_body(content_type: Option<&str>, raw: String) -> Result<ResponseBody, RelayError> {
    if is_json_content_type(content_type) {
        serde_json::from_str(&raw)
            .map(ResponseBody::Json)
            .map_err(|e| RelayError::Decode(e.to_string()))
    } else {
        Ok(ResponseBody::Text(raw))
    }
}

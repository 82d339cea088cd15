use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

/// Derive the entity id for a natural key (a feed URL or an article link).
///
/// The id is the padded URL-safe base64 encoding of the raw bytes, so it is
/// injective: distinct inputs never share an id.
pub fn entity_id(input: &str) -> String {
    URL_SAFE.encode(input.as_bytes())
}

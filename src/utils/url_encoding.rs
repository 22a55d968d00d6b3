use urlencoding::encode;

/// Escape an id for use as a single URL path segment.
pub fn encode_segment(id: &str) -> String {
    encode(id).into_owned()
}

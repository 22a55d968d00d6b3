// URL handling utilities
pub mod url_parser;
pub mod url_encoding;

// JSON utilities
pub mod json_converter;

// Re-export all utilities for convenient access
pub use url_parser::hostname_from_url;
pub use url_encoding::encode_segment;
pub use json_converter::{object_rows, value_to_short_string};

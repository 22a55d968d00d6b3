// Backend API modules
pub mod client;
pub mod error;
pub mod backend;
pub mod environments;
pub mod instances;
pub mod metadata;

// Re-export commonly used items
pub use client::{set_silent, ApiClient};
pub use error::{ApiError, FALLBACK_ERROR_MESSAGE};
pub use backend::PowerToggleApi;

/// Fields every dashboard page carries for the shared layout.
pub trait BaseTemplate {
    fn api_hostname(&self) -> &str;
    fn backend_version(&self) -> &str;
    fn error(&self) -> Option<&str>;
    /// Whether the page should reload itself (some request is still in flight).
    fn auto_refresh(&self) -> bool;
}

/// Macro to implement BaseTemplate for a struct with standard fields
#[macro_export]
macro_rules! impl_base_template {
    ($struct_name:ty) => {
        impl $crate::templates::BaseTemplate for $struct_name {
            fn api_hostname(&self) -> &str {
                &self.api_hostname
            }
            fn backend_version(&self) -> &str {
                &self.backend_version
            }
            fn error(&self) -> Option<&str> {
                self.error.as_deref()
            }
            fn auto_refresh(&self) -> bool {
                self.auto_refresh
            }
        }
    };
}

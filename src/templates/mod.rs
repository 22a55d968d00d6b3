// Base template trait shared by every page
pub mod base_template;
pub use base_template::BaseTemplate;

// Individual template files
pub mod environments_template;
pub mod environment_detail_template;
pub mod about_template;
pub mod not_found_template;

// Re-export all templates
pub use environments_template::EnvironmentsTemplate;
pub use environment_detail_template::EnvironmentDetailTemplate;
pub use about_template::AboutTemplate;
pub use not_found_template::NotFoundTemplate;

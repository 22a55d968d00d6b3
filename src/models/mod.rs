pub mod app_state;
pub mod environment;
pub mod environment_view;
pub mod version_info;

pub use app_state::AppState;
pub use environment::{EnvList, Environment, EnvironmentState, Instance, InstanceState};
pub use environment_view::{EnvironmentView, InstanceRow};
pub use version_info::VersionInfo;

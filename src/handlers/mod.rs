pub mod helpers;
pub mod environments;
pub mod instances;
pub mod system;

pub mod connectivity;
pub mod environment;
pub mod error;
pub mod launcher;
pub mod preflight;

pub use connectivity::{SchemaCatalog, SchemaCheckResult, verify_connectivity};
pub use environment::{Confirm, EnvironmentReport, Toolchain, verify_environment};
pub use error::LaunchError;
pub use launcher::{LaunchRequest, ProcessLauncher, launch_application};
pub use preflight::Preflight;

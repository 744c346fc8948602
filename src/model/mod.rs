pub mod config;
pub mod credentials;
pub mod launch;
pub mod settings;

pub use config::{Config, ConfigError};
pub use credentials::{CredentialsError, DatabaseCredentials};
pub use launch::LaunchConfig;
pub use settings::Settings;

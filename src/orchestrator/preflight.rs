use log::info;

use super::LaunchError;
use super::connectivity::{SchemaCatalog, verify_connectivity};
use super::environment::{Confirm, Toolchain, verify_environment};
use super::launcher::{ProcessLauncher, launch_application};
use crate::model::{Config, LaunchConfig, Settings};

/// The gated run: environment, database, then launch. Each stage must
/// succeed before the next one starts.
pub struct Preflight<'a> {
    pub config: &'a Config,
    pub settings: &'a Settings,
    pub toolchain: &'a dyn Toolchain,
    pub confirm: &'a dyn Confirm,
    pub catalog: &'a dyn SchemaCatalog,
    pub launcher: &'a dyn ProcessLauncher,
}

impl Preflight<'_> {
    /// Returns the app's exit status once it has run.
    pub fn run(&self, launch: &LaunchConfig) -> Result<i32, LaunchError> {
        let runtime = verify_environment(
            self.toolchain,
            self.confirm,
            &self.config.runtime,
            &self.config.capabilities,
        )?;

        let schema = verify_connectivity(self.catalog, self.settings, &self.config.database)?;
        let missing = schema.missing();
        if !missing.is_empty() {
            info!("Continuing without: {}", missing.join(", "));
        }

        launch_application(
            self.launcher,
            &runtime,
            &self.config.launch.entry_point,
            launch,
            self.settings,
        )
    }
}

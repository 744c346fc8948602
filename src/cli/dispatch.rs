use log::{debug, error, info, warn};
use std::ffi::OsString;

use crate::cli::args::{parse_args, usage_synopsis, usage_text};
use crate::cli::prompt::StdinConfirm;
use crate::executor::{OdbcCatalog, PythonToolchain, SystemLauncher};
use crate::model::{Config, Settings};
use crate::orchestrator::{LaunchError, Preflight};

/// Run the launcher and return the process exit status.
pub fn handle<I, T>(config: &Config, args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let settings = Settings::load(&config.launch.env_file);
    match settings.source() {
        Some(path) => info!("Loaded environment from {}", path.display()),
        None => warn!(
            "{} not loaded, using current environment and defaults",
            config.launch.env_file.display()
        ),
    }

    let launch = match parse_args(args) {
        Ok(launch) => launch,
        Err(e) => {
            error!("{}", e);
            match &e {
                LaunchError::UnknownOption(_) => eprintln!("{}", usage_text()),
                _ => eprintln!("{}", usage_synopsis()),
            }
            return e.exit_code();
        }
    };
    debug!(
        "Launch flags: share={} auth={} host={:?} port={:?}",
        launch.share,
        launch.auth.is_some(),
        launch.host,
        launch.port
    );

    let toolchain = PythonToolchain::detect(&config.runtime.interpreters);
    let catalog = OdbcCatalog::new(&config.database);
    let preflight = Preflight {
        config,
        settings: &settings,
        toolchain: &toolchain,
        confirm: &StdinConfirm,
        catalog: &catalog,
        launcher: &SystemLauncher,
    };

    match preflight.run(&launch) {
        Ok(status) => status,
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    }
}

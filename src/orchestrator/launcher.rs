use log::info;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use super::LaunchError;
use super::environment::Runtime;
use crate::model::{LaunchConfig, Settings};

/// Everything needed to start the app process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub program: String,
    pub script: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(OsString, OsString)>,
}

impl LaunchRequest {
    /// Forwarded arguments joined for display.
    pub fn argument_line(&self) -> String {
        self.args.join(" ")
    }
}

/// Runs the app and waits for it, returning its exit status.
pub trait ProcessLauncher {
    fn launch(&self, request: &LaunchRequest) -> io::Result<i32>;
}

/// Start the app with the forwarded flags; the child's status is returned.
pub fn launch_application(
    launcher: &dyn ProcessLauncher,
    runtime: &Runtime,
    entry_point: &Path,
    launch: &LaunchConfig,
    settings: &Settings,
) -> Result<i32, LaunchError> {
    if !entry_point.is_file() {
        return Err(LaunchError::EntryPointMissing(entry_point.to_path_buf()));
    }

    let request = LaunchRequest {
        program: runtime.program.clone(),
        script: entry_point.to_path_buf(),
        args: launch.forwarded_args(),
        env: settings
            .vars()
            .map(|(k, v)| (k.to_os_string(), v.to_os_string()))
            .collect(),
    };

    info!("Starting app: {}", request.script.display());
    info!("Arguments: {}", request.argument_line());

    let status = launcher
        .launch(&request)
        .map_err(|e| LaunchError::LaunchFailed(e.to_string()))?;

    info!("App exited with status {}", status);
    Ok(status)
}

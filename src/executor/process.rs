use log::debug;
use std::io;
use std::process::Command;

use crate::orchestrator::{LaunchRequest, ProcessLauncher};

/// Runs the app as a child process with exactly the request's environment.
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, request: &LaunchRequest) -> io::Result<i32> {
        debug!(
            "Spawning {} {} with {} environment variable(s)",
            request.program,
            request.script.display(),
            request.env.len()
        );

        let status = Command::new(&request.program)
            .arg(&request.script)
            .args(&request.args)
            .env_clear()
            .envs(request.env.iter().map(|(k, v)| (k, v)))
            .status()?;

        // No code means the child was killed by a signal
        Ok(status.code().unwrap_or(1))
    }
}

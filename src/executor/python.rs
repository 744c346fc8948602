use log::debug;
use std::process::{Command, Stdio};

use crate::orchestrator::environment::{Capability, InstallError, InstallRequest, Runtime, Toolchain};

/// Python found on `PATH` (or at a configured path), probed with `-c "import ..."`
/// and managed with `-m pip`.
#[derive(Debug, Clone)]
pub struct PythonToolchain {
    runtime: Option<Runtime>,
}

impl PythonToolchain {
    /// Use the first candidate that answers `--version`.
    pub fn detect(candidates: &[String]) -> Self {
        let runtime = candidates.iter().find_map(|program| probe_version(program));
        Self { runtime }
    }
}

fn probe_version(program: &str) -> Option<Runtime> {
    match Command::new(program).arg("--version").output() {
        Ok(output) if output.status.success() => {
            // Python 2 reports its version on stderr
            let stdout = String::from_utf8_lossy(&output.stdout);
            let version = if stdout.trim().is_empty() {
                String::from_utf8_lossy(&output.stderr).trim().to_string()
            } else {
                stdout.trim().to_string()
            };
            Some(Runtime {
                program: program.to_string(),
                version,
            })
        }
        Ok(output) => {
            debug!("{} --version exited with {}", program, output.status);
            None
        }
        Err(e) => {
            debug!("{} not usable: {}", program, e);
            None
        }
    }
}

/// Dotted Python identifier, safe to splice into an import statement.
fn is_module_path(module: &str) -> bool {
    !module.is_empty()
        && module.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

impl Toolchain for PythonToolchain {
    fn runtime(&self) -> Option<Runtime> {
        self.runtime.clone()
    }

    fn is_resolvable(&self, runtime: &Runtime, capability: &Capability) -> bool {
        if !is_module_path(&capability.module) {
            debug!("'{}' is not an importable module name", capability.module);
            return false;
        }

        Command::new(&runtime.program)
            .arg("-c")
            .arg(format!("import {}", capability.module))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn install(&self, runtime: &Runtime, request: &InstallRequest) -> Result<(), InstallError> {
        let status = Command::new(&runtime.program)
            .args(["-m", "pip", "install"])
            .args(&request.capabilities)
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(InstallError::Failed(status.to_string()))
        }
    }
}

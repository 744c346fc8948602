use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::io;

use super::LaunchError;
use crate::model::config::{CapabilitiesConfig, RuntimeConfig};

/// A detected interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runtime {
    pub program: String,
    pub version: String,
}

/// A package the app imports: its distribution name and the module probed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub name: String,
    pub module: String,
}

impl Capability {
    /// Module name comes from `overrides`, else the name with `-` mapped to `_`.
    pub fn new(name: &str, overrides: &BTreeMap<String, String>) -> Self {
        let module = overrides
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.replace('-', "_"));
        Self {
            name: name.to_string(),
            module,
        }
    }

    pub fn from_config(config: &CapabilitiesConfig) -> Vec<Self> {
        config
            .required
            .iter()
            .map(|name| Self::new(name, &config.modules))
            .collect()
    }
}

/// Packages to hand to the installer, in the order they were found missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub capabilities: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("could not run installer: {0}")]
    Spawn(#[from] io::Error),

    #[error("installer exited with {0}")]
    Failed(String),
}

/// Runtime detection, package probing and installation.
pub trait Toolchain {
    fn runtime(&self) -> Option<Runtime>;
    fn is_resolvable(&self, runtime: &Runtime, capability: &Capability) -> bool;
    fn install(&self, runtime: &Runtime, request: &InstallRequest) -> Result<(), InstallError>;
}

/// Yes/no question to the operator.
pub trait Confirm {
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentReport {
    pub runtime_present: bool,
    pub missing_capabilities: Vec<String>,
}

impl EnvironmentReport {
    pub fn collect(toolchain: &dyn Toolchain, capabilities: &[Capability]) -> (Self, Option<Runtime>) {
        let Some(runtime) = toolchain.runtime() else {
            let report = Self {
                runtime_present: false,
                missing_capabilities: Vec::new(),
            };
            return (report, None);
        };

        let report = Self {
            runtime_present: true,
            missing_capabilities: missing_capabilities(toolchain, &runtime, capabilities),
        };
        (report, Some(runtime))
    }
}

fn missing_capabilities(
    toolchain: &dyn Toolchain,
    runtime: &Runtime,
    capabilities: &[Capability],
) -> Vec<String> {
    capabilities
        .iter()
        .filter(|capability| {
            let found = toolchain.is_resolvable(runtime, capability);
            debug!("Probe {} (import {}): {}", capability.name, capability.module, found);
            !found
        })
        .map(|capability| capability.name.clone())
        .collect()
}

/// Check the runtime and required packages, offering a single install.
pub fn verify_environment(
    toolchain: &dyn Toolchain,
    confirm: &dyn Confirm,
    runtime_config: &RuntimeConfig,
    capabilities_config: &CapabilitiesConfig,
) -> Result<Runtime, LaunchError> {
    info!("Checking Python environment");
    let capabilities = Capability::from_config(capabilities_config);

    let (report, runtime) = EnvironmentReport::collect(toolchain, &capabilities);
    let (true, Some(runtime)) = (report.runtime_present, runtime) else {
        return Err(LaunchError::RuntimeMissing(runtime_config.interpreters.join(", ")));
    };
    info!("Found {} ({})", runtime.version, runtime.program);

    if report.missing_capabilities.is_empty() {
        info!("All {} required packages are installed", capabilities.len());
        return Ok(runtime);
    }

    warn!(
        "Missing Python packages: {}",
        report.missing_capabilities.join(" ")
    );

    let accepted = confirm
        .confirm("Install missing packages now? (y/N): ")
        .unwrap_or_else(|e| {
            warn!("Could not read answer: {}", e);
            false
        });
    if !accepted {
        return Err(LaunchError::DependenciesMissing(report.missing_capabilities));
    }

    let request = InstallRequest {
        capabilities: report.missing_capabilities.clone(),
    };
    info!("Installing: {}", request.capabilities.join(" "));
    if let Err(e) = toolchain.install(&runtime, &request) {
        warn!("Package installation failed: {}", e);
        return Err(LaunchError::DependenciesMissing(report.missing_capabilities));
    }

    let still_missing = missing_capabilities(toolchain, &runtime, &capabilities);
    if !still_missing.is_empty() {
        return Err(LaunchError::DependenciesMissing(still_missing));
    }

    info!("Dependencies installed");
    Ok(runtime)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeSet;

    /// Toolchain double: a fixed set of importable modules, optionally
    /// extended when `install` succeeds.
    pub struct FakeToolchain {
        pub runtime: Option<Runtime>,
        pub modules: RefCell<BTreeSet<String>>,
        pub install_result: Option<String>,
        pub installs: RefCell<Vec<InstallRequest>>,
        pub install_adds: Vec<String>,
    }

    impl FakeToolchain {
        pub fn with_modules(modules: &[&str]) -> Self {
            Self {
                runtime: Some(Runtime {
                    program: "python3".to_string(),
                    version: "Python 3.11.4".to_string(),
                }),
                modules: RefCell::new(modules.iter().map(|m| m.to_string()).collect()),
                install_result: None,
                installs: RefCell::new(Vec::new()),
                install_adds: Vec::new(),
            }
        }
    }

    impl Toolchain for FakeToolchain {
        fn runtime(&self) -> Option<Runtime> {
            self.runtime.clone()
        }

        fn is_resolvable(&self, _runtime: &Runtime, capability: &Capability) -> bool {
            self.modules.borrow().contains(&capability.module)
        }

        fn install(&self, _runtime: &Runtime, request: &InstallRequest) -> Result<(), InstallError> {
            self.installs.borrow_mut().push(request.clone());
            if let Some(reason) = &self.install_result {
                return Err(InstallError::Failed(reason.clone()));
            }
            self.modules
                .borrow_mut()
                .extend(self.install_adds.iter().cloned());
            Ok(())
        }
    }

    pub struct ScriptedConfirm {
        pub answer: bool,
        pub asked: Cell<usize>,
    }

    impl ScriptedConfirm {
        pub fn answering(answer: bool) -> Self {
            Self {
                answer,
                asked: Cell::new(0),
            }
        }
    }

    impl Confirm for ScriptedConfirm {
        fn confirm(&self, _question: &str) -> io::Result<bool> {
            self.asked.set(self.asked.get() + 1);
            Ok(self.answer)
        }
    }

    pub const ALL_MODULES: [&str; 4] = ["gradio", "pandas", "psycopg2", "dotenv"];

    fn verify(toolchain: &FakeToolchain, confirm: &ScriptedConfirm) -> Result<Runtime, LaunchError> {
        verify_environment(
            toolchain,
            confirm,
            &RuntimeConfig::default(),
            &CapabilitiesConfig::default(),
        )
    }

    #[test]
    fn test_capability_module_names() {
        let overrides = BTreeMap::from([("python-dotenv".to_string(), "dotenv".to_string())]);
        assert_eq!(Capability::new("python-dotenv", &overrides).module, "dotenv");
        assert_eq!(Capability::new("typing-extensions", &overrides).module, "typing_extensions");
        assert_eq!(Capability::new("gradio", &overrides).module, "gradio");
    }

    #[test]
    fn test_all_present_never_prompts() {
        let toolchain = FakeToolchain::with_modules(&ALL_MODULES);
        let confirm = ScriptedConfirm::answering(true);

        let runtime = verify(&toolchain, &confirm).unwrap();
        assert_eq!(runtime.program, "python3");
        assert_eq!(confirm.asked.get(), 0);
        assert!(toolchain.installs.borrow().is_empty());
    }

    #[test]
    fn test_runtime_missing() {
        let mut toolchain = FakeToolchain::with_modules(&ALL_MODULES);
        toolchain.runtime = None;
        let confirm = ScriptedConfirm::answering(true);

        match verify(&toolchain, &confirm) {
            Err(LaunchError::RuntimeMissing(tried)) => assert_eq!(tried, "python3, python"),
            other => panic!("Expected RuntimeMissing, got {other:?}"),
        }
        assert_eq!(confirm.asked.get(), 0);
    }

    #[test]
    fn test_report_keeps_required_order() {
        let toolchain = FakeToolchain::with_modules(&["pandas"]);
        let capabilities = Capability::from_config(&CapabilitiesConfig::default());

        let (report, runtime) = EnvironmentReport::collect(&toolchain, &capabilities);
        assert!(runtime.is_some());
        assert!(report.runtime_present);
        assert_eq!(
            report.missing_capabilities,
            vec!["gradio", "psycopg2-binary", "python-dotenv"]
        );
    }

    #[test]
    fn test_declined_install() {
        let toolchain = FakeToolchain::with_modules(&["gradio", "pandas", "psycopg2"]);
        let confirm = ScriptedConfirm::answering(false);

        match verify(&toolchain, &confirm) {
            Err(LaunchError::DependenciesMissing(missing)) => {
                assert_eq!(missing, vec!["python-dotenv"])
            }
            other => panic!("Expected DependenciesMissing, got {other:?}"),
        }
        assert_eq!(confirm.asked.get(), 1);
        assert!(toolchain.installs.borrow().is_empty());
    }

    #[test]
    fn test_accepted_install_passes_ordered_request() {
        let mut toolchain = FakeToolchain::with_modules(&["pandas"]);
        toolchain.install_adds = vec!["gradio".into(), "psycopg2".into(), "dotenv".into()];
        let confirm = ScriptedConfirm::answering(true);

        verify(&toolchain, &confirm).unwrap();

        let installs = toolchain.installs.borrow();
        assert_eq!(installs.len(), 1);
        assert_eq!(
            installs[0].capabilities,
            vec!["gradio", "psycopg2-binary", "python-dotenv"]
        );
    }

    #[test]
    fn test_installer_failure_is_fatal() {
        let mut toolchain = FakeToolchain::with_modules(&["gradio", "pandas", "psycopg2"]);
        toolchain.install_result = Some("exit status: 1".into());
        let confirm = ScriptedConfirm::answering(true);

        assert!(matches!(
            verify(&toolchain, &confirm),
            Err(LaunchError::DependenciesMissing(_))
        ));
    }

    #[test]
    fn test_still_missing_after_install() {
        let mut toolchain = FakeToolchain::with_modules(&["pandas"]);
        toolchain.install_adds = vec!["gradio".into()];
        let confirm = ScriptedConfirm::answering(true);

        match verify(&toolchain, &confirm) {
            Err(LaunchError::DependenciesMissing(missing)) => {
                assert_eq!(missing, vec!["psycopg2-binary", "python-dotenv"])
            }
            other => panic!("Expected DependenciesMissing, got {other:?}"),
        }
    }
}

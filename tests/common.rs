#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const POSTGRES_VARS: [&str; 5] = [
    "POSTGRES_HOST",
    "POSTGRES_PORT",
    "POSTGRES_DB",
    "POSTGRES_USER",
    "POSTGRES_PASSWORD",
];

/// Returns the launcher binary, run from `dir` with no inherited database settings
pub fn launcher_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wholebif_launcher").expect("Binary not found");
    cmd.current_dir(dir).env_remove("RUST_LOG");
    for var in POSTGRES_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Temp working directory with the given `launcher.toml`
pub fn setup_workspace(config: &str) -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join("launcher.toml"), config).expect("Failed to write config");
    temp_dir
}

/// Entry point script inside `dir`, as configured by `config_with`
pub fn write_entry_point(dir: &Path) -> PathBuf {
    let app_dir = dir.join("searchtools");
    fs::create_dir_all(&app_dir).expect("Failed to create app directory");
    let script = app_dir.join("gradio_app.py");
    fs::write(&script, "print('app')\n").expect("Failed to write entry point");
    script
}

/// Stand-in interpreter: answers `--version`, exits with `import_status`
/// for `-c`, and records its arguments when asked to run a script.
#[cfg(unix)]
pub fn fake_python(dir: &Path, import_status: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-python");
    let marker = dir.join("launched.txt");
    let script = format!(
        "#!/bin/sh\n\
         case \"$1\" in\n\
         \x20 --version) echo \"Python 3.11.4\" ;;\n\
         \x20 -c) exit {import_status} ;;\n\
         \x20 -m) exit 0 ;;\n\
         \x20 *) echo \"$@\" > \"{}\" ;;\n\
         esac\n",
        marker.display()
    );
    fs::write(&path, script).expect("Failed to write fake interpreter");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake interpreter executable");
    path
}

/// `launcher.toml` pointing at `interpreter` and the test entry point
pub fn config_with(interpreter: &Path) -> String {
    format!(
        "[runtime]\n\
         interpreters = [\"{}\"]\n\
         \n\
         [database]\n\
         connect_timeout_secs = 2\n\
         \n\
         [launch]\n\
         entry_point = \"searchtools/gradio_app.py\"\n",
        interpreter.display()
    )
}

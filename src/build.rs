//! Source build fallback: configure + make.
//!
//! Used when no prebuilt binary exists for the host. Both steps inherit the
//! console streams so their own output is the primary diagnostic; any
//! non-zero exit is fatal. Never invoked on Windows (the pipeline fails with
//! `UnsupportedPlatform` before reaching this module).

use crate::error::InstallError;
use crate::output;
use std::path::Path;
use std::process::Command;

/// Run `./configure` then `make` against an extracted source tree.
///
/// The built executables land in `<source_dir>/bin`, which is the layout the
/// installer consumes; no `make install` is run.
pub fn build(source_dir: &Path) -> Result<(), InstallError> {
    output::action("Now building CMake...");

    // Archive extraction does not always preserve the executable bit.
    set_executable(&source_dir.join("configure"))?;

    run_step(
        "configure",
        Command::new(source_dir.join("configure"))
            .arg(format!("--prefix={}", source_dir.display()))
            .current_dir(source_dir),
    )?;

    run_step(
        "make",
        Command::new("make")
            .arg(format!("-j{}", num_cpus::get()))
            .current_dir(source_dir),
    )?;

    Ok(())
}

fn run_step(step: &'static str, command: &mut Command) -> Result<(), InstallError> {
    let status = command
        .status()
        .map_err(|e| InstallError::fs(format!("failed to start {step}"), e))?;

    if !status.success() {
        return Err(InstallError::Build {
            step,
            code: status.code(),
        });
    }

    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| InstallError::fs(format!("chmod failed for {}", path.display()), e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), InstallError> {
    Ok(())
}

//! Thin pass-through from the wrapper binaries to the real executable.

use crate::locate;
use std::path::Path;
use std::process::Command;

/// Run `tool` with `args`, inheriting stdio, and return its exit code.
///
/// Resolution follows the existence checker's priority order (search path,
/// then module bin). When the tool is nowhere to be found the bare name is
/// handed to the OS anyway, so the user sees the standard not-found error.
/// A child killed by a signal reports exit code 1.
pub fn run_tool(install_root: &Path, tool: &str, args: &[String]) -> std::io::Result<i32> {
    let program = locate::get_command(install_root, tool);
    let status = Command::new(&program).args(args).status()?;
    Ok(status.code().unwrap_or(1))
}

//! Detects an existing CMake installation.
//!
//! Two sources are checked in a fixed priority order: the process's command
//! search path first, then the module's own `bin/` directory. The check does
//! no network or heavy I/O and is safe to call repeatedly and concurrently.

use std::fmt;
use std::path::{Path, PathBuf};

/// Where an existing executable was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Resolved through the host's standard executable lookup.
    SearchPath,
    /// Found in the installation root's `bin/` directory.
    Module,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SearchPath => write!(f, "PATH"),
            Self::Module => write!(f, "module"),
        }
    }
}

/// A usable executable and where it came from.
#[derive(Debug, Clone)]
pub struct Located {
    pub location: Location,
    pub path: PathBuf,
}

/// Path where the module-local copy of `tool` would live.
pub fn module_path(install_root: &Path, tool: &str) -> PathBuf {
    install_root.join("bin").join(crate::install::exe_name(tool))
}

/// Look for `tool` on the search path, then in `install_root/bin`.
pub fn locate(install_root: &Path, tool: &str) -> Option<Located> {
    if let Ok(path) = which::which(tool) {
        return Some(Located {
            location: Location::SearchPath,
            path,
        });
    }

    let module_bin = module_path(install_root, tool);
    if module_bin.is_file() {
        return Some(Located {
            location: Location::Module,
            path: module_bin,
        });
    }

    None
}

/// True when a usable `cmake` executable exists in either source.
pub fn exists(install_root: &Path) -> bool {
    locate(install_root, "cmake").is_some()
}

/// The command other tooling should invoke for `tool`: the located
/// executable, or the bare name so the OS performs the final lookup (and
/// produces the standard not-found error if it misses too).
pub fn get_command(install_root: &Path, tool: &str) -> PathBuf {
    match locate(install_root, tool) {
        Some(found) => found.path,
        None => PathBuf::from(tool),
    }
}

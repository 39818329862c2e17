//! Copies built or extracted CMake output into the installation root.

use crate::config::ToolConfig;
use crate::error::InstallError;
use crate::output;
use std::path::Path;
use walkdir::WalkDir;

/// The two executables every installation must provide.
pub const TOOLS: [&str; 2] = ["cmake", "cpack"];

/// Executable filename for this platform, e.g. `cmake` or `cmake.exe`.
pub fn exe_name(tool: &str) -> String {
    format!("{}{}", tool, std::env::consts::EXE_SUFFIX)
}

/// Install binaries and support directories from `root` (a filtered-extract
/// tree or a freshly built source tree) into `dest`.
///
/// Steps run strictly in sequence: create `dest/bin`, copy the two
/// executables with the executable bit set, then merge-copy the Modules and
/// Templates trees. Existing files are overwritten in place; this is a
/// merge, not an atomic swap.
pub fn install(root: &Path, dest: &Path, config: &ToolConfig) -> Result<(), InstallError> {
    output::action("Installing CMake...");

    let bin_dest = dest.join("bin");
    create_dir_all(&bin_dest)?;

    for tool in TOOLS {
        let name = exe_name(tool);
        let src = root.join("bin").join(&name);
        let to = bin_dest.join(&name);

        copy_file(&src, &to)?;
        set_mode(&to, 0o755)?;
        output::detail(&format!("installed {}", to.display()));
    }

    for dir in ["Modules", "Templates"] {
        let qualified = Path::new("share").join(config.share_dir()).join(dir);

        let mut src = root.join(&qualified);
        if !src.exists() {
            // Source archives keep Modules/Templates at the tree root
            // rather than under share/cmake-<major>/.
            src = root.join(dir);
        }

        copy_tree(&src, &dest.join(&qualified))?;
    }

    Ok(())
}

/// Recursive merge-copy: directories created on demand, files overwritten.
fn copy_tree(src: &Path, dest: &Path) -> Result<(), InstallError> {
    for entry in WalkDir::new(src) {
        let entry = entry
            .map_err(|e| InstallError::fs(format!("cannot read {}", src.display()), e.into()))?;

        let rel = match entry.path().strip_prefix(src) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }

    Ok(())
}

fn create_dir_all(path: &Path) -> Result<(), InstallError> {
    std::fs::create_dir_all(path)
        .map_err(|e| InstallError::fs(format!("cannot create directory {}", path.display()), e))
}

fn copy_file(src: &Path, dest: &Path) -> Result<(), InstallError> {
    if let Some(parent) = dest.parent() {
        create_dir_all(parent)?;
    }

    std::fs::copy(src, dest).map_err(|e| {
        InstallError::fs(
            format!("copy failed: {} -> {}", src.display(), dest.display()),
            e,
        )
    })?;

    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .map_err(|e| InstallError::fs(format!("chmod failed for {}", path.display()), e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), InstallError> {
    Ok(()) // No executable bits to set
}

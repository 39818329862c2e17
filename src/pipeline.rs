//! Top-level install orchestration.
//!
//! One sequential flow per invocation:
//!
//! ```text
//! CheckExisting -> Skip
//!               -> Binary: fetch -> filtered extract -> install -> Done
//!               -> Source: fetch -> full extract -> build -> install -> Done
//! ```
//!
//! Any error aborts the remaining stages; the staging directory is removed
//! on every exit path, and a cleanup failure is logged without masking the
//! original error. Concurrent installs against the same root are not
//! serialized; callers that need that must lock externally.

use crate::config::ToolConfig;
use crate::error::InstallError;
use crate::{build, extract, fetch, install, locate, output, platform};
use std::path::Path;
use tempfile::TempDir;

/// Flags for one install attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Reinstall even when an existing executable was found.
    pub force: bool,
    /// Build from source even when a prebuilt binary exists.
    pub compile: bool,
}

/// Terminal state of a successful pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// CMake was downloaded (and possibly built) and installed.
    Installed,
    /// A usable executable already exists; nothing was modified.
    Skipped,
}

/// Install CMake into `install_root` for the current host platform.
pub fn install(
    install_root: &Path,
    options: InstallOptions,
    config: &ToolConfig,
) -> Result<InstallOutcome, InstallError> {
    install_for_host(
        install_root,
        options,
        config,
        std::env::consts::OS,
        std::env::consts::ARCH,
    )
}

/// Host-parameterized variant of [`install`], letting tests exercise foreign
/// platforms without running on them.
pub fn install_for_host(
    install_root: &Path,
    options: InstallOptions,
    config: &ToolConfig,
    os: &str,
    arch: &str,
) -> Result<InstallOutcome, InstallError> {
    // CheckExisting: forced installs still run the check for the log line.
    if let Some(found) = locate::locate(install_root, "cmake") {
        output::info(&format!(
            "Command \"cmake\" already exists in {}",
            found.location
        ));

        if !options.force {
            output::skip("To force-install, rerun with --force");
            return Ok(InstallOutcome::Skipped);
        }

        output::info("Forcing install...");
    }

    // ResolveSource: pick the binary distribution unless compilation is
    // forced; fall back to the source archive where building is possible.
    let binary_url = if options.compile {
        None
    } else {
        platform::resolve_distribution_url(os, arch, config)
    };

    let (url, from_source) = match binary_url {
        Some(url) => (url, false),
        None => {
            if os == "windows" {
                return Err(InstallError::UnsupportedPlatform {
                    os: os.to_string(),
                    arch: arch.to_string(),
                });
            }
            (platform::source_url(config), true)
        }
    };

    let staging = TempDir::new()
        .map_err(|e| InstallError::fs("cannot create staging directory", e))?;

    let result = run_stages(install_root, config, &staging, &url, from_source);

    // Explicit removal so a cleanup failure is at least visible; the
    // TempDir drop guard still covers panics. Either way the original
    // error below is the one that propagates.
    if let Err(cleanup) = staging.close() {
        output::warning(&format!("failed to remove staging directory: {cleanup}"));
    }

    result?;
    output::success("Success!");
    Ok(InstallOutcome::Installed)
}

fn run_stages(
    install_root: &Path,
    config: &ToolConfig,
    staging: &TempDir,
    url: &str,
    from_source: bool,
) -> Result<(), InstallError> {
    let filename = fetch::filename_from_url(url);
    let archive_path = staging.path().join(&filename);

    output::action("Downloading CMake archive...");
    output::detail(url);
    fetch::fetch(url, &archive_path)?;

    output::action("Extracting CMake archive...");
    if from_source {
        let tree = staging.path().join("src");
        extract::extract_full(&archive_path, &tree)?;
        let root = extract::source_root(&tree, &filename)?;
        build::build(&root)?;
        install::install(&root, install_root, config)?;
    } else {
        let tree = staging.path().join("extracted");
        extract::extract_filtered(&archive_path, &tree, &extract::binary_rules(config))?;
        install::install(&tree, install_root, config)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A base URL that would fail instantly if anything tried to fetch it.
    fn unroutable_config() -> ToolConfig {
        ToolConfig {
            major_version: "3.24".to_string(),
            full_version: "3.24.2".to_string(),
            download_base: "http://127.0.0.1:1/files".to_string(),
        }
    }

    #[test]
    fn test_windows_unsupported_arch_fails_before_any_fetch() {
        let temp = tempfile::tempdir().unwrap();

        let err = install_for_host(
            temp.path(),
            InstallOptions {
                force: true,
                compile: false,
            },
            &unroutable_config(),
            "windows",
            "aarch64",
        )
        .unwrap_err();

        match err {
            InstallError::UnsupportedPlatform { os, arch } => {
                assert_eq!(os, "windows");
                assert_eq!(arch, "aarch64");
            }
            other => panic!("expected UnsupportedPlatform, got {other}"),
        }
    }

    #[test]
    fn test_windows_forced_compile_fails_even_with_binary_available() {
        let temp = tempfile::tempdir().unwrap();

        // win64 has a binary distribution, but --compile forces the source
        // path, which Windows cannot build.
        let err = install_for_host(
            temp.path(),
            InstallOptions {
                force: true,
                compile: true,
            },
            &unroutable_config(),
            "windows",
            "x86_64",
        )
        .unwrap_err();

        assert!(matches!(err, InstallError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn test_skip_when_module_copy_exists() {
        let temp = tempfile::tempdir().unwrap();
        let bin = locate::module_path(temp.path(), "cmake");
        std::fs::create_dir_all(bin.parent().unwrap()).unwrap();
        std::fs::write(&bin, "fake").unwrap();

        let outcome = install_for_host(
            temp.path(),
            InstallOptions::default(),
            &unroutable_config(),
            std::env::consts::OS,
            std::env::consts::ARCH,
        )
        .unwrap();

        assert_eq!(outcome, InstallOutcome::Skipped);
        // The fake install was not touched.
        assert_eq!(std::fs::read(&bin).unwrap(), b"fake");
    }
}

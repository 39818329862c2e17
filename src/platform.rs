//! Maps the host platform to a distribution URL.
//!
//! Pure functions of host facts and configuration; no I/O. Callers pass
//! `std::env::consts::{OS, ARCH}` for the real host.

use crate::config::ToolConfig;

/// Archive suffix for a supported (os, arch) pair, or `None` when no binary
/// distribution is published for that combination.
fn platform_suffix(os: &str, arch: &str) -> Option<&'static str> {
    match (os, arch) {
        ("windows", "x86_64") => Some("win64-x64.zip"),
        ("windows", "x86") => Some("win32-x86.zip"),
        ("macos", "x86_64") => Some("Darwin-x86_64.tar.gz"),
        ("linux", "x86_64") => Some("Linux-x86_64.tar.gz"),
        _ => None,
    }
}

/// Resolve the prebuilt binary distribution URL for a host.
///
/// `None` means the caller must fall back to a source build, except on
/// Windows, where no configure/make toolchain is assumed and the pipeline
/// fails with [`crate::InstallError::UnsupportedPlatform`] instead.
pub fn resolve_distribution_url(os: &str, arch: &str, config: &ToolConfig) -> Option<String> {
    platform_suffix(os, arch).map(|suffix| format!("{}-{}", config.url_root(), suffix))
}

/// URL of the buildable source archive (no platform suffix).
pub fn source_url(config: &ToolConfig) -> String {
    format!("{}.tar.gz", config.url_root())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ToolConfig {
        ToolConfig::default()
    }

    #[test]
    fn test_supported_pairs_resolve_expected_suffix() {
        let cases = [
            ("windows", "x86_64", "-win64-x64.zip"),
            ("windows", "x86", "-win32-x86.zip"),
            ("macos", "x86_64", "-Darwin-x86_64.tar.gz"),
            ("linux", "x86_64", "-Linux-x86_64.tar.gz"),
        ];

        for (os, arch, suffix) in cases {
            let url = resolve_distribution_url(os, arch, &config())
                .unwrap_or_else(|| panic!("{os}/{arch} should resolve"));
            assert!(
                url.ends_with(suffix),
                "{os}/{arch} resolved to {url}, expected suffix {suffix}"
            );
            assert!(url.starts_with("https://cmake.org/files/v3.24/cmake-3.24.2"));
        }
    }

    #[test]
    fn test_unsupported_pairs_resolve_none() {
        let cases = [
            ("linux", "aarch64"),
            ("linux", "x86"),
            ("macos", "aarch64"),
            ("windows", "aarch64"),
            ("freebsd", "x86_64"),
            ("solaris", "sparc64"),
        ];

        for (os, arch) in cases {
            assert!(
                resolve_distribution_url(os, arch, &config()).is_none(),
                "{os}/{arch} should not resolve"
            );
        }
    }

    #[test]
    fn test_source_url_has_no_platform_suffix() {
        assert_eq!(
            source_url(&config()),
            "https://cmake.org/files/v3.24/cmake-3.24.2.tar.gz"
        );
    }
}

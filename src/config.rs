//! Version constants and install locations.
//!
//! The shipped CMake release is fixed at build time; bumping the two version
//! constants is the sole upgrade mechanism. The constants travel in a
//! [`ToolConfig`] that is injected into the resolver, installer, and
//! pipeline rather than read as ambient globals, so tests can substitute
//! alternate versions and a mock download host.

use std::path::PathBuf;

/// Upstream host for release archives, which live under `<base>/v<major>/`.
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://cmake.org/files";

/// Names the `share/cmake-<major>` support directory.
pub const MAJOR_VERSION: &str = "3.24";

/// Names the distribution archives.
pub const FULL_VERSION: &str = "3.24.2";

/// Which CMake release to fetch and where distribution archives are hosted.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub major_version: String,
    pub full_version: String,
    pub download_base: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            major_version: MAJOR_VERSION.to_string(),
            full_version: FULL_VERSION.to_string(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
        }
    }
}

impl ToolConfig {
    /// The URL stem all distribution archives share:
    /// `<base>/v<major>/cmake-<full>`.
    pub fn url_root(&self) -> String {
        format!(
            "{}/v{}/cmake-{}",
            self.download_base, self.major_version, self.full_version
        )
    }

    /// Version-qualified support directory name, e.g. `cmake-3.24`.
    pub fn share_dir(&self) -> String {
        format!("cmake-{}", self.major_version)
    }
}

/// Default installation prefix.
///
/// `CMAKE_BINARIES_ROOT` wins when set; otherwise a `cmake-binaries`
/// directory under the platform's per-user data dir.
pub fn default_install_root() -> PathBuf {
    if let Ok(path) = std::env::var("CMAKE_BINARIES_ROOT") {
        return PathBuf::from(path);
    }

    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cmake-binaries")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_root() {
        let config = ToolConfig::default();
        assert_eq!(
            config.url_root(),
            "https://cmake.org/files/v3.24/cmake-3.24.2"
        );
    }

    #[test]
    fn test_share_dir_uses_major_version() {
        let config = ToolConfig::default();
        assert_eq!(config.share_dir(), "cmake-3.24");
    }

    #[test]
    fn test_alternate_versions_flow_through() {
        let config = ToolConfig {
            major_version: "4.0".to_string(),
            full_version: "4.0.1".to_string(),
            download_base: "http://localhost:8080/files".to_string(),
        };
        assert_eq!(config.url_root(), "http://localhost:8080/files/v4.0/cmake-4.0.1");
        assert_eq!(config.share_dir(), "cmake-4.0");
    }
}

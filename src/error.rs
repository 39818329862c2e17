//! Error taxonomy for the acquisition and installation pipeline.
//!
//! None of these are recovered automatically; they propagate to the entry
//! point, which prints the message and exits non-zero. The only recoverable
//! condition, "tool already installed", is a normal skip, not an error.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures the install pipeline can produce.
#[derive(Debug, Error)]
pub enum InstallError {
    /// No binary distribution exists for this host and it cannot build from
    /// source either (Windows has no configure/make toolchain).
    #[error("CPU architecture {arch} is not supported for compiling on {os}")]
    UnsupportedPlatform { os: String, arch: String },

    /// Connection failure, non-2xx status, or interrupted stream. Not
    /// retried; the partial download is removed before this propagates.
    #[error("download failed for {url}: {reason}")]
    Network { url: String, reason: String },

    /// The expected root folder was missing after a full extraction. Carries
    /// the attempted path to aid diagnosis.
    #[error("expected archive folder does not exist: {}", path.display())]
    ArchiveIntegrity { path: PathBuf },

    /// The archive could not be decoded.
    #[error("archive error: {0}")]
    Archive(String),

    /// configure or make exited non-zero. The step's own inherited-stream
    /// output is the primary diagnostic.
    #[error("{step} failed with exit code {code:?}")]
    Build { step: &'static str, code: Option<i32> },

    /// Copy, permission, or mkdir failure during extraction or install.
    #[error("{context}: {source}")]
    Filesystem {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    /// Wrap an I/O failure with the operation that produced it.
    pub(crate) fn fs(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Filesystem {
            context: context.into(),
            source,
        }
    }
}

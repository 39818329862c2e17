//! Ensures CMake and CPack are available for a project.
//!
//! The crate resolves the binary distribution URL for the host platform,
//! downloads the archive, extracts only the files CMake needs at run time
//! (the `cmake`/`cpack` executables plus the versioned `Modules` and
//! `Templates` trees), and installs them into a local prefix. When no
//! prebuilt binary exists for the host, it falls back to downloading the
//! source archive and building it with `./configure && make`.
//!
//! Three binaries ship with the library:
//!
//! - `cmake-install`: the install entry point (`--force`, `--compile`,
//!   `--prefix`)
//! - `cmake` / `cpack`: thin wrappers that locate the installed executable
//!   and forward all arguments verbatim, propagating the child's exit status
//!
//! # Example
//!
//! ```no_run
//! use cmake_binaries::{config, pipeline, ToolConfig};
//!
//! let root = config::default_install_root();
//! let options = pipeline::InstallOptions::default();
//! pipeline::install(&root, options, &ToolConfig::default())?;
//!
//! assert!(cmake_binaries::exists(&root));
//! # Ok::<(), cmake_binaries::InstallError>(())
//! ```
//!
//! Installed layout under the prefix:
//!
//! ```text
//! bin/cmake[.exe]
//! bin/cpack[.exe]
//! share/cmake-<major>/Modules/**
//! share/cmake-<major>/Templates/**
//! ```
//!
//! Reinstalls overwrite the previous installation in place. Concurrent
//! installs against the same prefix are not serialized; callers that need
//! that must lock externally.

pub mod build;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod install;
pub mod locate;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod run;

pub use config::ToolConfig;
pub use error::InstallError;
pub use locate::{exists, get_command, locate, Located, Location};
pub use pipeline::{InstallOptions, InstallOutcome};

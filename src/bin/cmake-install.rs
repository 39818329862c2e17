//! CMake install entry point.
//!
//! Usage:
//!   cmake-install                 Install unless cmake already exists
//!   cmake-install --force         Reinstall even if cmake exists
//!   cmake-install --compile       Build from source even if a binary exists
//!   cmake-install --prefix <dir>  Install somewhere other than the default

use anyhow::Result;
use clap::Parser;
use cmake_binaries::{config, output, pipeline, ToolConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cmake-install")]
#[command(about = "Download and install CMake/CPack into a local prefix")]
#[command(version)]
struct Cli {
    /// Reinstall even if cmake already exists in PATH or the local prefix
    #[arg(long)]
    force: bool,

    /// Build from source even if a prebuilt binary exists for this platform
    #[arg(long)]
    compile: bool,

    /// Installation prefix
    #[arg(short, long, env = "CMAKE_BINARIES_ROOT")]
    prefix: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let prefix = cli.prefix.unwrap_or_else(config::default_install_root);
    let options = pipeline::InstallOptions {
        force: cli.force,
        compile: cli.compile,
    };

    pipeline::install(&prefix, options, &ToolConfig::default())?;
    Ok(())
}

//! `cpack` wrapper: locates the installed executable and forwards all
//! arguments verbatim, propagating the child's exit status.

use cmake_binaries::{config, output, run};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let root = config::default_install_root();

    match run::run_tool(&root, "cpack", &args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::error(&format!("failed to run cpack: {e}"));
            std::process::exit(1);
        }
    }
}

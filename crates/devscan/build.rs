use std::path::Path;

use clap::CommandFactory;

// cli.rs only depends on clap + clap_complete, both build-dependencies.
#[path = "src/cli.rs"]
#[allow(dead_code)]
mod cli;

/// Man pages for `devscan` and each subcommand land in `$OUT_DIR/man`.
fn main() -> std::io::Result<()> {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let Some(out_dir) = std::env::var_os("OUT_DIR") else {
        return Ok(());
    };
    let man_dir = Path::new(&out_dir).join("man");
    std::fs::create_dir_all(&man_dir)?;
    clap_mangen::generate_to(cli::Cli::command(), &man_dir)
}

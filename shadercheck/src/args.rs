use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// Path to the TOML file listing the programs to check
    pub config_path: PathBuf,
    /// Only check the programs with these names
    #[arg(long)]
    pub only: Vec<String>,
    /// Requested OpenGL core profile major version
    #[arg(long, default_value_t = 3)]
    pub gl_major: u8,
    /// Requested OpenGL core profile minor version
    #[arg(long, default_value_t = 3)]
    pub gl_minor: u8,
}

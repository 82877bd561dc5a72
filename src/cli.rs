use clap::Parser;
use std::path::PathBuf;

use crate::generate::RequireMethod;

#[derive(Debug, Clone, Parser)]
#[command(name = "autoload-gen")]
#[command(about = "Generate a PHP class autoloader with support for functions and constants")]
pub struct Cli {
    /// Path of the generated autoload file
    pub outfile: PathBuf,

    /// Files and directories to scan; defaults to the output file's directory
    pub files: Vec<PathBuf>,

    /// Exclude a file or directory (repeatable)
    #[arg(long, value_name = "PATH")]
    pub exclude: Vec<PathBuf>,

    /// Inclusion statement emitted in the artifact
    #[arg(long, value_enum, value_name = "METHOD", default_value_t = RequireMethod::RequireOnce)]
    pub require_method: RequireMethod,

    /// Autoload classes case-insensitively; costs a strtolower() per lookup
    #[arg(long)]
    pub case_insensitive: bool,

    /// Register the autoloader ahead of previously registered ones
    #[arg(long)]
    pub prepend: bool,

    /// Always scan fresh; never read or write the scan cache
    #[arg(long)]
    pub no_cache: bool,

    /// Scan cache location; defaults to .autoload-gen.cache next to the output file
    #[arg(long, value_name = "FILE")]
    pub cache_path: Option<PathBuf>,
}

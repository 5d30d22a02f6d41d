//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser};

/// tsrefs - keep TypeScript project references in sync with workspace dependencies
#[derive(Parser, Debug)]
#[command(name = "tsrefs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub sync: SyncArgs,
}

/// Options of a synchronization run
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncArgs {
    /// Monorepo root (defaults to the current directory)
    #[arg(long, value_name = "PATH", env = "TSREFS_ROOT")]
    pub root: Option<PathBuf>,

    /// Verify references without writing; exit 1 on drift
    #[arg(long)]
    pub check: bool,

    /// Package manager plugin: built-in name or manifest path (repeatable)
    #[arg(long = "plugin", value_name = "NAME|PATH")]
    pub plugins: Vec<String>,

    /// tsconfig file name inside each package
    #[arg(long, value_name = "FILE")]
    pub tsconfig_path: Option<String>,

    /// Write tsconfig files without comments
    #[arg(long)]
    pub remove_comments: bool,

    /// Indentation width of written files
    #[arg(long, value_name = "N")]
    pub indentation: Option<usize>,

    /// Only process packages below this directory
    #[arg(long, value_name = "PATH")]
    pub only_on_path: Option<PathBuf>,

    /// Only process this package and its direct workspace dependencies (repeatable)
    #[arg(long = "package", value_name = "NAME")]
    pub packages: Vec<String>,

    /// Append a pattern to "include" (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub add_include: Vec<String>,

    /// Set compilerOptions.rootDir
    #[arg(long, value_name = "DIR")]
    pub add_root_dir: Option<String>,

    /// Set "extends" to this tsconfig
    #[arg(long, value_name = "PATH")]
    pub add_extends: Option<PathBuf>,

    /// Set compilerOptions.composite to true
    #[arg(long)]
    pub add_composite: bool,

    /// Generate an ES-module tsconfig next to each tsconfig
    #[arg(long)]
    pub add_esm_tsconfig: bool,

    /// File name of the generated ES-module tsconfig (implies --add-esm-tsconfig)
    #[arg(long, value_name = "FILE")]
    pub esm_tsconfig_path: Option<String>,
}

impl SyncArgs {
    pub fn wants_esm(&self) -> bool {
        self.add_esm_tsconfig || self.esm_tsconfig_path.is_some()
    }
}

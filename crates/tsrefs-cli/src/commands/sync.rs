//! Sync and check command implementation

use std::path::Path;

use colored::Colorize;

use tsrefs_core::config::ProjectConfig;
use tsrefs_core::{EsmOptions, PluginRegistry, SyncEngine, SyncOptions, SyncOptionsBuilder};
use tsrefs_fs::NormalizedPath;

use crate::cli::SyncArgs;
use crate::error::{CliError, Result};

/// Run a synchronization from the command line.
///
/// Paths on the command line are resolved against `cwd`. The project config
/// file at the root seeds the options; command-line values override it.
pub fn run_sync(cwd: &Path, args: &SyncArgs) -> Result<()> {
    let cwd = NormalizedPath::new(cwd);
    let root = match &args.root {
        Some(root) => cwd.resolve(root),
        None => cwd.clone(),
    };
    let root = root.canonicalize()?;

    let config = ProjectConfig::discover(&root)?.map(|(path, config)| {
        tracing::debug!(%path, "using project config");
        config
    });

    let registry = if args.plugins.is_empty() {
        let specs = config.as_ref().map(|c| c.plugins.clone()).unwrap_or_default();
        PluginRegistry::from_specs(&specs, &root)?
    } else {
        PluginRegistry::from_specs(&args.plugins, &cwd)?
    };

    let mut builder = SyncOptions::builder(root.clone());
    if let Some(config) = &config {
        builder = config.apply(&root, builder);
    }
    let builder = apply_args(&cwd, args, config.as_ref(), builder);
    let options = builder.build()?;
    let check_only = options.check_only();

    let report = SyncEngine::new(options, &registry).run()?;

    if check_only {
        if report.success {
            return Ok(());
        }
        for error in &report.errors {
            eprintln!("{error}");
        }
        return Err(CliError::user(format!(
            "{} tsconfig file(s) out of date; run {} to update them",
            report.errors.len(),
            "tsrefs".cyan()
        )));
    }

    println!("{}", "Update Project References!".green().bold());
    for action in &report.actions {
        println!("  {} {}", "=>".blue().bold(), action);
    }
    Ok(())
}

/// Layer command-line values over `builder`.
fn apply_args(
    cwd: &NormalizedPath,
    args: &SyncArgs,
    config: Option<&ProjectConfig>,
    mut builder: SyncOptionsBuilder,
) -> SyncOptionsBuilder {
    if args.check {
        builder = builder.check_only(true);
    }
    if !args.packages.is_empty() {
        builder = builder.only_packages(args.packages.iter().cloned());
    }
    if let Some(path) = &args.only_on_path {
        builder = builder.only_on_path(cwd.resolve(path));
    }
    if let Some(path) = &args.tsconfig_path {
        builder = builder.tsconfig_path(path);
    }
    if args.remove_comments {
        builder = builder.remove_comments(true);
    }
    if let Some(indentation) = args.indentation {
        builder = builder.indentation(indentation);
    }
    if !args.add_include.is_empty() {
        builder = builder.add_include(args.add_include.iter().cloned());
    }
    if let Some(root_dir) = &args.add_root_dir {
        builder = builder.add_root_dir(root_dir);
    }
    if let Some(extends) = &args.add_extends {
        builder = builder.add_extends(cwd.resolve(extends));
    }
    if args.add_composite {
        builder = builder.add_composite(true);
    }
    if args.wants_esm() {
        let mut esm = config
            .and_then(|c| c.esm.as_ref())
            .and_then(|section| section.to_options())
            .unwrap_or_else(EsmOptions::default);
        if let Some(file_name) = &args.esm_tsconfig_path {
            esm.file_name = file_name.clone();
        }
        builder = builder.esm(Some(esm));
    }
    builder
}

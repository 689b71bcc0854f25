//! Command handlers.
//!
//! Each submodule translates parsed CLI arguments into a core request,
//! wires the local adapters, and renders the result. No binding logic
//! lives here.

use std::path::{Path, PathBuf};

use cxxbind_adapters::{ClangAstDumper, LocalFilesystem, LocalSourceTree};
use cxxbind_core::application::GenerateService;

use crate::config::AppConfig;

pub mod completions;
pub mod generate;
pub mod inspect;

/// Source tree root: explicit flag, then config, then the header's own
/// directory (external enum searches degrade gracefully either way).
fn resolve_source_root(
    flag: Option<&PathBuf>,
    config: &AppConfig,
    header: &Path,
) -> PathBuf {
    flag.cloned()
        .or_else(|| config.generate.source_root.clone())
        .or_else(|| header.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Compiler candidates: explicit flags win over config; an empty list
/// leaves the adapter's built-in defaults in place.
fn resolve_compilers(flags: &[String], config: &AppConfig) -> Vec<String> {
    if flags.is_empty() {
        config.compiler.binaries.clone()
    } else {
        flags.to_vec()
    }
}

/// Ignore list: config entries plus per-invocation flags.
fn resolve_ignore(flags: &[String], config: &AppConfig) -> Vec<String> {
    let mut ignore = config.generate.ignore.clone();
    ignore.extend(flags.iter().cloned());
    ignore
}

/// Wire the clang dumper, header search, and local filesystem into a
/// generation service.
fn build_service(
    source_root: &Path,
    compilers: Vec<String>,
    dialect: Option<&str>,
    config: &AppConfig,
) -> GenerateService {
    let dialect = dialect.unwrap_or(&config.compiler.dialect);
    let dumper = ClangAstDumper::new(source_root)
        .with_binaries(compilers)
        .with_dialect(dialect);
    GenerateService::new(
        Box::new(dumper),
        Box::new(LocalSourceTree::new(source_root)),
        Box::new(LocalFilesystem::new()),
    )
}

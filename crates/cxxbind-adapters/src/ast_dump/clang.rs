//! Clang-based AST dumper.
//!
//! Invokes an external clang front end with `-ast-dump=json`, trying a short
//! ordered list of candidate binaries; the first invocation that exits zero
//! with parsable output wins. Every failure mode (binary missing, non-zero
//! exit, oversized or unparsable output) yields `None` so callers can move
//! to the next strategy.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, trace, warn};

use cxxbind_core::application::ports::AstDumper;
use cxxbind_core::domain::ast::{AstNode, parse_dump};

/// Output larger than this is treated as "no result" rather than parsed.
const MAX_OUTPUT_BYTES: usize = 256 * 1024 * 1024;

/// Production AST dumper shelling out to clang.
#[derive(Debug, Clone)]
pub struct ClangAstDumper {
    binaries: Vec<String>,
    include_root: PathBuf,
    std_dialect: String,
}

impl ClangAstDumper {
    /// Dumper with the default binary candidates (`clang++`, then `clang`)
    /// and the given include root.
    pub fn new(include_root: impl Into<PathBuf>) -> Self {
        Self {
            binaries: vec!["clang++".to_string(), "clang".to_string()],
            include_root: include_root.into(),
            std_dialect: "c++17".to_string(),
        }
    }

    /// Replace the candidate binary list (tried in order).
    pub fn with_binaries(mut self, binaries: Vec<String>) -> Self {
        if !binaries.is_empty() {
            self.binaries = binaries;
        }
        self
    }

    /// Replace the language dialect passed via `-std=`.
    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.std_dialect = dialect.into();
        self
    }

    fn invoke(&self, file: &Path, filter: Option<&str>) -> Option<AstNode> {
        for binary in &self.binaries {
            let mut cmd = Command::new(binary);
            cmd.arg("-x")
                .arg("c++")
                .arg(format!("-std={}", self.std_dialect))
                .arg("-fsyntax-only")
                .arg("-I")
                .arg(&self.include_root)
                .arg("-Xclang")
                .arg("-ast-dump=json");
            if let Some(filter) = filter {
                cmd.arg("-Xclang")
                    .arg("-ast-dump-filter")
                    .arg("-Xclang")
                    .arg(filter);
            }
            cmd.arg(file);

            trace!(binary, file = %file.display(), ?filter, "invoking compiler");
            let output = match cmd.output() {
                Ok(output) => output,
                Err(e) => {
                    debug!(binary, error = %e, "compiler candidate unavailable");
                    continue;
                }
            };
            if !output.status.success() {
                debug!(binary, status = ?output.status.code(), "compiler exited non-zero");
                continue;
            }
            if output.stdout.len() > MAX_OUTPUT_BYTES {
                warn!(binary, bytes = output.stdout.len(), "dump output exceeds cap, discarding");
                continue;
            }

            let stdout = String::from_utf8_lossy(&output.stdout);
            if let Some(ast) = parse_dump(&stdout) {
                return Some(ast);
            }
            debug!(binary, "dump output unparsable");
        }
        None
    }
}

impl AstDumper for ClangAstDumper {
    fn dump_file<'a>(&self, file: &Path, filter: Option<&'a str>) -> Option<AstNode> {
        self.invoke(file, filter)
    }

    fn dump_source<'a>(&self, source: &str, filter: Option<&'a str>) -> Option<AstNode> {
        // The temp dir is removed on drop, success or failure.
        let dir = tempfile::tempdir()
            .map_err(|e| warn!(error = %e, "could not create probe directory"))
            .ok()?;
        let probe = dir.path().join("probe.cpp");
        std::fs::write(&probe, source)
            .map_err(|e| warn!(error = %e, "could not write probe source"))
            .ok()?;
        self.invoke(&probe, filter)
    }
}

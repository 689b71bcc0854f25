//! Driven ports (traits) the application services depend on.
//!
//! The core defines the capabilities it needs; `cxxbind-adapters` provides
//! the implementations (clang invocation, walkdir search, std::fs writes).

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::domain::ast::AstNode;
use crate::error::CxxbindResult;

/// Produces syntax trees by invoking an external compiler front end.
///
/// Both operations return `Option` rather than `Result`: a missing tool, a
/// non-zero exit, or unparsable output all mean "no AST", which callers are
/// expected to handle by trying another strategy (a different compiler
/// binary, a different candidate header) before giving up.
#[cfg_attr(test, automock)]
pub trait AstDumper: Send + Sync {
    /// Dump a source file on disk, optionally restricted to declarations
    /// whose name matches `filter`.
    fn dump_file<'a>(&self, file: &Path, filter: Option<&'a str>) -> Option<AstNode>;

    /// Dump a synthesized translation unit given as a source string.
    fn dump_source<'a>(&self, source: &str, filter: Option<&'a str>) -> Option<AstNode>;
}

/// Read-only view of the library source tree searched during external enum
/// resolution.
#[cfg_attr(test, automock)]
pub trait SourceTree: Send + Sync {
    /// Header files that contain `word` as a whole word *and* the literal
    /// substring `enum`, ordered shortest-path-first.
    fn candidate_headers(&self, word: &str) -> Vec<PathBuf>;

    /// Root the include path is anchored at.
    fn root(&self) -> PathBuf;
}

/// Filesystem operations for writing generated artifacts.
#[cfg_attr(test, automock)]
pub trait Filesystem: Send + Sync {
    /// Write `content` to `path`, overwriting any existing file and
    /// creating parent directories as needed.
    fn write_file(&self, path: &Path, content: &str) -> CxxbindResult<()>;

    fn exists(&self, path: &Path) -> bool;
}

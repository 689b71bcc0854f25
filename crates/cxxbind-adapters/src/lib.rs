//! Infrastructure adapters for cxxbind.
//!
//! This crate implements the ports defined in `cxxbind-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod ast_dump;
pub mod filesystem;
pub mod source_tree;

// Re-export commonly used adapters
pub use ast_dump::ClangAstDumper;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use source_tree::LocalSourceTree;

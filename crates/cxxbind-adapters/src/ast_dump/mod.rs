//! Syntax-tree acquisition adapters.

pub mod clang;

pub use clang::ClangAstDumper;

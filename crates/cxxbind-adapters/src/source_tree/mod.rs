//! Source-tree search adapters.

pub mod local;

pub use local::LocalSourceTree;

//! Cxxbind Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the cxxbind
//! binding generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           cxxbind-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerateService, ResolveService)      │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Driven: AstDumper, SourceTree, Fs)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    cxxbind-adapters (Infrastructure)    │
//! │ (ClangAstDumper, LocalSourceTree, etc)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Domain Layer (Pure Logic)         │
//! │  (AstNode, Method, EnumDefinition,      │
//! │   MethodGroup, TypeClass)               │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cxxbind_core::application::{GenerateRequest, GenerateService};
//!
//! // Wire the service with injected adapters, then run generation.
//! let service = GenerateService::new(dumper, tree, filesystem);
//! let summary = service.generate(&request)?;
//! println!("bound {} methods", summary.methods);
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Artifact rendering
pub mod codegen;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateRequest, GenerateService, GenerationSummary, Resolution, ResolveService,
        ports::{AstDumper, Filesystem, SourceTree},
    };
    pub use crate::domain::{
        AstNode, DefaultValue, DefinitionSet, DocComment, DomainError, EnumDefinition, EnumMember,
        FlagDefinition, Method, MethodGroup, Param, TypeClass, build_method_groups, camel_name,
        parse_dump, snake_name,
    };
    pub use crate::error::{CxxbindError, CxxbindResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

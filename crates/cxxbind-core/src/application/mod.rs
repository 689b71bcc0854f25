//! Application layer: use-case orchestration over the domain model.
//!
//! Services coordinate the pipeline (acquire tree, extract, resolve,
//! generate) and talk to the outside world exclusively through the port
//! traits in [`ports`].

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::{AstDumper, Filesystem, SourceTree};
pub use services::extract_service;
pub use services::generate_service::{
    GenerateRequest, GenerateService, GenerationSummary, InspectReport,
};
pub use services::resolve_service::{Resolution, ResolveService};

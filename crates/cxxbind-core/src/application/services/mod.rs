//! Pipeline services.

pub mod extract_service;
pub mod generate_service;
pub mod resolve_service;

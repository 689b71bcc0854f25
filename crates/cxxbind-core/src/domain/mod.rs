//! Domain layer: the pure model of the reflected C++ surface.
//!
//! Nothing here performs I/O. The syntax tree arrives through the
//! application ports; everything in this module is a value type or a pure
//! function over those values, testable in isolation.

pub mod ast;
pub mod classify;
pub mod enums;
pub mod error;
pub mod keys;
pub mod method;
pub mod naming;

pub use ast::{AstNode, parse_dump};
pub use classify::{TypeClass, classify, classify_return, looks_enum_like, strip_qualifiers};
pub use enums::{DefinitionSet, EnumDefinition, EnumMember, FlagDefinition};
pub use error::DomainError;
pub use keys::{arity_key, normalize_type, signature_key};
pub use method::{DefaultValue, DocComment, Method, Param};
pub use naming::{MethodGroup, build_method_groups, camel_name, snake_name};

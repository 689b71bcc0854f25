//! Domain-level errors: contract violations in the extracted model.

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (callers may retry with another strategy)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// The target class declaration was not found in the AST. Fatal: the
    /// whole generation run cannot proceed without the class.
    #[error("class '{class}' not found in the syntax tree")]
    ClassNotFound { class: String },

    /// Two distinct original identifiers normalize to the same target name.
    /// Fatal: silently merging or dropping one would silently change the
    /// public surface.
    #[error(
        "methods '{first}' and '{second}' both normalize to '{camel_name}'"
    )]
    NameCollision {
        camel_name: String,
        first: String,
        second: String,
    },

    /// The parsed tree had a shape the extractor cannot interpret.
    #[error("malformed syntax tree: {0}")]
    MalformedAst(String),
}

impl DomainError {
    /// User-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ClassNotFound { class } => vec![
                format!("No complete definition of '{}' was found in the header", class),
                "Check the class name spelling (it is case-sensitive)".into(),
                "Check that the header path points at the declaration, not a forward declaration"
                    .into(),
            ],
            Self::NameCollision {
                camel_name,
                first,
                second,
            } => vec![
                format!(
                    "'{}' and '{}' both map to the generated name '{}'",
                    first, second, camel_name
                ),
                "Add one of the two methods to the ignore list".into(),
                "Rename one of the methods in the C++ header".into(),
            ],
            Self::MalformedAst(msg) => vec![
                format!("The compiler produced a tree the extractor cannot read: {}", msg),
                "Re-run with -vv to see the dump invocation".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ClassNotFound { .. } => ErrorCategory::NotFound,
            Self::NameCollision { .. } => ErrorCategory::Validation,
            Self::MalformedAst(_) => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_not_found_suggests_spelling_check() {
        let err = DomainError::ClassNotFound {
            class: "Engine".into(),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("case-sensitive")));
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn name_collision_names_both_methods() {
        let err = DomainError::NameCollision {
            camel_name: "foo".into(),
            first: "Foo".into(),
            second: "foo".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Foo") && msg.contains("foo"));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}

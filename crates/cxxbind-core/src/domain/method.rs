//! Extracted method surface: methods, parameters, defaults, documentation.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::keys;

/// A default value that can be losslessly rendered as a literal in the
/// target language.
///
/// Anything that does not fit one of these shapes is dropped during
/// extraction and the parameter becomes required.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl DefaultValue {
    /// Render as a target-language (TypeScript) literal.
    pub fn render(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::UInt(u) => u.to_string(),
            Self::Float(f) => {
                // Keep a decimal point so the literal reads as floating.
                let s = f.to_string();
                if s.contains('.') || s.contains('e') || s.contains("inf") || s.contains("NaN") {
                    s
                } else {
                    format!("{s}.0")
                }
            }
            Self::Str(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// One formal parameter of an extracted method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    /// Unique (possibly synthesized) parameter name.
    pub name: String,
    /// Canonical C++ type spelling, qualifiers and pointer/reference
    /// markers preserved.
    pub ty: String,
    /// Literal default, or `None` when the parameter is required.
    pub default: Option<DefaultValue>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// Parsed documentation comment attached to a method.
///
/// Parameter text is kept under both the parameter name and the positional
/// index clang resolved; the index wins when both exist for a lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocComment {
    /// Free-text description lines, in source order.
    pub description: Vec<String>,
    /// Per-parameter text keyed by declared name.
    pub params_by_name: HashMap<String, String>,
    /// Per-parameter text keyed by positional index.
    pub params_by_index: HashMap<usize, String>,
    /// Return-value description, if documented.
    pub returns: Option<String>,
}

impl DocComment {
    /// Text for the parameter at `index` named `name`; index takes
    /// precedence when both keys exist.
    pub fn param_text(&self, index: usize, name: &str) -> Option<&str> {
        self.params_by_index
            .get(&index)
            .or_else(|| self.params_by_name.get(name))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.params_by_name.is_empty()
            && self.params_by_index.is_empty()
            && self.returns.is_none()
    }
}

/// An extracted public member function.
///
/// Constructors, destructors, and members with unrecoverable return types
/// never become `Method`s; parameter names are unique within a method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    /// Original declared identifier.
    pub name: String,
    /// Canonical return type spelling.
    pub return_type: String,
    /// Ordered formal parameters.
    pub params: Vec<Param>,
    /// Parsed documentation comment.
    pub doc: DocComment,
}

impl Method {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            params: Vec::new(),
            doc: DocComment::default(),
        }
    }

    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    /// Exact identity across independently parsed ASTs: name + normalized
    /// parameter types.
    pub fn signature_key(&self) -> String {
        keys::signature_key(&self.name, self.params.iter().map(|p| p.ty.as_str()))
    }

    /// Fuzzy identity: name + arity. Fallback when type spellings differ
    /// between two parses of the same logical method.
    pub fn arity_key(&self) -> String {
        keys::arity_key(&self.name, self.params.len())
    }

    /// Index of the first trailing defaulted parameter; equals the number
    /// of required arguments.
    pub fn min_args(&self) -> usize {
        let mut min = self.params.len();
        for param in self.params.iter().rev() {
            if param.default.is_some() {
                min -= 1;
            } else {
                break;
            }
        }
        min
    }

    /// Total parameter count.
    pub fn max_args(&self) -> usize {
        self.params.len()
    }
}

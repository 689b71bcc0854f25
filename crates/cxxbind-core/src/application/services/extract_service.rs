//! Class & method extraction.
//!
//! Locates the target class in a parsed syntax tree and recovers its public,
//! non-special member functions: name, return type, parameters with default
//! literals, and parsed documentation.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::domain::ast::AstNode;
use crate::domain::classify::{self, TypeClass};
use crate::domain::error::DomainError;
use crate::domain::method::{DefaultValue, DocComment, Method, Param};

/// Access region of a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
    Private,
}

/// Locate the unique complete definition of `class_name`.
///
/// # Errors
///
/// [`DomainError::ClassNotFound`] when the tree holds no complete record
/// definition with that name — fatal, the run cannot proceed without it.
pub fn locate_class<'a>(ast: &'a AstNode, class_name: &str) -> Result<&'a AstNode, DomainError> {
    ast.find_first(&|node| {
        node.kind == "CXXRecordDecl"
            && node.name_or_empty() == class_name
            && node.complete_definition
    })
    .ok_or_else(|| DomainError::ClassNotFound {
        class: class_name.to_string(),
    })
}

/// Direct members of a class body paired with the access region active at
/// their declaration. Classes start private; an access-specifier marker
/// flips the tracked state on sight and is not itself yielded.
pub fn members_with_access(class_node: &AstNode) -> Vec<(Access, &AstNode)> {
    let mut access = Access::Private;
    let mut members = Vec::new();

    for child in &class_node.inner {
        if child.kind == "AccessSpecDecl" {
            access = match child.access.as_deref() {
                Some("public") => Access::Public,
                Some("protected") => Access::Protected,
                _ => Access::Private,
            };
            continue;
        }
        // The record's implicit self-reference child carries the class name
        // but no members.
        if child.is_implicit {
            continue;
        }
        members.push((access, child));
    }

    members
}

/// Extract every public, non-special member function of the class, in
/// declaration order.
///
/// Constructors, destructors, operators, statics, and compiler-generated
/// members are never extracted. A method whose return type cannot be
/// recovered is skipped silently — it cannot be represented, and that is
/// not a fatal condition.
#[instrument(skip_all, fields(class = class_node.name_or_empty()))]
pub fn extract_methods(class_node: &AstNode) -> Vec<Method> {
    let mut methods = Vec::new();

    for (access, member) in members_with_access(class_node) {
        if access != Access::Public || member.kind != "CXXMethodDecl" {
            continue;
        }
        if member.storage_class.as_deref() == Some("static") {
            continue;
        }
        let name = member.name_or_empty();
        if name.is_empty() || name.starts_with("operator") {
            continue;
        }

        let Some(return_type) = slice_return_type(member.qual_type().unwrap_or("")) else {
            warn!(method = name, "skipping method with unrecoverable return type");
            continue;
        };

        let params = extract_params(member);
        let doc = parse_doc_comment(member);

        debug!(method = name, params = params.len(), "extracted method");
        methods.push(Method {
            name: name.to_string(),
            return_type,
            params,
            doc,
        });
    }

    methods
}

/// Slice the return type off a function's full type signature: everything
/// before the first parameter-list `(` that is not nested inside template
/// angle brackets.
fn slice_return_type(signature: &str) -> Option<String> {
    let mut angle_depth = 0usize;
    for (idx, ch) in signature.char_indices() {
        match ch {
            '<' => angle_depth += 1,
            '>' => angle_depth = angle_depth.saturating_sub(1),
            '(' if angle_depth == 0 => {
                let ret = signature[..idx].trim();
                return if ret.is_empty() {
                    None
                } else {
                    Some(ret.to_string())
                };
            }
            _ => {}
        }
    }
    None
}

/// Extract parameters in order, synthesizing names for unnamed parameters
/// and suffixing duplicates so names are unique within the method.
fn extract_params(method_node: &AstNode) -> Vec<Param> {
    let mut params = Vec::new();
    let mut used: HashSet<String> = HashSet::new();

    for (idx, child) in method_node
        .inner
        .iter()
        .filter(|n| n.kind == "ParmVarDecl")
        .enumerate()
    {
        let base = match child.name.as_deref() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("arg{idx}"),
        };
        let mut name = base.clone();
        let mut suffix = 2;
        while !used.insert(name.clone()) {
            name = format!("{base}{suffix}");
            suffix += 1;
        }

        let ty = child.qual_type().unwrap_or("").to_string();
        let default = child
            .init
            .is_some()
            .then(|| child.inner.iter().find_map(|e| literal_default(e, &ty)))
            .flatten();

        params.push(Param { name, ty, default });
    }

    params
}

/// Expression wrapper kinds that carry no semantic content of their own.
const WRAPPER_KINDS: &[&str] = &[
    "ImplicitCastExpr",
    "MaterializeTemporaryExpr",
    "ExprWithCleanups",
    "ParenExpr",
    "CXXBindTemporaryExpr",
    "ConstantExpr",
    "CXXFunctionalCastExpr",
    "CXXStaticCastExpr",
];

/// Unwrap non-semantic wrapper layers down to a literal, if one is there.
///
/// Only literals reproducible in the target language are accepted: boolean,
/// integer, floating point (with unary sign folding), string. A
/// default-constructed temporary of a string/path type yields the empty
/// string. Anything else yields `None` and the parameter becomes required.
fn literal_default(expr: &AstNode, param_ty: &str) -> Option<DefaultValue> {
    match expr.kind.as_str() {
        kind if WRAPPER_KINDS.contains(&kind) => expr
            .inner
            .iter()
            .find_map(|child| literal_default(child, param_ty)),

        "CXXBoolLiteralExpr" => expr.value.as_ref()?.as_bool().map(DefaultValue::Bool),

        "IntegerLiteral" => {
            let raw = literal_text(expr)?;
            raw.parse::<i64>()
                .map(DefaultValue::Int)
                .or_else(|_| raw.parse::<u64>().map(DefaultValue::UInt))
                .ok()
        }

        "FloatingLiteral" => literal_text(expr)?.parse::<f64>().map(DefaultValue::Float).ok(),

        "StringLiteral" => {
            let raw = literal_text(expr)?;
            Some(DefaultValue::Str(unquote(&raw)))
        }

        "UnaryOperator" => {
            let negate = expr.opcode.as_deref() == Some("-");
            let inner = expr
                .inner
                .iter()
                .find_map(|child| literal_default(child, param_ty))?;
            match (negate, inner) {
                (true, DefaultValue::Int(v)) => Some(DefaultValue::Int(-v)),
                (true, DefaultValue::Float(v)) => Some(DefaultValue::Float(-v)),
                (true, DefaultValue::UInt(v)) => i64::try_from(v).ok().map(|v| DefaultValue::Int(-v)),
                (false, inner) if expr.opcode.as_deref() == Some("+") => Some(inner),
                _ => None,
            }
        }

        "CXXConstructExpr" | "CXXTemporaryObjectExpr" => {
            // A string default like `= "x"` reaches us as a construct
            // expression with the literal inside; a bare `= {}` or
            // `= std::string()` has no literal and means "empty".
            if let Some(lit) = expr
                .find_first(&|n| n.kind == "StringLiteral")
                .and_then(|n| literal_text(n))
            {
                return Some(DefaultValue::Str(unquote(&lit)));
            }
            match classify::classify(param_ty, |_| None) {
                TypeClass::Str | TypeClass::Path => Some(DefaultValue::Str(String::new())),
                _ => None,
            }
        }

        _ => None,
    }
}

fn literal_text(expr: &AstNode) -> Option<String> {
    match expr.value.as_ref()? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Strip the quotes clang keeps around string-literal spellings.
fn unquote(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    inner
        .replace("\\\"", "\"")
        .replace("\\n", "\n")
        .replace("\\t", "\t")
        .replace("\\\\", "\\")
}

/// Parse the documentation comment attached to a declaration into a
/// free-text description, per-parameter text (keyed by name and by
/// position), and a return description.
pub fn parse_doc_comment(decl: &AstNode) -> DocComment {
    let mut doc = DocComment::default();
    let Some(full) = decl.inner.iter().find(|n| n.kind == "FullComment") else {
        return doc;
    };

    for block in &full.inner {
        match block.kind.as_str() {
            "ParagraphComment" => {
                for line in paragraph_lines(block) {
                    doc.description.push(line);
                }
            }
            "ParamCommandComment" => {
                let text = paragraph_lines(block).join(" ");
                if let Some(idx) = block.param_idx {
                    doc.params_by_index.insert(idx, text.clone());
                }
                if let Some(name) = block.param.as_deref() {
                    doc.params_by_name.insert(name.to_string(), text);
                }
            }
            "BlockCommandComment" => {
                if matches!(block.name.as_deref(), Some("return" | "returns" | "result")) {
                    let text = paragraph_lines(block).join(" ");
                    if !text.is_empty() {
                        doc.returns = Some(text);
                    }
                }
            }
            _ => {}
        }
    }

    doc
}

fn paragraph_lines(node: &AstNode) -> Vec<String> {
    node.find_all(&|n| n.kind == "TextComment")
        .iter()
        .filter_map(|n| n.text.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ── tests ─────────────────────────────────────────────────────────────────────

//! Generic clang AST node model and dump parsing.
//!
//! The syntax tree we consume is produced by an external compiler front end
//! (`clang -ast-dump=json`) whose shape we do not control. Instead of one
//! type per node kind, everything is a single [`AstNode`] with a `kind`
//! discriminant and a homogeneous `inner` child list; traversal is a
//! pre-order walk over that tag.
//!
//! ## Dump normalization
//!
//! When the dump is filtered (`-ast-dump-filter`), clang emits one JSON
//! document *per matching top-level declaration*, concatenated on stdout.
//! [`parse_dump`] first attempts a whole-output parse and falls back to a
//! character scanner that splits the output into independent top-level
//! objects (tracking brace depth and string/escape state), wrapping multiple
//! documents in a synthetic document-set node so downstream traversal stays
//! uniform.

use serde::Deserialize;

/// Kind tag used for the synthetic wrapper around concatenated dumps.
pub const DOCUMENT_SET_KIND: &str = "AstDocumentSet";

/// One node of the externally produced syntax tree.
///
/// Fields cover the subset of clang's JSON shape the pipeline reads; unknown
/// fields are dropped at deserialization. Every field except `kind` is
/// optional because the dump omits anything that does not apply to a node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AstNode {
    /// Node discriminant, e.g. `CXXMethodDecl`, `EnumDecl`, `ParmVarDecl`.
    pub kind: String,

    /// Declared name, when the node is a named declaration.
    pub name: Option<String>,

    /// Type information (`"type": {"qualType": ...}`).
    #[serde(rename = "type")]
    pub ty: Option<TypeInfo>,

    /// Access of an `AccessSpecDecl` marker (`public` / `protected` / `private`).
    pub access: Option<String>,

    /// Compiler-generated declarations carry `"isImplicit": true`.
    #[serde(rename = "isImplicit")]
    pub is_implicit: bool,

    /// Set on the record node that carries the full class body.
    #[serde(rename = "completeDefinition")]
    pub complete_definition: bool,

    /// `static` members carry `"storageClass": "static"`.
    #[serde(rename = "storageClass")]
    pub storage_class: Option<String>,

    /// Marker that a `ParmVarDecl` or `VarDecl` has an initializer.
    pub init: Option<String>,

    /// Literal payload: a bool for `CXXBoolLiteralExpr`, a decimal string
    /// for `IntegerLiteral` / `FloatingLiteral` / `ConstantExpr`.
    pub value: Option<serde_json::Value>,

    /// Operator spelling of a `UnaryOperator` node.
    pub opcode: Option<String>,

    /// Cast discriminant of cast expressions (`NoOp`, `IntegralCast`, ...).
    #[serde(rename = "castKind")]
    pub cast_kind: Option<String>,

    /// Free text of a `TextComment` node.
    pub text: Option<String>,

    /// Parameter name of a `ParamCommandComment` node.
    pub param: Option<String>,

    /// Parameter index of a `ParamCommandComment` node, when clang resolved it.
    #[serde(rename = "paramIdx")]
    pub param_idx: Option<usize>,

    /// Declaration referenced by a `DeclRefExpr`.
    #[serde(rename = "referencedDecl")]
    pub referenced_decl: Option<Box<AstNode>>,

    /// Tag declaration owned by a `TypedefDecl` (`typedef enum {...} X;`).
    #[serde(rename = "ownedTagDecl")]
    pub owned_tag_decl: Option<Box<AstNode>>,

    /// Ordered child nodes.
    pub inner: Vec<AstNode>,
}

/// The `"type"` object attached to typed nodes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TypeInfo {
    #[serde(rename = "qualType")]
    pub qual_type: String,
}

impl AstNode {
    /// Fully qualified type spelling, if the node is typed.
    pub fn qual_type(&self) -> Option<&str> {
        self.ty.as_ref().map(|t| t.qual_type.as_str())
    }

    /// Declared name, or `""` for anonymous nodes.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Depth-first pre-order walk: a node is visited before its children,
    /// so callers observing containment (e.g. access regions) see
    /// outer-to-inner ordering.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a AstNode)) {
        visit(self);
        for child in &self.inner {
            child.walk(visit);
        }
    }

    /// Collect every node (pre-order) matching `pred`.
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&AstNode) -> bool) -> Vec<&'a AstNode> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if pred(node) {
                out.push(node);
            }
        });
        out
    }

    /// First node (pre-order) matching `pred`.
    pub fn find_first<'a>(&'a self, pred: &dyn Fn(&AstNode) -> bool) -> Option<&'a AstNode> {
        if pred(self) {
            return Some(self);
        }
        for child in &self.inner {
            if let Some(found) = child.find_first(pred) {
                return Some(found);
            }
        }
        None
    }

    /// Wrap multiple parsed documents in a synthetic document-set node.
    pub fn document_set(documents: Vec<AstNode>) -> AstNode {
        AstNode {
            kind: DOCUMENT_SET_KIND.to_string(),
            inner: documents,
            ..AstNode::default()
        }
    }
}

/// Parse raw dump output into a single logical tree.
///
/// Tries a whole-output JSON parse first; on failure, splits the output into
/// independent top-level objects and parses each. Returns `None` when the
/// output is unparsable under both strategies or contains no objects —
/// callers must treat "no AST" as an expected, handle-able outcome.
pub fn parse_dump(output: &str) -> Option<AstNode> {
    if let Ok(node) = serde_json::from_str::<AstNode>(output) {
        return Some(node);
    }

    let chunks = split_top_level_objects(output);
    let mut documents = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        match serde_json::from_str::<AstNode>(chunk) {
            Ok(node) => documents.push(node),
            Err(_) => return None,
        }
    }

    match documents.len() {
        0 => None,
        1 => documents.pop(),
        _ => Some(AstNode::document_set(documents)),
    }
}

/// Split concatenated JSON documents into independent top-level objects.
///
/// Scans character by character tracking brace depth and string/escape
/// state; text outside any object (stray newlines, diagnostics clang may
/// interleave) is discarded.
fn split_top_level_objects(output: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in output.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(s) = start.take() {
                        chunks.push(&output[s..=idx]);
                    }
                }
            }
            _ => {}
        }
    }

    chunks
}

// ── tests ─────────────────────────────────────────────────────────────────────

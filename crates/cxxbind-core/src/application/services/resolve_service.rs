//! Enumeration and flag-group resolution.
//!
//! Builds the [`Resolution`] the generators consult when classifying types:
//! enums declared in the class body, flag groups introduced by the
//! documentation convention, enum types inferred from cast sites in the
//! implementation file, and externally declared enums located by probing
//! candidate headers. Resolution is best-effort throughout: a candidate that
//! cannot be resolved stays a plain number in the generated surface.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::application::ports::{AstDumper, SourceTree};
use crate::application::services::extract_service::{Access, members_with_access};
use crate::domain::ast::AstNode;
use crate::domain::classify::{self, TypeClass};
use crate::domain::enums::{
    DefinitionSet, EnumDefinition, EnumMember, FlagDefinition, assign_member_values,
};
use crate::domain::method::Method;

/// Documentation convention that ties a constant group to a method:
/// a comment line reading `flags for <MethodName>` (case-insensitive,
/// optional backticks) starts a flag group for that method.
static FLAG_GROUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)flags\s+for\s+`?(\w+)`?").unwrap_or_else(|e| panic!("flag regex: {e}"))
});

/// Everything the generators need to classify types beyond the structural
/// rules.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Resolved enum and flag definitions.
    pub definitions: DefinitionSet,
    /// Per-parameter enum overrides from cast-site inference and naming
    /// conventions, keyed by both the exact signature key and the
    /// name/arity fallback key, mapping parameter index to target name.
    pub param_overrides: HashMap<String, HashMap<usize, String>>,
    /// Return-type enum overrides keyed by original method name.
    pub return_overrides: HashMap<String, String>,
    /// Candidate enum names that survived every resolution strategy
    /// unresolved. Reported, never fatal.
    pub unresolved: Vec<String>,
}

impl Resolution {
    /// Classify a parameter, overrides first.
    pub fn param_class(&self, method: &Method, idx: usize) -> TypeClass {
        let by_key = |key: &str| {
            self.param_overrides
                .get(key)
                .and_then(|m| m.get(&idx))
                .cloned()
        };
        if let Some(target) = by_key(&method.signature_key()).or_else(|| by_key(&method.arity_key()))
        {
            return TypeClass::Enum(target);
        }
        let ty = method.params.get(idx).map_or("", |p| p.ty.as_str());
        classify::classify(ty, |s| self.enum_target(s))
    }

    /// Classify a return type, overrides first.
    pub fn return_class(&self, method: &Method) -> TypeClass {
        if let Some(target) = self.return_overrides.get(&method.name) {
            return TypeClass::Enum(target.clone());
        }
        classify::classify_return(&method.return_type, |s| self.enum_target(s))
    }

    fn enum_target(&self, spelling: &str) -> Option<String> {
        self.definitions
            .enum_for_spelling(spelling)
            .map(|e| e.target_name.clone())
    }

    fn add_param_override(&mut self, method: &Method, idx: usize, target: &str) {
        for key in [method.signature_key(), method.arity_key()] {
            self.param_overrides
                .entry(key)
                .or_default()
                .entry(idx)
                .or_insert_with(|| target.to_string());
        }
    }
}

/// An enum name to probe externally, carrying the qualified spelling when
/// the discovering cast or declaration used one.
#[derive(Debug, Clone)]
struct ProbeCandidate {
    simple: String,
    qualified: Option<String>,
}

/// A cast-site discovery that only becomes a parameter override once its
/// candidate resolves to a known enum.
struct PendingOverride<'m> {
    method: &'m Method,
    idx: usize,
    spelling: String,
}

/// Resolves enum metadata for one class using the dumper and source-tree
/// ports.
pub struct ResolveService<'a> {
    dumper: &'a dyn AstDumper,
    tree: &'a dyn SourceTree,
}

impl<'a> ResolveService<'a> {
    pub fn new(dumper: &'a dyn AstDumper, tree: &'a dyn SourceTree) -> Self {
        Self { dumper, tree }
    }

    /// Run every resolution strategy in order. `impl_ast` is the parsed
    /// implementation file, when one was obtainable.
    #[instrument(skip_all, fields(class = class_name))]
    pub fn resolve(
        &self,
        class_node: &AstNode,
        class_name: &str,
        methods: &[Method],
        impl_ast: Option<&AstNode>,
    ) -> Resolution {
        let mut resolution = Resolution::default();

        self.collect_class_enums(class_node, class_name, &mut resolution);
        self.collect_flag_groups(class_node, &mut resolution);

        let mut candidates: Vec<ProbeCandidate> = Vec::new();
        let mut pending: Vec<PendingOverride<'_>> = Vec::new();
        if let Some(impl_ast) = impl_ast {
            self.infer_from_cast_sites(
                impl_ast,
                class_name,
                methods,
                &resolution,
                &mut candidates,
                &mut pending,
            );
        }
        self.collect_heuristic_candidates(methods, &resolution, &mut candidates);
        self.resolve_external(&candidates, &mut resolution);

        // Cast-site discoveries bind only once their candidate resolved to a
        // known enum; a failed candidate stays structural and is reported in
        // `unresolved`.
        for p in &pending {
            if let Some(target) = resolution
                .definitions
                .enum_for_spelling(&p.spelling)
                .map(|e| e.target_name.clone())
            {
                resolution.add_param_override(p.method, p.idx, &target);
            }
        }

        self.apply_accessor_convention(methods, &mut resolution);
        self.apply_flag_param_overrides(methods, &mut resolution);

        info!(
            enums = resolution.definitions.enums.len(),
            flags = resolution.definitions.flags.len(),
            unresolved = resolution.unresolved.len(),
            "resolution complete"
        );
        resolution
    }

    /// Enums declared directly in the class body's public region, including
    /// `typedef enum { ... } Name;` forms.
    fn collect_class_enums(
        &self,
        class_node: &AstNode,
        class_name: &str,
        resolution: &mut Resolution,
    ) {
        for (access, member) in members_with_access(class_node) {
            if access != Access::Public {
                continue;
            }
            let enum_node = match member.kind.as_str() {
                "EnumDecl" => Some(member),
                "TypedefDecl" => member
                    .owned_tag_decl
                    .as_deref()
                    .filter(|tag| tag.kind == "EnumDecl"),
                _ => None,
            };
            let Some(enum_node) = enum_node else { continue };

            let simple_name = if member.kind == "TypedefDecl" {
                member.name_or_empty()
            } else {
                enum_node.name_or_empty()
            };
            if simple_name.is_empty() {
                continue;
            }

            let members = assign_member_values(enum_members(enum_node));
            if members.is_empty() {
                continue;
            }
            let def = EnumDefinition::new(simple_name, Some(class_name), members);
            if resolution.definitions.add_enum(def) {
                debug!(name = simple_name, "resolved class-declared enum");
            }
        }
    }

    /// Flag groups via the documentation convention: a comment matching
    /// [`FLAG_GROUP_RE`] opens a group; the annotated declaration and any
    /// immediately following integer constants join it; the first member
    /// that breaks the run closes it.
    fn collect_flag_groups(&self, class_node: &AstNode, resolution: &mut Resolution) {
        let mut current: Option<(String, Vec<(String, Option<i64>)>)> = None;

        for (access, member) in members_with_access(class_node) {
            let method_name = doc_text(member)
                .and_then(|text| FLAG_GROUP_RE.captures(&text).map(|c| c[1].to_string()));

            if access != Access::Public {
                flush_flag_group(&mut current, resolution);
                continue;
            }

            if let Some(method_name) = method_name {
                flush_flag_group(&mut current, resolution);
                let mut members = Vec::new();
                append_flag_members(member, &mut members);
                current = Some((method_name, members));
                continue;
            }

            if let Some((_, members)) = current.as_mut() {
                let before = members.len();
                append_flag_members(member, members);
                if members.len() == before {
                    // Not a constant: the run is over.
                    flush_flag_group(&mut current, resolution);
                }
            }
        }

        flush_flag_group(&mut current, resolution);
    }

    /// Cast-site inference: a parameter cast to an enum type inside the
    /// method's out-of-line definition reveals that parameter's real type.
    /// Casts to already-known enums are queued as immediate overrides;
    /// everything else becomes a probe candidate whose override waits on
    /// external resolution.
    fn infer_from_cast_sites<'m>(
        &self,
        impl_ast: &AstNode,
        class_name: &str,
        methods: &'m [Method],
        resolution: &Resolution,
        candidates: &mut Vec<ProbeCandidate>,
        pending: &mut Vec<PendingOverride<'m>>,
    ) {
        let methods_by_name: HashMap<&str, Vec<&Method>> = methods.iter().fold(
            HashMap::new(),
            |mut map, m| {
                map.entry(m.name.as_str()).or_default().push(m);
                map
            },
        );

        let definitions = impl_ast.find_all(&|n| {
            n.kind == "CXXMethodDecl"
                && !n.inner.is_empty()
                && methods_by_name.contains_key(trim_class_scope(n.name_or_empty(), class_name))
        });

        for def_node in definitions {
            let method_name = trim_class_scope(def_node.name_or_empty(), class_name);
            let param_index: HashMap<&str, usize> = def_node
                .inner
                .iter()
                .filter(|n| n.kind == "ParmVarDecl")
                .enumerate()
                .filter_map(|(idx, n)| n.name.as_deref().map(|name| (name, idx)))
                .collect();
            let arity = param_index.len();

            let casts = def_node.find_all(&|n| {
                matches!(
                    n.kind.as_str(),
                    "CStyleCastExpr" | "CXXStaticCastExpr" | "CXXFunctionalCastExpr"
                )
            });

            for cast in casts {
                let Some(target_ty) = cast.qual_type() else { continue };
                let bare = classify::strip_qualifiers(target_ty);
                let simple = bare.rsplit("::").next().unwrap_or(&bare).to_string();
                let known = resolution
                    .definitions
                    .enum_for_spelling(&bare)
                    .or_else(|| resolution.definitions.enum_for_spelling(target_ty))
                    .is_some();
                if !known && !could_be_enum_cast(target_ty, &bare) {
                    continue;
                }

                let Some(param_ref) = cast.find_first(&|n| {
                    n.kind == "DeclRefExpr"
                        && n.referenced_decl
                            .as_deref()
                            .is_some_and(|d| d.kind == "ParmVarDecl")
                }) else {
                    continue;
                };
                let Some(idx) = param_ref
                    .referenced_decl
                    .as_deref()
                    .and_then(|d| d.name.as_deref())
                    .and_then(|name| param_index.get(name).copied())
                else {
                    continue;
                };

                // Overloads are matched by arity; the exact-signature key is
                // registered alongside so a later exact match wins nothing
                // extra but costs nothing either.
                let matching = methods_by_name
                    .get(method_name)
                    .into_iter()
                    .flatten()
                    .filter(|m| m.params.len() == arity);
                for method in matching {
                    debug!(
                        method = method_name,
                        param = idx,
                        enum_name = %simple,
                        known,
                        "inferred enum parameter from cast site"
                    );
                    pending.push(PendingOverride {
                        method: *method,
                        idx,
                        spelling: simple.clone(),
                    });
                }
                if !known {
                    candidates.push(ProbeCandidate {
                        simple: simple.clone(),
                        qualified: (bare != simple).then(|| bare.clone()),
                    });
                }
            }
        }
    }

    /// Parameter and return types that look like enums by naming convention
    /// but are not yet resolved.
    fn collect_heuristic_candidates(
        &self,
        methods: &[Method],
        resolution: &Resolution,
        candidates: &mut Vec<ProbeCandidate>,
    ) {
        let mut push = |ty: &str| {
            let bare = classify::strip_qualifiers(ty);
            let simple = bare.rsplit("::").next().unwrap_or(&bare);
            if classify::looks_enum_like(simple)
                && resolution.definitions.enum_for_spelling(&bare).is_none()
                && resolution.definitions.enum_for_spelling(simple).is_none()
            {
                candidates.push(ProbeCandidate {
                    simple: simple.to_string(),
                    qualified: (bare != simple).then(|| bare.clone()),
                });
            }
        };
        for method in methods {
            push(&method.return_type);
            for param in &method.params {
                push(&param.ty);
            }
        }
    }

    /// External resolution: probe candidate headers with a synthesized
    /// translation unit and harvest the enum's definition from its tree.
    /// Per header the bare name is tried first, then the qualified spelling
    /// when the candidate carries one; the first combination that yields a
    /// usable enum declaration wins.
    fn resolve_external(&self, candidates: &[ProbeCandidate], resolution: &mut Resolution) {
        let mut seen: HashSet<&str> = HashSet::new();
        let root = self.tree.root();

        for candidate in candidates {
            let name = candidate.simple.as_str();
            if !seen.insert(name) {
                continue;
            }
            if resolution.definitions.enum_for_spelling(name).is_some() {
                continue;
            }

            let headers = self.tree.candidate_headers(name);
            let mut spellings = vec![name.to_string()];
            spellings.extend(candidate.qualified.clone());
            let mut resolved = false;

            'headers: for header in &headers {
                let include = header
                    .strip_prefix(&root)
                    .unwrap_or(header)
                    .to_string_lossy()
                    .replace('\\', "/");
                for spelling in &spellings {
                    let probe = format!(
                        "#include \"{include}\"\nstatic void __probe({spelling} value) {{ (void)value; }}\n"
                    );
                    let Some(ast) = self.dumper.dump_source(&probe, Some(name)) else {
                        continue;
                    };
                    let Some(enum_node) = find_enum_decl(&ast, name) else {
                        continue;
                    };
                    let members = assign_member_values(enum_members(enum_node));
                    if members.is_empty() {
                        continue;
                    }
                    let def = EnumDefinition::new(name, None, members);
                    if resolution.definitions.add_enum(def) {
                        debug!(name = %name, header = %header.display(), "resolved external enum");
                    }
                    resolved = true;
                    break 'headers;
                }
            }

            if !resolved {
                warn!(name = %name, probed = headers.len(), "enum candidate left unresolved");
                resolution.unresolved.push(name.to_string());
            }
        }
        resolution.unresolved.sort();
        resolution.unresolved.dedup();
    }

    /// `Set<Stem>`/`Get<Stem>` accessor convention: a setter's first
    /// parameter and a getter's return value take the enum whose stem
    /// matches, unless an earlier strategy already decided.
    fn apply_accessor_convention(&self, methods: &[Method], resolution: &mut Resolution) {
        let stems: Vec<(String, String)> = resolution
            .definitions
            .enums
            .iter()
            .map(|e| (e.convention_stem().to_string(), e.target_name.clone()))
            .collect();

        let otherwise_numeric =
            |ty: &str| classify::classify(ty, |_| None) == TypeClass::Numeric;

        for (stem, target) in stems {
            for method in methods {
                if method.name == format!("Set{stem}")
                    && method.params.len() == 1
                    && otherwise_numeric(&method.params[0].ty)
                {
                    resolution.add_param_override(method, 0, &target);
                }
                if method.name == format!("Get{stem}")
                    && method.params.is_empty()
                    && otherwise_numeric(&method.return_type)
                {
                    resolution
                        .return_overrides
                        .entry(method.name.clone())
                        .or_insert_with(|| target.clone());
                }
            }
        }
    }

    /// A method with an attached flag group takes those flags in its first
    /// parameter, when that parameter would otherwise classify as numeric.
    fn apply_flag_param_overrides(&self, methods: &[Method], resolution: &mut Resolution) {
        let flags: Vec<(String, String)> = resolution
            .definitions
            .flags
            .iter()
            .map(|f| (f.method_name.clone(), f.target_name.clone()))
            .collect();

        for (method_name, target) in flags {
            for method in methods.iter().filter(|m| m.name == method_name) {
                let first_is_numeric = method.params.first().is_some_and(|p| {
                    classify::classify(&p.ty, |_| None) == TypeClass::Numeric
                });
                if first_is_numeric {
                    resolution.add_param_override(method, 0, &target);
                }
            }
        }
    }
}

/// Enumerator names with their explicit values, declaration order preserved.
fn enum_members(enum_node: &AstNode) -> Vec<(String, Option<i64>)> {
    enum_node
        .inner
        .iter()
        .filter(|n| n.kind == "EnumConstantDecl")
        .map(|n| (n.name_or_empty().to_string(), int_value(n)))
        .collect()
}

/// Evaluated integer value of an enumerator/constant initializer, if any.
fn int_value(node: &AstNode) -> Option<i64> {
    node.find_first(&|n| n.value.is_some())
        .and_then(|n| n.value.as_ref())
        .and_then(|v| match v {
            serde_json::Value::String(s) => s.parse().ok(),
            serde_json::Value::Number(n) => n.as_i64(),
            _ => None,
        })
}

/// Full comment text attached to a declaration, flattened to one line.
fn doc_text(node: &AstNode) -> Option<String> {
    let full = node.inner.iter().find(|n| n.kind == "FullComment")?;
    let lines: Vec<&str> = full
        .find_all(&|n| n.kind == "TextComment")
        .iter()
        .filter_map(|n| n.text.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}

/// Append the integer constants a member contributes to an open flag group:
/// a `static const` integer variable with a literal initializer, or every
/// enumerator of an enum declaration.
fn append_flag_members(member: &AstNode, members: &mut Vec<(String, Option<i64>)>) {
    match member.kind.as_str() {
        "VarDecl" if member.storage_class.as_deref() == Some("static") => {
            if let Some(value) = int_value(member) {
                members.push((member.name_or_empty().to_string(), Some(value)));
            }
        }
        "EnumDecl" => members.extend(enum_members(member)),
        _ => {}
    }
}

fn flush_flag_group(
    current: &mut Option<(String, Vec<(String, Option<i64>)>)>,
    resolution: &mut Resolution,
) {
    if let Some((method_name, raw)) = current.take() {
        let members = assign_member_values(raw);
        let def = FlagDefinition::new(&method_name, members);
        if resolution.definitions.add_flags(def) {
            debug!(method = %method_name, "resolved flag group");
        }
    }
}

/// Whether a cast target can denote an enum: anything except bool, a known
/// arithmetic type, a pointer, or a reference qualifies as a candidate.
fn could_be_enum_cast(spelling: &str, bare: &str) -> bool {
    let trimmed = spelling.trim_end();
    if trimmed.ends_with('*') || trimmed.ends_with('&') {
        return false;
    }
    !matches!(
        classify::classify(bare, |_| None),
        TypeClass::Boolean | TypeClass::Numeric
    )
}

/// Strip a leading `Class::` qualifier off an out-of-line definition name.
fn trim_class_scope<'n>(name: &'n str, class_name: &str) -> &'n str {
    name.strip_prefix(class_name)
        .and_then(|rest| rest.strip_prefix("::"))
        .unwrap_or(name)
}

/// Locate the probed enum's declaration in a probe translation unit: an
/// exact-name match, a typedef owning one, or (for `typedef enum` with an
/// anonymous tag) any enum whose first enumerator's type mentions the name.
fn find_enum_decl<'t>(ast: &'t AstNode, name: &str) -> Option<&'t AstNode> {
    if let Some(found) = ast.find_first(&|n| n.kind == "EnumDecl" && n.name_or_empty() == name) {
        return Some(found);
    }
    if let Some(typedef) = ast.find_first(&|n| {
        n.kind == "TypedefDecl"
            && n.name_or_empty() == name
            && n.owned_tag_decl.as_deref().is_some_and(|t| t.kind == "EnumDecl")
    }) {
        return typedef.owned_tag_decl.as_deref();
    }
    ast.find_first(&|n| {
        n.kind == "EnumDecl"
            && n.inner.iter().any(|c| {
                c.kind == "EnumConstantDecl"
                    && c.qual_type().is_some_and(|t| t.contains(name))
            })
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockAstDumper, MockSourceTree};
    use crate::domain::method::Param;
    use std::path::PathBuf;

    fn node(json: &str) -> AstNode {
        serde_json::from_str(json).expect("valid node")
    }

    fn no_probes() -> (MockAstDumper, MockSourceTree) {
        let dumper = MockAstDumper::new();
        let mut tree = MockSourceTree::new();
        tree.expect_candidate_headers().returning(|_| Vec::new());
        tree.expect_root().returning(|| PathBuf::from("/src"));
        (dumper, tree)
    }

    fn empty_class() -> AstNode {
        node(r#"{"kind": "CXXRecordDecl", "name": "Engine", "completeDefinition": true}"#)
    }

    #[test]
    fn class_enum_in_public_region_is_resolved() {
        let class = node(
            r#"{"kind": "CXXRecordDecl", "name": "Engine", "completeDefinition": true,
                "inner": [
                  {"kind": "EnumDecl", "name": "eHidden", "inner": [
                      {"kind": "EnumConstantDecl", "name": "tX"}]},
                  {"kind": "AccessSpecDecl", "access": "public"},
                  {"kind": "EnumDecl", "name": "eMode", "inner": [
                      {"kind": "EnumConstantDecl", "name": "tFast"},
                      {"kind": "EnumConstantDecl", "name": "tSlow", "inner": [
                          {"kind": "ConstantExpr", "value": "5"}]},
                      {"kind": "EnumConstantDecl", "name": "tLast"}
                  ]}
                ]}"#,
        );
        let (dumper, tree) = no_probes();
        let svc = ResolveService::new(&dumper, &tree);
        let res = svc.resolve(&class, "Engine", &[], None);

        assert_eq!(res.definitions.enums.len(), 1);
        let def = res.definitions.enum_by_target("eMode").unwrap();
        assert!(def.matches_spelling("Engine::eMode"));
        let values: Vec<i64> = def.members.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![0, 5, 6]);
    }

    #[test]
    fn flag_group_from_doc_convention() {
        let class = node(
            r#"{"kind": "CXXRecordDecl", "name": "Engine", "completeDefinition": true,
                "inner": [
                  {"kind": "AccessSpecDecl", "access": "public"},
                  {"kind": "VarDecl", "name": "RUN_FAST", "storageClass": "static",
                   "type": {"qualType": "const int"},
                   "inner": [
                     {"kind": "FullComment", "inner": [{"kind": "ParagraphComment", "inner": [
                         {"kind": "TextComment", "text": " Flags for `Run`. "}]}]},
                     {"kind": "IntegerLiteral", "value": "1"}
                   ]},
                  {"kind": "VarDecl", "name": "RUN_QUIET", "storageClass": "static",
                   "type": {"qualType": "const int"},
                   "inner": [{"kind": "IntegerLiteral", "value": "2"}]},
                  {"kind": "CXXMethodDecl", "name": "Run",
                   "type": {"qualType": "void (int)"},
                   "inner": [{"kind": "ParmVarDecl", "name": "flags",
                              "type": {"qualType": "int"}}]}
                ]}"#,
        );
        let methods = vec![
            Method::new("Run", "void").with_params(vec![Param::new("flags", "int")]),
        ];
        let (dumper, tree) = no_probes();
        let svc = ResolveService::new(&dumper, &tree);
        let res = svc.resolve(&class, "Engine", &methods, None);

        assert_eq!(res.definitions.flags.len(), 1);
        let flags = &res.definitions.flags[0];
        assert_eq!(flags.target_name, "RunFlags");
        assert_eq!(flags.members, vec![
            EnumMember::new("RUN_FAST", 1),
            EnumMember::new("RUN_QUIET", 2),
        ]);
        // First numeric parameter of the named method takes the flags.
        assert_eq!(
            res.param_class(&methods[0], 0),
            TypeClass::Enum("RunFlags".into())
        );
    }

    #[test]
    fn non_constant_member_closes_a_flag_group() {
        let class = node(
            r#"{"kind": "CXXRecordDecl", "name": "Engine", "completeDefinition": true,
                "inner": [
                  {"kind": "AccessSpecDecl", "access": "public"},
                  {"kind": "VarDecl", "name": "A", "storageClass": "static",
                   "type": {"qualType": "const int"},
                   "inner": [
                     {"kind": "FullComment", "inner": [{"kind": "ParagraphComment", "inner": [
                         {"kind": "TextComment", "text": "flags for Run"}]}]},
                     {"kind": "IntegerLiteral", "value": "1"}
                   ]},
                  {"kind": "CXXMethodDecl", "name": "Stop", "type": {"qualType": "void ()"}},
                  {"kind": "VarDecl", "name": "B", "storageClass": "static",
                   "type": {"qualType": "const int"},
                   "inner": [{"kind": "IntegerLiteral", "value": "2"}]}
                ]}"#,
        );
        let (dumper, tree) = no_probes();
        let svc = ResolveService::new(&dumper, &tree);
        let res = svc.resolve(&class, "Engine", &[], None);

        assert_eq!(res.definitions.flags.len(), 1);
        assert_eq!(res.definitions.flags[0].members.len(), 1);
    }

    #[test]
    fn cast_site_reveals_enum_parameter() {
        let class = node(
            r#"{"kind": "CXXRecordDecl", "name": "Engine", "completeDefinition": true,
                "inner": [
                  {"kind": "AccessSpecDecl", "access": "public"},
                  {"kind": "EnumDecl", "name": "eMode", "inner": [
                      {"kind": "EnumConstantDecl", "name": "tA"}]}
                ]}"#,
        );
        let impl_ast = node(
            r#"{"kind": "TranslationUnitDecl", "inner": [
                  {"kind": "CXXMethodDecl", "name": "Configure", "inner": [
                    {"kind": "ParmVarDecl", "name": "mode", "type": {"qualType": "int"}},
                    {"kind": "CompoundStmt", "inner": [
                      {"kind": "CXXStaticCastExpr", "type": {"qualType": "Engine::eMode"},
                       "inner": [
                         {"kind": "ImplicitCastExpr", "inner": [
                           {"kind": "DeclRefExpr", "referencedDecl":
                             {"kind": "ParmVarDecl", "name": "mode"}}
                         ]}
                       ]}
                    ]}
                  ]}
                ]}"#,
        );
        let methods = vec![
            Method::new("Configure", "void").with_params(vec![Param::new("mode", "int")]),
        ];
        let (dumper, tree) = no_probes();
        let svc = ResolveService::new(&dumper, &tree);
        let res = svc.resolve(&class, "Engine", &methods, Some(&impl_ast));

        assert_eq!(
            res.param_class(&methods[0], 0),
            TypeClass::Enum("eMode".into())
        );
    }

    #[test]
    fn external_enum_resolved_by_probing() {
        let probe_ast = r#"{"kind": "TranslationUnitDecl", "inner": [
              {"kind": "EnumDecl", "name": "eVoiceQuality", "inner": [
                  {"kind": "EnumConstantDecl", "name": "tLow"},
                  {"kind": "EnumConstantDecl", "name": "tHigh"}
              ]}
            ]}"#;

        let mut dumper = MockAstDumper::new();
        dumper
            .expect_dump_source()
            .withf(|source, filter| {
                source.contains("#include \"voice/quality.h\"") && *filter == Some("eVoiceQuality")
            })
            .returning(move |_, _| serde_json::from_str(probe_ast).ok());

        let mut tree = MockSourceTree::new();
        tree.expect_root().returning(|| PathBuf::from("/src"));
        tree.expect_candidate_headers()
            .returning(|_| vec![PathBuf::from("/src/voice/quality.h")]);

        let methods = vec![
            Method::new("SetQuality", "void")
                .with_params(vec![Param::new("q", "eVoiceQuality")]),
        ];
        let svc = ResolveService::new(&dumper, &tree);
        let res = svc.resolve(&empty_class(), "Engine", &methods, None);

        let def = res.definitions.enum_by_target("eVoiceQuality").unwrap();
        assert_eq!(def.members.len(), 2);
        assert!(res.unresolved.is_empty());
        assert_eq!(
            res.param_class(&methods[0], 0),
            TypeClass::Enum("eVoiceQuality".into())
        );
    }

    #[test]
    fn failed_probe_leaves_candidate_unresolved() {
        let mut dumper = MockAstDumper::new();
        dumper.expect_dump_source().returning(|_, _| None);
        let mut tree = MockSourceTree::new();
        tree.expect_root().returning(|| PathBuf::from("/src"));
        tree.expect_candidate_headers()
            .returning(|_| vec![PathBuf::from("/src/a.h"), PathBuf::from("/src/b.h")]);

        let methods = vec![
            Method::new("SetQuality", "void")
                .with_params(vec![Param::new("q", "eVoiceQuality")]),
        ];
        let svc = ResolveService::new(&dumper, &tree);
        let res = svc.resolve(&empty_class(), "Engine", &methods, None);

        assert_eq!(res.unresolved, vec!["eVoiceQuality".to_string()]);
        // Unresolved candidates classify structurally.
        assert_eq!(res.param_class(&methods[0], 0), TypeClass::Handle);
    }

    /// Implementation-file AST with one out-of-line method definition whose
    /// single parameter is cast to `target_ty`.
    fn impl_with_cast(target_ty: &str) -> AstNode {
        node(&format!(
            r#"{{"kind": "TranslationUnitDecl", "inner": [
                  {{"kind": "CXXMethodDecl", "name": "Configure", "inner": [
                    {{"kind": "ParmVarDecl", "name": "mode", "type": {{"qualType": "int"}}}},
                    {{"kind": "CompoundStmt", "inner": [
                      {{"kind": "CXXStaticCastExpr", "type": {{"qualType": "{target_ty}"}},
                       "inner": [
                         {{"kind": "ImplicitCastExpr", "inner": [
                           {{"kind": "DeclRefExpr", "referencedDecl":
                             {{"kind": "ParmVarDecl", "name": "mode"}}}}
                         ]}}
                       ]}}
                    ]}}
                  ]}}
                ]}}"#
        ))
    }

    #[test]
    fn unresolved_cast_candidate_stays_structural() {
        // Every probe fails, so the casted parameter keeps its declared
        // numeric class and the candidate is only reported.
        let impl_ast = impl_with_cast("eGhostMode");
        let methods = vec![
            Method::new("Configure", "void").with_params(vec![Param::new("mode", "int")]),
        ];
        let mut dumper = MockAstDumper::new();
        dumper.expect_dump_source().returning(|_, _| None);
        let mut tree = MockSourceTree::new();
        tree.expect_root().returning(|| PathBuf::from("/src"));
        tree.expect_candidate_headers()
            .returning(|_| vec![PathBuf::from("/src/ghost.h")]);

        let svc = ResolveService::new(&dumper, &tree);
        let res = svc.resolve(&empty_class(), "Engine", &methods, Some(&impl_ast));

        assert_eq!(res.unresolved, vec!["eGhostMode".to_string()]);
        assert_eq!(res.param_class(&methods[0], 0), TypeClass::Numeric);
    }

    #[test]
    fn cast_target_without_enum_naming_is_probed() {
        // `AltitudeUnit` matches no naming convention; the cast alone makes
        // it a candidate, and a successful probe binds the parameter.
        let probe_ast = r#"{"kind": "TranslationUnitDecl", "inner": [
              {"kind": "EnumDecl", "name": "AltitudeUnit", "inner": [
                  {"kind": "EnumConstantDecl", "name": "Feet"},
                  {"kind": "EnumConstantDecl", "name": "Meters"}
              ]}
            ]}"#;
        let impl_ast = impl_with_cast("AltitudeUnit");
        let methods = vec![
            Method::new("Configure", "void").with_params(vec![Param::new("mode", "int")]),
        ];
        let mut dumper = MockAstDumper::new();
        dumper
            .expect_dump_source()
            .returning(move |_, _| serde_json::from_str(probe_ast).ok());
        let mut tree = MockSourceTree::new();
        tree.expect_root().returning(|| PathBuf::from("/src"));
        tree.expect_candidate_headers()
            .returning(|_| vec![PathBuf::from("/src/altitude.h")]);

        let svc = ResolveService::new(&dumper, &tree);
        let res = svc.resolve(&empty_class(), "Engine", &methods, Some(&impl_ast));

        assert!(res.unresolved.is_empty());
        assert_eq!(
            res.param_class(&methods[0], 0),
            TypeClass::Enum("AltitudeUnit".into())
        );
    }

    #[test]
    fn qualified_cast_spelling_is_probed_after_bare() {
        // The bare probe fails to compile against the header; the qualified
        // spelling from the cast site succeeds.
        let probe_ast = r#"{"kind": "TranslationUnitDecl", "inner": [
              {"kind": "EnumDecl", "name": "eAltitude", "inner": [
                  {"kind": "EnumConstantDecl", "name": "tLow"},
                  {"kind": "EnumConstantDecl", "name": "tHigh"}
              ]}
            ]}"#;
        let impl_ast = impl_with_cast("units::eAltitude");
        let methods = vec![
            Method::new("Configure", "void").with_params(vec![Param::new("mode", "int")]),
        ];
        let mut dumper = MockAstDumper::new();
        dumper.expect_dump_source().returning(move |source, _| {
            if source.contains("__probe(units::eAltitude ") {
                serde_json::from_str(probe_ast).ok()
            } else {
                None
            }
        });
        let mut tree = MockSourceTree::new();
        tree.expect_root().returning(|| PathBuf::from("/src"));
        tree.expect_candidate_headers()
            .returning(|_| vec![PathBuf::from("/src/units.h")]);

        let svc = ResolveService::new(&dumper, &tree);
        let res = svc.resolve(&empty_class(), "Engine", &methods, Some(&impl_ast));

        assert!(res.definitions.enum_by_target("eAltitude").is_some());
        assert_eq!(
            res.param_class(&methods[0], 0),
            TypeClass::Enum("eAltitude".into())
        );
    }

    #[test]
    fn flag_override_requires_numeric_first_parameter() {
        let class = node(
            r#"{"kind": "CXXRecordDecl", "name": "Engine", "completeDefinition": true,
                "inner": [
                  {"kind": "AccessSpecDecl", "access": "public"},
                  {"kind": "VarDecl", "name": "RUN_FAST", "storageClass": "static",
                   "type": {"qualType": "const int"},
                   "inner": [
                     {"kind": "FullComment", "inner": [{"kind": "ParagraphComment", "inner": [
                         {"kind": "TextComment", "text": "flags for Run"}]}]},
                     {"kind": "IntegerLiteral", "value": "1"}
                   ]}
                ]}"#,
        );
        let methods = vec![Method::new("Run", "void").with_params(vec![
            Param::new("name", "const std::string &"),
            Param::new("flags", "int"),
        ])];
        let (dumper, tree) = no_probes();
        let svc = ResolveService::new(&dumper, &tree);
        let res = svc.resolve(&class, "Engine", &methods, None);

        // The group exists, but a non-numeric first parameter takes no
        // override — and neither does any later numeric one.
        assert_eq!(res.definitions.flags.len(), 1);
        assert_eq!(res.param_class(&methods[0], 0), TypeClass::Str);
        assert_eq!(res.param_class(&methods[0], 1), TypeClass::Numeric);
    }

    #[test]
    fn accessor_convention_binds_setter_and_getter() {
        let class = node(
            r#"{"kind": "CXXRecordDecl", "name": "Engine", "completeDefinition": true,
                "inner": [
                  {"kind": "AccessSpecDecl", "access": "public"},
                  {"kind": "EnumDecl", "name": "eMode", "inner": [
                      {"kind": "EnumConstantDecl", "name": "tA"}]}
                ]}"#,
        );
        let methods = vec![
            Method::new("SetMode", "void").with_params(vec![Param::new("mode", "int")]),
            Method::new("GetMode", "int"),
        ];
        let (dumper, tree) = no_probes();
        let svc = ResolveService::new(&dumper, &tree);
        let res = svc.resolve(&class, "Engine", &methods, None);

        assert_eq!(
            res.param_class(&methods[0], 0),
            TypeClass::Enum("eMode".into())
        );
        assert_eq!(res.return_class(&methods[1]), TypeClass::Enum("eMode".into()));
    }

    #[test]
    fn enum_typed_parameter_classifies_without_overrides() {
        let class = node(
            r#"{"kind": "CXXRecordDecl", "name": "Engine", "completeDefinition": true,
                "inner": [
                  {"kind": "AccessSpecDecl", "access": "public"},
                  {"kind": "EnumDecl", "name": "eMode", "inner": [
                      {"kind": "EnumConstantDecl", "name": "tA"}]}
                ]}"#,
        );
        let methods = vec![
            Method::new("Apply", "void")
                .with_params(vec![Param::new("m", "enum Engine::eMode")]),
        ];
        let (dumper, tree) = no_probes();
        let svc = ResolveService::new(&dumper, &tree);
        let res = svc.resolve(&class, "Engine", &methods, None);

        assert_eq!(
            res.param_class(&methods[0], 0),
            TypeClass::Enum("eMode".into())
        );
    }
}

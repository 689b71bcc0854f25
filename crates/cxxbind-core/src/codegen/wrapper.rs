//! Ergonomic wrapper class rendering.
//!
//! One camel-named method per group. Single-overload groups get inline
//! default initializers and forward positionally; multi-overload groups get
//! one declaration per overload plus a variadic implementation that
//! reproduces overload-resolution-by-arity through precomputed fill cases.
//! An argument count accepted by more than one overload gets no autofill —
//! the call proceeds with exactly the arguments given.

use std::collections::BTreeSet;

use crate::application::services::resolve_service::Resolution;
use crate::codegen::{GENERATED_BANNER, raw_method_name, returns_void};
use crate::codegen::raw::return_ts_type;
use crate::domain::method::Method;
use crate::domain::naming::MethodGroup;

/// A precomputed autofill rule: when `argc` arguments are provided, dispatch
/// to `overload_idx` appending `fills` to reach its full arity.
#[derive(Debug, Clone, PartialEq)]
pub struct FillCase {
    pub argc: usize,
    pub overload_idx: usize,
    pub fills: Vec<String>,
}

/// Compute the fill cases for one group, sorted by ascending argument
/// count. A count is autofilled only when exactly one overload in the group
/// accepts it.
pub fn fill_cases(group: &MethodGroup) -> Vec<FillCase> {
    let accepts = |m: &Method, argc: usize| m.min_args() <= argc && argc <= m.max_args();
    let mut cases = Vec::new();

    for (overload_idx, overload) in group.overloads.iter().enumerate() {
        for argc in overload.min_args()..overload.max_args() {
            let accepting = group.overloads.iter().filter(|m| accepts(m, argc)).count();
            if accepting != 1 {
                continue;
            }
            let fills = overload.params[argc..]
                .iter()
                .filter_map(|p| p.default.as_ref().map(|d| d.render()))
                .collect::<Vec<_>>();
            // A gap without a recorded literal cannot be filled.
            if fills.len() == overload.max_args() - argc {
                cases.push(FillCase {
                    argc,
                    overload_idx,
                    fills,
                });
            }
        }
    }

    cases.sort_by_key(|c| c.argc);
    cases
}

/// Render the ergonomic wrapper module. `raw_module` is the import path of
/// the raw interface module, without extension.
pub fn render(
    class_name: &str,
    raw_module: &str,
    groups: &[MethodGroup],
    resolution: &Resolution,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("/* {GENERATED_BANNER} */\n\n"));
    render_imports(&mut out, class_name, raw_module, groups, resolution);
    out.push_str(&format!("export class {class_name} {{\n"));
    out.push_str(&format!(
        "  constructor(private readonly raw: {class_name}Raw) {{}}\n"
    ));

    for group in groups {
        out.push('\n');
        if group.overloads.len() == 1 {
            render_single(&mut out, group, resolution);
        } else {
            render_overloaded(&mut out, group, resolution);
        }
    }

    out.push_str("}\n");
    out
}

/// Every enum/flag name appearing in an emitted parameter or return type,
/// deduplicated and lexically sorted.
fn enum_imports(groups: &[MethodGroup], resolution: &Resolution) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for group in groups {
        for method in &group.overloads {
            for idx in 0..method.params.len() {
                let class = resolution.param_class(method, idx);
                if !class.is_builtin() {
                    names.insert(class.ts_type());
                }
            }
            let ret = resolution.return_class(method);
            if !ret.is_builtin() {
                names.insert(ret.ts_type());
            }
        }
    }
    names
}

fn render_imports(
    out: &mut String,
    class_name: &str,
    raw_module: &str,
    groups: &[MethodGroup],
    resolution: &Resolution,
) {
    let mut imports = vec![format!("{class_name}Raw")];
    imports.extend(enum_imports(groups, resolution));
    out.push_str(&format!(
        "import {{ {} }} from \"{raw_module}\";\n\n",
        imports.join(", ")
    ));
}

fn render_doc(out: &mut String, method: &Method) {
    if method.doc.is_empty() {
        return;
    }
    out.push_str("  /**\n");
    for line in &method.doc.description {
        out.push_str(&format!("   * {line}\n"));
    }
    for (idx, param) in method.params.iter().enumerate() {
        if let Some(text) = method.doc.param_text(idx, &param.name) {
            out.push_str(&format!("   * @param {} {text}\n", param.name));
        }
    }
    if let Some(returns) = &method.doc.returns {
        out.push_str(&format!("   * @returns {returns}\n"));
    }
    out.push_str("   */\n");
}

/// Parameter list for a declaration: defaulted trailing parameters become
/// optional; when `inline_defaults` is set they carry their literal
/// initializer instead (callable form for single-overload groups).
fn param_list(method: &Method, resolution: &Resolution, inline_defaults: bool) -> String {
    let min = method.min_args();
    method
        .params
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let ts = resolution.param_class(method, idx).ts_type();
            match (&p.default, idx >= min) {
                (Some(default), true) if inline_defaults => {
                    format!("{}: {ts} = {}", p.name, default.render())
                }
                (_, true) => format!("{}?: {ts}", p.name),
                _ => format!("{}: {ts}", p.name),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_single(out: &mut String, group: &MethodGroup, resolution: &Resolution) {
    let method = &group.overloads[0];
    render_doc(out, method);

    let params = param_list(method, resolution, true);
    let ret = return_ts_type(method, resolution);
    let forward = method
        .params
        .iter()
        .map(|p| p.name.clone())
        .collect::<Vec<_>>()
        .join(", ");
    let raw_name = raw_method_name(group, 0);

    out.push_str(&format!("  {}({params}): {ret} {{\n", group.camel_name));
    if returns_void(method) {
        out.push_str(&format!("    this.raw.{raw_name}({forward});\n"));
    } else {
        out.push_str(&format!("    return this.raw.{raw_name}({forward});\n"));
    }
    out.push_str("  }\n");
}

fn render_overloaded(out: &mut String, group: &MethodGroup, resolution: &Resolution) {
    for (idx, method) in group.overloads.iter().enumerate() {
        render_doc(out, method);
        out.push_str(&format!(
            "  {}({}): {};\n",
            group.camel_name,
            param_list(method, resolution, false),
            return_ts_type(method, resolution)
        ));
    }

    let mut ret_types: Vec<String> = Vec::new();
    for method in &group.overloads {
        let ts = return_ts_type(method, resolution);
        if !ret_types.contains(&ts) {
            ret_types.push(ts);
        }
    }
    let impl_ret = ret_types.join(" | ");

    out.push_str(&format!(
        "  {}(...args: unknown[]): {impl_ret} {{\n",
        group.camel_name
    ));
    out.push_str(
        "    const raw = this.raw as unknown as Record<string, (...fwd: unknown[]) => unknown>;\n",
    );

    let cases = fill_cases(group);
    let exact = exact_cases(group);
    if !cases.is_empty() || !exact.is_empty() {
        out.push_str("    switch (args.length) {\n");
        let mut handled = BTreeSet::new();
        for case in &cases {
            handled.insert(case.argc);
            let raw_name = raw_method_name(group, case.overload_idx);
            let ret = return_ts_type(&group.overloads[case.overload_idx], resolution);
            let call = format!("raw.{raw_name}(...args, {})", case.fills.join(", "));
            out.push_str(&format!("      case {}:\n", case.argc));
            out.push_str(&return_line(&call, &ret, "        "));
        }
        for (argc, overload_idx) in exact {
            if !handled.insert(argc) {
                continue;
            }
            let raw_name = raw_method_name(group, overload_idx);
            let ret = return_ts_type(&group.overloads[overload_idx], resolution);
            out.push_str(&format!("      case {argc}:\n"));
            out.push_str(&return_line(&format!("raw.{raw_name}(...args)"), &ret, "        "));
        }
        out.push_str("    }\n");
    }

    // Ambiguous or out-of-range counts dispatch unmodified.
    let fallback = raw_method_name(group, 0);
    let fallback_ret = return_ts_type(&group.overloads[0], resolution);
    out.push_str(&return_line(&format!("raw.{fallback}(...args)"), &fallback_ret, "    "));
    out.push_str("  }\n");
}

/// Exact-arity dispatch: argument counts matching exactly one overload's
/// full arity, mapped to that overload.
fn exact_cases(group: &MethodGroup) -> Vec<(usize, usize)> {
    let accepts = |m: &Method, argc: usize| m.min_args() <= argc && argc <= m.max_args();
    let mut out = Vec::new();
    for (overload_idx, overload) in group.overloads.iter().enumerate() {
        let argc = overload.max_args();
        let accepting = group.overloads.iter().filter(|m| accepts(m, argc)).count();
        if accepting == 1 {
            out.push((argc, overload_idx));
        }
    }
    out.sort_by_key(|&(argc, _)| argc);
    out
}

fn return_line(call: &str, ret_ts: &str, indent: &str) -> String {
    if ret_ts == "void" {
        format!("{indent}{call};\n{indent}return;\n")
    } else {
        format!("{indent}return {call} as {ret_ts};\n")
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

//! Raw typed interface rendering.
//!
//! A 1:1 description of the bound surface: one signature per extracted
//! overload, every parameter required (defaults exist only in the ergonomic
//! layer), types mapped through the canonical classification with enum
//! overrides taking priority. Enum and flag definitions are emitted as
//! const enums ahead of the interface.

use crate::application::services::resolve_service::Resolution;
use crate::codegen::{GENERATED_BANNER, raw_method_name, returns_void};
use crate::domain::enums::EnumMember;
use crate::domain::method::Method;
use crate::domain::naming::MethodGroup;

/// Render the raw interface module.
pub fn render(class_name: &str, groups: &[MethodGroup], resolution: &Resolution) -> String {
    let mut out = String::new();
    out.push_str(&format!("/* {GENERATED_BANNER} */\n\n"));

    for def in &resolution.definitions.enums {
        render_const_enum(&mut out, &def.target_name, &def.members);
    }
    for def in &resolution.definitions.flags {
        render_const_enum(&mut out, &def.target_name, &def.members);
    }

    out.push_str(&format!("export interface {class_name}Raw {{\n"));
    for group in groups {
        for (idx, method) in group.overloads.iter().enumerate() {
            let name = raw_method_name(group, idx);
            let params = method
                .params
                .iter()
                .enumerate()
                .map(|(i, p)| format!("{}: {}", p.name, resolution.param_class(method, i).ts_type()))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "  {name}({params}): {};\n",
                return_ts_type(method, resolution)
            ));
        }
    }
    out.push_str("}\n");
    out
}

/// Target-language return type; `void` stays `void` rather than falling
/// into the handle catch-all.
pub fn return_ts_type(method: &Method, resolution: &Resolution) -> String {
    if returns_void(method) {
        "void".to_string()
    } else {
        resolution.return_class(method).ts_type()
    }
}

fn render_const_enum(out: &mut String, target_name: &str, members: &[EnumMember]) {
    out.push_str(&format!("export const enum {target_name} {{\n"));
    for member in members {
        out.push_str(&format!("  {} = {},\n", member.name, member.value));
    }
    out.push_str("}\n\n");
}

// ── tests ─────────────────────────────────────────────────────────────────────

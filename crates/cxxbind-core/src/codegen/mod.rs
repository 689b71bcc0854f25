//! Artifact rendering.
//!
//! Three coupled outputs derived from the grouped methods and the
//! resolution result: the native glue source, the raw typed interface, and
//! the ergonomic wrapper class. All rendering is deterministic — iteration
//! follows extraction order and every derived list is sorted — so repeated
//! runs over unchanged input produce byte-identical artifacts.

pub mod glue;
pub mod raw;
pub mod wrapper;

use crate::domain::method::Method;
use crate::domain::naming::MethodGroup;

/// Banner emitted at the top of every artifact.
pub const GENERATED_BANNER: &str = "Generated by cxxbind; do not edit.";

/// Name of an overload in the raw interface: the group's camel name, later
/// overloads suffixed `_2`, `_3`, ...
pub fn raw_method_name(group: &MethodGroup, overload_idx: usize) -> String {
    suffixed(&group.camel_name, overload_idx)
}

/// Name a wrapper function is registered under in the glue layer: the
/// original identifier, later overloads suffixed the same way.
pub fn registered_name(group: &MethodGroup, overload_idx: usize) -> String {
    suffixed(&group.source_name, overload_idx)
}

fn suffixed(base: &str, overload_idx: usize) -> String {
    if overload_idx == 0 {
        base.to_string()
    } else {
        format!("{base}_{}", overload_idx + 1)
    }
}

/// Whether a method returns nothing.
pub fn returns_void(method: &Method) -> bool {
    method.return_type.trim() == "void"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overload_names_are_suffixed_from_the_second() {
        let group = MethodGroup {
            camel_name: "loadModel".into(),
            source_name: "LoadModel".into(),
            overloads: vec![Method::new("LoadModel", "bool"), Method::new("LoadModel", "bool")],
        };
        assert_eq!(raw_method_name(&group, 0), "loadModel");
        assert_eq!(raw_method_name(&group, 1), "loadModel_2");
        assert_eq!(registered_name(&group, 0), "LoadModel");
        assert_eq!(registered_name(&group, 1), "LoadModel_2");
    }
}

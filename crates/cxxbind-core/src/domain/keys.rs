//! Signature and arity keys.
//!
//! Declaration and implementation files are parsed independently and may
//! spell the same type differently (typedef vs. underlying type, spacing).
//! Two keys join the parses: the exact signature key when spellings agree,
//! and the name+arity key as the deterministic fallback.

/// Normalize a C++ type spelling: collapse interior whitespace and remove
/// space before pointer/reference markers, so `const std::string &` and
/// `const  std::string&` produce the same key.
pub fn normalize_type(ty: &str) -> String {
    let collapsed = ty.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.replace(" &", "&").replace(" *", "*")
}

/// Exact method identity: `Name(type,type,...)` with normalized spellings.
pub fn signature_key<'a>(name: &str, param_types: impl Iterator<Item = &'a str>) -> String {
    let types: Vec<String> = param_types.map(normalize_type).collect();
    format!("{}({})", name, types.join(","))
}

/// Fuzzy method identity: `Name/arity`.
pub fn arity_key(name: &str, arity: usize) -> String {
    format!("{name}/{arity}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_type("const  std::string  &"), "const std::string&");
        assert_eq!(normalize_type("unsigned   int"), "unsigned int");
        assert_eq!(normalize_type("char *"), "char*");
    }

    #[test]
    fn signature_key_is_spelling_stable() {
        let a = signature_key("LoadModel", ["const std::string &", "bool"].into_iter());
        let b = signature_key("LoadModel", ["const std::string&", "bool"].into_iter());
        assert_eq!(a, b);
        assert_eq!(a, "LoadModel(const std::string&,bool)");
    }

    #[test]
    fn signature_key_distinguishes_overloads() {
        let a = signature_key("Run", ["int"].into_iter());
        let b = signature_key("Run", ["unsigned int"].into_iter());
        assert_ne!(a, b);
    }

    #[test]
    fn arity_key_format() {
        assert_eq!(arity_key("Run", 0), "Run/0");
        assert_eq!(arity_key("LoadModel", 5), "LoadModel/5");
    }
}

//! Canonical type classification.
//!
//! Classification is a total function: every C++ type spelling maps to
//! exactly one [`TypeClass`], with [`TypeClass::Handle`] as the catch-all,
//! so generation never fails on an unrecognized type.

use std::fmt;

/// Canonical classification outcome for one C++ type spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeClass {
    /// `bool`.
    Boolean,
    /// Arithmetic types that pass through natively.
    Numeric,
    /// `std::string` in any const/reference form.
    Str,
    /// `std::filesystem::path` — string-like at the boundary, reconstructed
    /// from a string in the glue layer.
    Path,
    /// `std::vector<std::string>` — representable in return position only.
    StringArray,
    /// A resolved enumeration or flag group, by target-facing name.
    Enum(String),
    /// Address-sized opaque handle: pointers, references, unmodeled values.
    Handle,
}

impl TypeClass {
    /// Target-language (TypeScript) type spelling.
    pub fn ts_type(&self) -> String {
        match self {
            Self::Boolean => "boolean".into(),
            Self::Numeric | Self::Handle => "number".into(),
            Self::Str | Self::Path => "string".into(),
            Self::StringArray => "string[]".into(),
            Self::Enum(name) => name.clone(),
        }
    }

    /// Whether this class is a built-in target-language type (as opposed to
    /// a generated enum/flag name that needs importing).
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Enum(_))
    }
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ts_type())
    }
}

const NUMERIC_TYPES: &[&str] = &[
    "int",
    "unsigned int",
    "unsigned",
    "short",
    "unsigned short",
    "long",
    "unsigned long",
    "long long",
    "unsigned long long",
    "float",
    "double",
    "long double",
    "size_t",
    "std::size_t",
    "ssize_t",
    "ptrdiff_t",
    "int8_t",
    "int16_t",
    "int32_t",
    "int64_t",
    "uint8_t",
    "uint16_t",
    "uint32_t",
    "uint64_t",
    "std::int8_t",
    "std::int16_t",
    "std::int32_t",
    "std::int64_t",
    "std::uint8_t",
    "std::uint16_t",
    "std::uint32_t",
    "std::uint64_t",
    "char",
    "signed char",
    "unsigned char",
];

const STRING_TYPES: &[&str] = &["std::string", "string", "std::basic_string<char>"];

const PATH_TYPES: &[&str] = &["std::filesystem::path", "filesystem::path", "fs::path"];

const STRING_VECTOR_TYPES: &[&str] = &[
    "std::vector<std::string>",
    "vector<std::string>",
    "std::vector<string>",
];

/// Strip qualifiers and pointer/reference markers down to the bare name:
/// leading `const`/`volatile`, `enum`/`struct`/`class` tag keywords,
/// trailing `&`/`*` and trailing `const`.
pub fn strip_qualifiers(ty: &str) -> String {
    let mut s = ty.trim();
    loop {
        let before = s;
        for prefix in ["const ", "volatile ", "enum ", "struct ", "class "] {
            if let Some(rest) = s.strip_prefix(prefix) {
                s = rest.trim_start();
            }
        }
        for suffix in ["&", "*"] {
            if let Some(rest) = s.strip_suffix(suffix) {
                s = rest.trim_end();
            }
        }
        if let Some(rest) = s.strip_suffix(" const") {
            s = rest.trim_end();
        }
        if s == before {
            break;
        }
    }
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether a bare type name looks like an enumeration by naming convention:
/// a lowercase `e` followed by an uppercase letter, or a `Mode`/`Type`
/// suffix.
pub fn looks_enum_like(bare: &str) -> bool {
    let mut chars = bare.chars();
    if let (Some('e'), Some(second)) = (chars.next(), chars.next()) {
        if second.is_ascii_uppercase() {
            return true;
        }
    }
    bare.len() > 4 && (bare.ends_with("Mode") || bare.ends_with("Type"))
}

/// Classify a type spelling in parameter position.
///
/// `enum_lookup` maps an acceptable spelling variant to a resolved target
/// enum/flag name; it is consulted for the raw spelling and the bare name
/// before the structural rules apply.
pub fn classify(ty: &str, enum_lookup: impl Fn(&str) -> Option<String>) -> TypeClass {
    let trimmed = ty.trim();
    let bare = strip_qualifiers(trimmed);

    if let Some(target) = enum_lookup(trimmed).or_else(|| enum_lookup(&bare)) {
        return TypeClass::Enum(target);
    }

    if bare == "bool" {
        return TypeClass::Boolean;
    }
    if STRING_TYPES.contains(&bare.as_str()) {
        return TypeClass::Str;
    }
    if PATH_TYPES.contains(&bare.as_str()) {
        return TypeClass::Path;
    }
    // Pointers and references to non-string types are opaque handles.
    if trimmed.ends_with('*') || (trimmed.ends_with('&') && !is_numeric(&bare)) {
        return TypeClass::Handle;
    }
    if is_numeric(&bare) {
        return TypeClass::Numeric;
    }
    TypeClass::Handle
}

/// Classify a type spelling in return position. Identical to [`classify`]
/// except that a string vector is representable here.
pub fn classify_return(ty: &str, enum_lookup: impl Fn(&str) -> Option<String>) -> TypeClass {
    let bare = strip_qualifiers(ty.trim());
    if STRING_VECTOR_TYPES.contains(&bare.as_str()) {
        return TypeClass::StringArray;
    }
    classify(ty, enum_lookup)
}

fn is_numeric(bare: &str) -> bool {
    NUMERIC_TYPES.contains(&bare)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_enums(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn strips_qualifiers_down_to_bare_name() {
        assert_eq!(strip_qualifiers("const std::string &"), "std::string");
        assert_eq!(strip_qualifiers("const std::string&"), "std::string");
        assert_eq!(strip_qualifiers("enum eMode"), "eMode");
        assert_eq!(strip_qualifiers("const Engine *"), "Engine");
        assert_eq!(strip_qualifiers("char *const"), "char");
        assert_eq!(strip_qualifiers("unsigned  int"), "unsigned int");
    }

    #[test]
    fn classifies_builtin_scalars() {
        assert_eq!(classify("bool", no_enums), TypeClass::Boolean);
        assert_eq!(classify("int", no_enums), TypeClass::Numeric);
        assert_eq!(classify("unsigned long", no_enums), TypeClass::Numeric);
        assert_eq!(classify("double", no_enums), TypeClass::Numeric);
        assert_eq!(classify("size_t", no_enums), TypeClass::Numeric);
    }

    #[test]
    fn classifies_string_like() {
        assert_eq!(classify("std::string", no_enums), TypeClass::Str);
        assert_eq!(classify("const std::string &", no_enums), TypeClass::Str);
        assert_eq!(classify("const std::filesystem::path &", no_enums), TypeClass::Path);
    }

    #[test]
    fn pointers_and_references_are_handles() {
        assert_eq!(classify("Engine *", no_enums), TypeClass::Handle);
        assert_eq!(classify("const Engine &", no_enums), TypeClass::Handle);
        assert_eq!(classify("void *", no_enums), TypeClass::Handle);
    }

    #[test]
    fn unknown_value_types_fall_back_to_handle() {
        // Totality: nothing escapes classification.
        assert_eq!(classify("SomeOpaqueThing", no_enums), TypeClass::Handle);
        assert_eq!(classify("std::map<int, int>", no_enums), TypeClass::Handle);
        assert_eq!(classify("", no_enums), TypeClass::Handle);
    }

    #[test]
    fn enum_lookup_wins_over_structural_rules() {
        let lookup = |s: &str| (s == "eMode").then(|| "eMode".to_string());
        assert_eq!(classify("eMode", lookup), TypeClass::Enum("eMode".into()));
        assert_eq!(classify("enum eMode", lookup), TypeClass::Enum("eMode".into()));
    }

    #[test]
    fn string_vector_only_in_return_position() {
        assert_eq!(
            classify_return("std::vector<std::string>", no_enums),
            TypeClass::StringArray
        );
        assert_eq!(
            classify("std::vector<std::string>", no_enums),
            TypeClass::Handle
        );
    }

    #[test]
    fn enum_like_heuristic() {
        assert!(looks_enum_like("eMode"));
        assert!(looks_enum_like("eVoiceQuality"));
        assert!(looks_enum_like("PlaybackMode"));
        assert!(looks_enum_like("SampleType"));
        assert!(!looks_enum_like("error"));
        assert!(!looks_enum_like("Mode"));
        assert!(!looks_enum_like("int"));
        assert!(!looks_enum_like("e"));
    }

    #[test]
    fn ts_type_mapping() {
        assert_eq!(TypeClass::Boolean.ts_type(), "boolean");
        assert_eq!(TypeClass::Numeric.ts_type(), "number");
        assert_eq!(TypeClass::Handle.ts_type(), "number");
        assert_eq!(TypeClass::Str.ts_type(), "string");
        assert_eq!(TypeClass::Path.ts_type(), "string");
        assert_eq!(TypeClass::StringArray.ts_type(), "string[]");
        assert_eq!(TypeClass::Enum("eMode".into()).ts_type(), "eMode");
    }
}

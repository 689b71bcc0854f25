//! Native glue layer rendering.
//!
//! One value-safe free function per method overload plus a registration
//! block. The transport rule is conservative: booleans and arithmetic types
//! pass through natively, string/path-likes pass as read-only string
//! references, resolved enums travel as `int`, and everything else becomes
//! an address-sized integer handle reinterpreted back to its real type by
//! form (pointer, reference, or value).

use crate::application::services::resolve_service::Resolution;
use crate::codegen::{GENERATED_BANNER, registered_name, returns_void};
use crate::domain::classify::{self, TypeClass};
use crate::domain::method::{Method, Param};
use crate::domain::naming::MethodGroup;

/// Render the glue translation unit.
pub fn render(
    class_name: &str,
    header_include: &str,
    groups: &[MethodGroup],
    resolution: &Resolution,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("// {GENERATED_BANNER}\n\n"));
    out.push_str(&format!("#include \"{header_include}\"\n\n"));
    out.push_str("#include <emscripten/bind.h>\n\n");
    out.push_str("#include <cstdint>\n");
    out.push_str("#include <filesystem>\n");
    out.push_str("#include <string>\n");
    out.push_str("#include <type_traits>\n");
    out.push_str("#include <vector>\n\n");
    out.push_str(TRANSPORT_HELPERS);
    out.push('\n');

    let mut uses_string_vector = false;

    for group in groups {
        for (idx, method) in group.overloads.iter().enumerate() {
            if resolution.return_class(method) == TypeClass::StringArray {
                uses_string_vector = true;
            }
            render_wrapper(&mut out, class_name, group, idx, method, resolution);
            out.push('\n');
        }
    }

    render_registration(&mut out, class_name, groups, uses_string_vector);
    out
}

/// Overloaded conversions from a native result to its transport value.
const TRANSPORT_HELPERS: &str = r#"namespace {

template <typename T, typename std::enable_if<std::is_arithmetic<T>::value, int>::type = 0>
T to_transport(T value) { return value; }

inline std::string to_transport(std::string value) { return value; }

inline std::string to_transport(const std::filesystem::path& value) { return value.string(); }

inline std::vector<std::string> to_transport(std::vector<std::string> value) { return value; }

template <typename T>
std::uintptr_t to_transport(T* value) { return reinterpret_cast<std::uintptr_t>(value); }

template <typename T>
std::uintptr_t to_transport(const std::shared_ptr<T>& value) {
  return reinterpret_cast<std::uintptr_t>(value.get());
}

template <typename T, typename std::enable_if<!std::is_arithmetic<T>::value, int>::type = 0>
std::uintptr_t to_transport(T& value) { return reinterpret_cast<std::uintptr_t>(&value); }

}  // namespace
"#;

/// Name of the free wrapper function for one overload.
fn wrapper_fn_name(class_name: &str, group: &MethodGroup, overload_idx: usize) -> String {
    let registered = registered_name(group, overload_idx);
    format!("{class_name}_{registered}")
}

fn render_wrapper(
    out: &mut String,
    class_name: &str,
    group: &MethodGroup,
    overload_idx: usize,
    method: &Method,
    resolution: &Resolution,
) {
    let fn_name = wrapper_fn_name(class_name, group, overload_idx);

    let mut decls = vec![format!("{class_name}& self")];
    let mut forwards = Vec::with_capacity(method.params.len());
    for (idx, param) in method.params.iter().enumerate() {
        let (decl, forward) = transport_param(&resolution.param_class(method, idx), param);
        decls.push(decl);
        forwards.push(forward);
    }

    let call = format!("self.{}({})", method.name, forwards.join(", "));
    let signature = format!("({})", decls.join(", "));

    if returns_void(method) {
        out.push_str(&format!("static void {fn_name}{signature} {{\n  {call};\n}}\n"));
        return;
    }

    let result = match resolution.return_class(method) {
        TypeClass::Enum(_) => format!("static_cast<int>({call})"),
        _ => call,
    };
    out.push_str(&format!(
        "static auto {fn_name}{signature} {{\n  return to_transport({result});\n}}\n"
    ));
}

/// Transport declaration and forwarding expression for one parameter.
fn transport_param(class: &TypeClass, param: &Param) -> (String, String) {
    let name = &param.name;
    let bare = classify::strip_qualifiers(&param.ty);
    match class {
        TypeClass::Boolean => (format!("bool {name}"), name.clone()),
        TypeClass::Numeric => (format!("{bare} {name}"), name.clone()),
        TypeClass::Str => (format!("const std::string& {name}"), name.clone()),
        TypeClass::Path => (
            format!("const std::string& {name}"),
            format!("std::filesystem::path({name})"),
        ),
        TypeClass::Enum(_) => {
            let forward = if classify::classify(&param.ty, |_| None) == TypeClass::Numeric {
                // Flag-group parameters are plain integers in the native
                // signature already.
                name.clone()
            } else {
                format!("static_cast<{bare}>({name})")
            };
            (format!("int {name}"), forward)
        }
        TypeClass::StringArray | TypeClass::Handle => {
            let trimmed = param.ty.trim();
            let forward = if trimmed.ends_with('*') {
                format!("reinterpret_cast<{bare}*>({name})")
            } else {
                // References and values both travel as the object's address.
                format!("*reinterpret_cast<{bare}*>({name})")
            };
            (format!("std::uintptr_t {name}"), forward)
        }
    }
}

fn render_registration(
    out: &mut String,
    class_name: &str,
    groups: &[MethodGroup],
    uses_string_vector: bool,
) {
    out.push_str(&format!("EMSCRIPTEN_BINDINGS({class_name}_bindings) {{\n"));
    out.push_str(&format!(
        "  emscripten::class_<{class_name}>(\"{class_name}\")\n      .constructor<>()"
    ));
    for group in groups {
        for idx in 0..group.overloads.len() {
            let registered = registered_name(group, idx);
            let fn_name = wrapper_fn_name(class_name, group, idx);
            out.push_str(&format!("\n      .function(\"{registered}\", &{fn_name})"));
        }
    }
    out.push_str(";\n");
    if uses_string_vector {
        out.push_str("  emscripten::register_vector<std::string>(\"StringVector\");\n");
    }
    out.push_str("}\n");
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::method::DefaultValue;
    use crate::domain::naming::build_method_groups;

    fn render_for(methods: Vec<Method>) -> String {
        let groups = build_method_groups(&methods).unwrap();
        render("Engine", "engine.h", &groups, &Resolution::default())
    }

    #[test]
    fn string_reference_forwards_without_cast() {
        // A read-only string reference passes straight through.
        let out = render_for(vec![Method::new("LoadModel", "bool").with_params(vec![
            Param::new("path", "const std::string &"),
            Param::new("preload", "bool").with_default(DefaultValue::Bool(true)),
        ])]);
        assert!(out.contains(
            "static auto Engine_LoadModel(Engine& self, const std::string& path, bool preload)"
        ));
        assert!(out.contains("return to_transport(self.LoadModel(path, preload));"));
        assert!(!out.contains("reinterpret_cast<std::string"));
    }

    #[test]
    fn pointer_parameter_travels_as_handle() {
        let out = render_for(vec![Method::new("Attach", "void")
            .with_params(vec![Param::new("sink", "AudioSink *")])]);
        assert!(out.contains("std::uintptr_t sink"));
        assert!(out.contains("self.Attach(reinterpret_cast<AudioSink*>(sink));"));
    }

    #[test]
    fn reference_parameter_is_dereferenced() {
        let out = render_for(vec![Method::new("Mix", "void")
            .with_params(vec![Param::new("buffer", "const Buffer &")])]);
        assert!(out.contains("self.Mix(*reinterpret_cast<Buffer*>(buffer));"));
    }

    #[test]
    fn path_parameter_is_reconstructed() {
        let out = render_for(vec![Method::new("SetOutputDir", "void")
            .with_params(vec![Param::new("dir", "const std::filesystem::path &")])]);
        assert!(out.contains("const std::string& dir"));
        assert!(out.contains("self.SetOutputDir(std::filesystem::path(dir));"));
    }

    #[test]
    fn enum_parameter_is_static_cast() {
        let mut resolution = Resolution::default();
        resolution.definitions.add_enum(crate::domain::enums::EnumDefinition::new(
            "eMode",
            Some("Engine"),
            vec![crate::domain::enums::EnumMember::new("tA", 0)],
        ));
        let methods = vec![Method::new("SetMode", "void")
            .with_params(vec![Param::new("mode", "eMode")])];
        let groups = build_method_groups(&methods).unwrap();
        let out = render("Engine", "engine.h", &groups, &resolution);
        assert!(out.contains("int mode"));
        assert!(out.contains("self.SetMode(static_cast<eMode>(mode));"));
    }

    #[test]
    fn registration_binds_original_names_with_overload_suffixes() {
        let out = render_for(vec![
            Method::new("LoadModel", "bool")
                .with_params(vec![Param::new("path", "const std::string &")]),
            Method::new("LoadModel", "bool").with_params(vec![
                Param::new("path", "const std::string &"),
                Param::new("preload", "bool"),
            ]),
            Method::new("Run", "void"),
        ]);
        assert!(out.contains(".function(\"LoadModel\", &Engine_LoadModel)"));
        assert!(out.contains(".function(\"LoadModel_2\", &Engine_LoadModel_2)"));
        assert!(out.contains(".function(\"Run\", &Engine_Run)"));
        assert!(out.contains("EMSCRIPTEN_BINDINGS(Engine_bindings)"));
    }

    #[test]
    fn string_vector_return_registers_the_vector_type() {
        let out = render_for(vec![Method::new("ListVoices", "std::vector<std::string>")]);
        assert!(out.contains("register_vector<std::string>"));

        let without = render_for(vec![Method::new("Run", "void")]);
        assert!(!without.contains("register_vector"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let methods = vec![
            Method::new("Run", "void"),
            Method::new("Stop", "void"),
        ];
        let groups = build_method_groups(&methods).unwrap();
        let a = render("Engine", "engine.h", &groups, &Resolution::default());
        let b = render("Engine", "engine.h", &groups, &Resolution::default());
        assert_eq!(a, b);
    }
}

//! Generation orchestration.
//!
//! Runs the whole pipeline for one class: acquire the declaration tree,
//! extract and group methods, resolve enum metadata (consulting the
//! implementation file when present), render the three artifacts, and write
//! them. Fatal conditions (missing class, name collisions) abort before any
//! file is written — partial output is never produced.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::error::ApplicationError;
use crate::application::ports::{AstDumper, Filesystem, SourceTree};
use crate::application::services::extract_service;
use crate::application::services::resolve_service::{Resolution, ResolveService};
use crate::codegen::{glue, raw, wrapper};
use crate::domain::ast::AstNode;
use crate::domain::enums::{EnumDefinition, FlagDefinition};
use crate::domain::method::Method;
use crate::domain::naming::{self, MethodGroup, build_method_groups};
use crate::error::CxxbindResult;

/// One generation run's input.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Header declaring the target class.
    pub header: PathBuf,
    /// Implementation file consulted for cast-site enum inference.
    pub implementation: Option<PathBuf>,
    /// Class whose public surface is bound.
    pub class_name: String,
    /// Directory the artifacts are written into.
    pub out_dir: PathBuf,
    /// Method names (original or camel spelling) excluded from the surface.
    pub ignore: Vec<String>,
    /// Render everything but write nothing.
    pub dry_run: bool,
}

/// Counts and leftovers reported after a run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub class_name: String,
    pub methods: usize,
    pub groups: usize,
    pub enums: usize,
    pub flags: usize,
    pub unresolved: Vec<String>,
    pub artifacts: Vec<PathBuf>,
    pub dry_run: bool,
}

/// Extracted surface report for inspection, before any rendering.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub class_name: String,
    pub methods: Vec<Method>,
    pub enums: Vec<EnumDefinition>,
    pub flags: Vec<FlagDefinition>,
    pub unresolved: Vec<String>,
}

/// Drives the pipeline through the three ports.
pub struct GenerateService {
    dumper: Box<dyn AstDumper>,
    tree: Box<dyn SourceTree>,
    filesystem: Box<dyn Filesystem>,
}

impl GenerateService {
    pub fn new(
        dumper: Box<dyn AstDumper>,
        tree: Box<dyn SourceTree>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            dumper,
            tree,
            filesystem,
        }
    }

    /// Run generation end to end.
    #[instrument(skip_all, fields(class = %request.class_name))]
    pub fn generate(&self, request: &GenerateRequest) -> CxxbindResult<GenerationSummary> {
        let (methods, groups, resolution) = self.analyze(request)?;

        let class_name = request.class_name.as_str();
        let stem = naming::snake_name(class_name);
        let header_include = request
            .header
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{stem}.h"));

        let artifacts = vec![
            (
                request.out_dir.join(format!("{stem}_glue.cpp")),
                glue::render(class_name, &header_include, &groups, &resolution),
            ),
            (
                request.out_dir.join(format!("{stem}_raw.ts")),
                raw::render(class_name, &groups, &resolution),
            ),
            (
                request.out_dir.join(format!("{stem}.ts")),
                wrapper::render(class_name, &format!("./{stem}_raw"), &groups, &resolution),
            ),
        ];

        if !request.dry_run {
            for (path, content) in &artifacts {
                self.filesystem.write_file(path, content)?;
                debug!(path = %path.display(), bytes = content.len(), "wrote artifact");
            }
        }

        let summary = GenerationSummary {
            class_name: class_name.to_string(),
            methods: methods.len(),
            groups: groups.len(),
            enums: resolution.definitions.enums.len(),
            flags: resolution.definitions.flags.len(),
            unresolved: resolution.unresolved.clone(),
            artifacts: artifacts.into_iter().map(|(path, _)| path).collect(),
            dry_run: request.dry_run,
        };
        info!(
            methods = summary.methods,
            groups = summary.groups,
            enums = summary.enums,
            flags = summary.flags,
            "generation complete"
        );
        Ok(summary)
    }

    /// Run extraction and resolution only, for the inspection surface.
    #[instrument(skip_all, fields(class = %request.class_name))]
    pub fn inspect(&self, request: &GenerateRequest) -> CxxbindResult<InspectReport> {
        let (methods, _, resolution) = self.analyze(request)?;
        Ok(InspectReport {
            class_name: request.class_name.clone(),
            methods,
            enums: resolution.definitions.enums.clone(),
            flags: resolution.definitions.flags.clone(),
            unresolved: resolution.unresolved.clone(),
        })
    }

    fn analyze(
        &self,
        request: &GenerateRequest,
    ) -> CxxbindResult<(Vec<Method>, Vec<MethodGroup>, Resolution)> {
        if !self.filesystem.exists(&request.header) {
            return Err(ApplicationError::MissingInput {
                path: request.header.clone(),
            }
            .into());
        }

        let class_name = request.class_name.as_str();
        let ast = self
            .dumper
            .dump_file(&request.header, Some(class_name))
            .ok_or_else(|| ApplicationError::AstUnavailable {
                path: request.header.clone(),
            })?;

        let class_node = extract_service::locate_class(&ast, class_name)?;
        let mut methods = extract_service::extract_methods(class_node);
        methods.retain(|m| {
            let camel = naming::camel_name(&m.name);
            let ignored = request.ignore.iter().any(|i| *i == m.name || *i == camel);
            if ignored {
                debug!(method = %m.name, "ignore-listed");
            }
            !ignored
        });

        let groups = build_method_groups(&methods)?;

        let impl_ast = self.implementation_ast(request);
        let resolution = ResolveService::new(self.dumper.as_ref(), self.tree.as_ref()).resolve(
            class_node,
            class_name,
            &methods,
            impl_ast.as_ref(),
        );

        Ok((methods, groups, resolution))
    }

    fn implementation_ast(&self, request: &GenerateRequest) -> Option<AstNode> {
        let path = request.implementation.as_ref()?;
        if !self.filesystem.exists(path) {
            debug!(path = %path.display(), "implementation file absent, skipping cast-site inference");
            return None;
        }
        let filter = format!("{}::", request.class_name);
        self.dumper.dump_file(path, Some(&filter))
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockAstDumper, MockSourceTree};
    use crate::domain::error::DomainError;
    use crate::error::CxxbindError;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    /// In-memory filesystem double; every path exists as an input. Clones
    /// share the written map, so a test can keep one handle and hand
    /// another to the service.
    #[derive(Default, Clone)]
    struct TestFs {
        written: Arc<Mutex<HashMap<PathBuf, String>>>,
    }

    impl Filesystem for TestFs {
        fn write_file(&self, path: &Path, content: &str) -> CxxbindResult<()> {
            if let Ok(mut written) = self.written.lock() {
                written.insert(path.to_path_buf(), content.to_string());
            }
            Ok(())
        }

        fn exists(&self, _path: &Path) -> bool {
            true
        }
    }

    impl TestFs {
        fn files(&self) -> HashMap<PathBuf, String> {
            self.written.lock().map(|w| w.clone()).unwrap_or_default()
        }
    }

    fn dumper_for(class_json: &'static str) -> MockAstDumper {
        let mut dumper = MockAstDumper::new();
        dumper
            .expect_dump_file()
            .returning(move |_, _| serde_json::from_str(class_json).ok());
        dumper
    }

    fn bare_tree() -> MockSourceTree {
        let mut tree = MockSourceTree::new();
        tree.expect_candidate_headers().returning(|_| Vec::new());
        tree.expect_root().returning(|| PathBuf::from("/src"));
        tree
    }

    fn request() -> GenerateRequest {
        GenerateRequest {
            header: PathBuf::from("/src/engine.h"),
            implementation: None,
            class_name: "Engine".into(),
            out_dir: PathBuf::from("/out"),
            ignore: Vec::new(),
            dry_run: false,
        }
    }

    fn service(class_json: &'static str) -> GenerateService {
        GenerateService::new(
            Box::new(dumper_for(class_json)),
            Box::new(bare_tree()),
            Box::new(TestFs::default()),
        )
    }

    const SIMPLE_CLASS: &str = r#"{"kind": "TranslationUnitDecl", "inner": [
        {"kind": "CXXRecordDecl", "name": "Engine", "completeDefinition": true, "inner": [
            {"kind": "AccessSpecDecl", "access": "public"},
            {"kind": "CXXMethodDecl", "name": "Run", "type": {"qualType": "void ()"}},
            {"kind": "CXXMethodDecl", "name": "RunIC", "type": {"qualType": "bool ()"}}
        ]}
    ]}"#;

    const COLLIDING_CLASS: &str = r#"{"kind": "TranslationUnitDecl", "inner": [
        {"kind": "CXXRecordDecl", "name": "Engine", "completeDefinition": true, "inner": [
            {"kind": "AccessSpecDecl", "access": "public"},
            {"kind": "CXXMethodDecl", "name": "Foo", "type": {"qualType": "void ()"}},
            {"kind": "CXXMethodDecl", "name": "foo", "type": {"qualType": "void ()"}}
        ]}
    ]}"#;

    const ENUM_CLASS: &str = r#"{"kind": "TranslationUnitDecl", "inner": [
        {"kind": "CXXRecordDecl", "name": "Engine", "completeDefinition": true, "inner": [
            {"kind": "AccessSpecDecl", "access": "public"},
            {"kind": "EnumDecl", "name": "eMode", "inner": [
                {"kind": "EnumConstantDecl", "name": "tA"},
                {"kind": "EnumConstantDecl", "name": "tB"},
                {"kind": "EnumConstantDecl", "name": "tC"}
            ]},
            {"kind": "CXXMethodDecl", "name": "SetMode", "type": {"qualType": "void (eMode)"},
             "inner": [{"kind": "ParmVarDecl", "name": "mode", "type": {"qualType": "eMode"}}]}
        ]}
    ]}"#;

    #[test]
    fn zero_arg_methods_generate_across_all_artifacts() {
        // Scenario: `void Run()` and `bool RunIC()` appear camel-renamed in
        // the raw interface and forward with no arguments in the wrapper.
        let fs = TestFs::default();
        let svc = GenerateService::new(
            Box::new(dumper_for(SIMPLE_CLASS)),
            Box::new(bare_tree()),
            Box::new(fs.clone()),
        );
        let summary = svc.generate(&request()).unwrap();

        assert_eq!(summary.methods, 2);
        assert_eq!(summary.groups, 2);
        // Written artifacts land under the out dir with the snake stem.
        assert_eq!(summary.artifacts, vec![
            PathBuf::from("/out/engine_glue.cpp"),
            PathBuf::from("/out/engine_raw.ts"),
            PathBuf::from("/out/engine.ts"),
        ]);
        let files = fs.files();
        let raw_ts = &files[&PathBuf::from("/out/engine_raw.ts")];
        assert!(raw_ts.contains("run(): void;"));
        assert!(raw_ts.contains("runIC(): boolean;"));
        let wrapper_ts = &files[&PathBuf::from("/out/engine.ts")];
        assert!(wrapper_ts.contains("this.raw.run();"));
        assert!(wrapper_ts.contains("return this.raw.runIC();"));
        let glue_cpp = &files[&PathBuf::from("/out/engine_glue.cpp")];
        assert!(glue_cpp.contains(".function(\"Run\", &Engine_Run)"));
    }

    #[test]
    fn name_collision_aborts_with_no_output() {
        let fs = TestFs::default();
        let svc = GenerateService::new(
            Box::new(dumper_for(COLLIDING_CLASS)),
            Box::new(bare_tree()),
            Box::new(fs.clone()),
        );

        let err = svc.generate(&request()).unwrap_err();
        assert!(matches!(
            err,
            CxxbindError::Domain(DomainError::NameCollision { .. })
        ));
        assert!(fs.files().is_empty());
    }

    #[test]
    fn missing_class_is_fatal() {
        let svc = service(r#"{"kind": "TranslationUnitDecl", "inner": []}"#);
        let err = svc.generate(&request()).unwrap_err();
        assert!(matches!(
            err,
            CxxbindError::Domain(DomainError::ClassNotFound { .. })
        ));
    }

    #[test]
    fn unavailable_ast_is_an_application_error() {
        let mut dumper = MockAstDumper::new();
        dumper.expect_dump_file().returning(|_, _| None);
        let svc = GenerateService::new(
            Box::new(dumper),
            Box::new(bare_tree()),
            Box::new(TestFs::default()),
        );
        let err = svc.generate(&request()).unwrap_err();
        assert!(matches!(
            err,
            CxxbindError::Application(ApplicationError::AstUnavailable { .. })
        ));
    }

    #[test]
    fn class_enum_flows_into_artifacts() {
        let fs = TestFs::default();
        let svc = GenerateService::new(
            Box::new(dumper_for(ENUM_CLASS)),
            Box::new(bare_tree()),
            Box::new(fs.clone()),
        );
        let summary = svc.generate(&request()).unwrap();

        assert_eq!(summary.enums, 1);
        let files = fs.files();
        let raw_ts = &files[&PathBuf::from("/out/engine_raw.ts")];
        assert!(raw_ts.contains("export const enum eMode {"));
        assert!(raw_ts.contains("setMode(mode: eMode): void;"));
        let wrapper_ts = &files[&PathBuf::from("/out/engine.ts")];
        assert!(wrapper_ts.contains("import { EngineRaw, eMode }"));
    }

    #[test]
    fn generation_is_idempotent() {
        let svc = service(SIMPLE_CLASS);
        let mut req = request();
        req.dry_run = true;
        let first = svc.generate(&req).unwrap();
        let second = svc.generate(&req).unwrap();
        assert_eq!(first.methods, second.methods);

        // Byte-identical artifacts on repeated rendering.
        let fs = TestFs::default();
        let svc = GenerateService::new(
            Box::new(dumper_for(SIMPLE_CLASS)),
            Box::new(bare_tree()),
            Box::new(fs.clone()),
        );
        let req = request();
        svc.generate(&req).unwrap();
        let once = fs.files();
        svc.generate(&req).unwrap();
        assert_eq!(once, fs.files());
    }

    #[test]
    fn dry_run_renders_but_writes_nothing() {
        let fs = TestFs::default();
        let svc = GenerateService::new(
            Box::new(dumper_for(SIMPLE_CLASS)),
            Box::new(bare_tree()),
            Box::new(fs.clone()),
        );
        let mut req = request();
        req.dry_run = true;
        let summary = svc.generate(&req).unwrap();
        assert!(summary.dry_run);
        assert_eq!(summary.artifacts.len(), 3);
        assert!(fs.files().is_empty());
    }

    #[test]
    fn ignore_list_removes_methods_by_either_spelling() {
        let svc = service(SIMPLE_CLASS);
        let mut req = request();
        req.ignore = vec!["runIC".into()];
        req.dry_run = true;
        let summary = svc.generate(&req).unwrap();
        assert_eq!(summary.methods, 1);

        let mut req = request();
        req.ignore = vec!["RunIC".into()];
        req.dry_run = true;
        assert_eq!(svc.generate(&req).unwrap().methods, 1);
    }

    #[test]
    fn inspect_reports_surface_without_writing() {
        let fs = TestFs::default();
        let svc = GenerateService::new(
            Box::new(dumper_for(ENUM_CLASS)),
            Box::new(bare_tree()),
            Box::new(fs.clone()),
        );
        let report = svc.inspect(&request()).unwrap();
        assert_eq!(report.methods.len(), 1);
        assert_eq!(report.enums.len(), 1);
        assert!(fs.files().is_empty());
        // Reports serialize for machine consumption.
        assert!(serde_json::to_string(&report).unwrap().contains("SetMode"));
    }
}

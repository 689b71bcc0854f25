//! Implementation of the `cxxbind generate` command.
//!
//! Responsibility: translate CLI arguments into a core request, run the
//! generation service, and display the summary. No binding logic lives here.

use std::path::PathBuf;

use tracing::{info, instrument};

use cxxbind_core::application::{GenerateRequest, GenerationSummary};

use crate::{
    cli::{GenerateArgs, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `cxxbind generate` command.
///
/// Dispatch sequence:
/// 1. Merge CLI flags with config into a `GenerateRequest`
/// 2. Wire the clang dumper, header search, and filesystem adapters
/// 3. Run the generation service (it validates inputs and aborts before
///    any write on fatal conditions)
/// 4. Render the summary in the requested format
#[instrument(skip_all, fields(class = %args.class))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let request = build_request(&args, &config);

    if let Some(impl_path) = &request.implementation {
        if !impl_path.exists() {
            output.warning(&format!(
                "implementation file {} not found; enum cast-site inference skipped",
                impl_path.display()
            ))?;
        }
    }

    let source_root = super::resolve_source_root(args.source_root.as_ref(), &config, &args.header);
    let service = super::build_service(
        &source_root,
        super::resolve_compilers(&args.compilers, &config),
        args.dialect.as_deref(),
        &config,
    );

    info!(
        header = %request.header.display(),
        out_dir = %request.out_dir.display(),
        dry_run = request.dry_run,
        "generation started"
    );
    let summary = service.generate(&request).map_err(CliError::Core)?;

    render_summary(&summary, &global, &output)?;
    Ok(())
}

/// Merge flags and config into the core request. Flags win.
fn build_request(args: &GenerateArgs, config: &AppConfig) -> GenerateRequest {
    let out_dir = args
        .out_dir
        .clone()
        .or_else(|| config.generate.out_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    GenerateRequest {
        header: args.header.clone(),
        implementation: args.implementation.clone(),
        class_name: args.class.clone(),
        out_dir,
        ignore: super::resolve_ignore(&args.ignore, config),
        dry_run: args.dry_run,
    }
}

fn render_summary(
    summary: &GenerationSummary,
    global: &GlobalArgs,
    output: &OutputManager,
) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let json = serde_json::to_string_pretty(summary).map_err(|e| CliError::InvalidInput {
            message: format!("serialising summary: {e}"),
            source: Some(Box::new(e)),
        })?;
        println!("{json}");
        return Ok(());
    }

    if summary.dry_run {
        output.info(&format!(
            "Dry run: would write {} artifacts for '{}'",
            summary.artifacts.len(),
            summary.class_name
        ))?;
    } else {
        output.success(&format!(
            "Bound '{}': {} methods in {} groups",
            summary.class_name, summary.methods, summary.groups
        ))?;
    }

    for path in &summary.artifacts {
        output.print(&format!("  {}", path.display()))?;
    }

    if summary.enums > 0 || summary.flags > 0 {
        output.print(&format!(
            "  {} enum definitions, {} flag groups",
            summary.enums, summary.flags
        ))?;
    }

    for name in &summary.unresolved {
        output.warning(&format!("unresolved enum type: {name}"))?;
    }
    if !summary.unresolved.is_empty() && !global.quiet {
        output.print("  (unresolved types are passed through as plain numbers)")?;
    }

    Ok(())
}

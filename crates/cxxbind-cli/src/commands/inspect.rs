//! Implementation of the `cxxbind inspect` command.
//!
//! Runs extraction and enum resolution without rendering or writing
//! anything, so a user can see what the generator would bind.

use std::path::PathBuf;

use tracing::instrument;

use cxxbind_core::application::{GenerateRequest, InspectReport};

use crate::{
    cli::{InspectArgs, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `cxxbind inspect` command.
#[instrument(skip_all, fields(class = %args.class))]
pub fn execute(
    args: InspectArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let request = GenerateRequest {
        header: args.header.clone(),
        implementation: args.implementation.clone(),
        class_name: args.class.clone(),
        out_dir: PathBuf::from("."),
        ignore: super::resolve_ignore(&args.ignore, &config),
        dry_run: true,
    };

    let source_root = super::resolve_source_root(args.source_root.as_ref(), &config, &args.header);
    let service = super::build_service(
        &source_root,
        super::resolve_compilers(&args.compilers, &config),
        args.dialect.as_deref(),
        &config,
    );

    let report = service.inspect(&request).map_err(CliError::Core)?;
    render_report(&report, &output)
}

fn render_report(report: &InspectReport, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let json = serde_json::to_string_pretty(report).map_err(|e| CliError::InvalidInput {
            message: format!("serialising report: {e}"),
            source: Some(Box::new(e)),
        })?;
        println!("{json}");
        return Ok(());
    }

    output.header(&format!("class {}", report.class_name))?;
    for method in &report.methods {
        let params = method
            .params
            .iter()
            .map(|p| match &p.default {
                Some(d) => format!("{}: {} = {}", p.name, p.ty, d.render()),
                None => format!("{}: {}", p.name, p.ty),
            })
            .collect::<Vec<_>>()
            .join(", ");
        output.print(&format!(
            "  {}({}) -> {}",
            method.name, params, method.return_type
        ))?;
    }

    if !report.enums.is_empty() {
        output.print("")?;
        output.header("enums")?;
        for def in &report.enums {
            let members = def
                .members
                .iter()
                .map(|m| format!("{} = {}", m.name, m.value))
                .collect::<Vec<_>>()
                .join(", ");
            output.print(&format!("  {} {{ {} }}", def.target_name, members))?;
        }
    }

    if !report.flags.is_empty() {
        output.print("")?;
        output.header("flag groups")?;
        for def in &report.flags {
            let members = def
                .members
                .iter()
                .map(|m| format!("{} = {}", m.name, m.value))
                .collect::<Vec<_>>()
                .join(", ");
            output.print(&format!("  {} {{ {} }}", def.target_name, members))?;
        }
    }

    for name in &report.unresolved {
        output.warning(&format!("unresolved enum type: {name}"))?;
    }

    Ok(())
}

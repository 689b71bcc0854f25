//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "cxxbind",
    bin_name = "cxxbind",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f517} C++ to TypeScript binding generator",
    long_about = "Cxxbind reads a C++ header through the clang front end and \
                  emits Embind glue plus typed TypeScript wrappers for one class.",
    after_help = "EXAMPLES:\n\
        \x20 cxxbind generate include/engine.h Engine --impl src/engine.cpp\n\
        \x20 cxxbind generate include/engine.h Engine --out-dir bindings --dry-run\n\
        \x20 cxxbind inspect include/engine.h Engine\n\
        \x20 cxxbind completions bash > /usr/share/bash-completion/completions/cxxbind",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate bindings for a class.
    #[command(
        visible_alias = "g",
        about = "Generate glue and wrapper artifacts for one class",
        after_help = "EXAMPLES:\n\
            \x20 cxxbind generate include/engine.h Engine\n\
            \x20 cxxbind generate include/engine.h Engine --impl src/engine.cpp --out-dir bindings\n\
            \x20 cxxbind generate include/engine.h Engine --ignore InternalTick --dry-run"
    )]
    Generate(GenerateArgs),

    /// Show the extracted public surface without generating anything.
    #[command(
        visible_alias = "i",
        about = "Inspect a class's extracted surface and enum metadata",
        after_help = "EXAMPLES:\n\
            \x20 cxxbind inspect include/engine.h Engine\n\
            \x20 cxxbind inspect include/engine.h Engine --output-format json"
    )]
    Inspect(InspectArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 cxxbind completions bash > ~/.local/share/bash-completion/completions/cxxbind\n\
            \x20 cxxbind completions zsh  > ~/.zfunc/_cxxbind\n\
            \x20 cxxbind completions fish > ~/.config/fish/completions/cxxbind.fish"
    )]
    Completions(CompletionsArgs),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `cxxbind generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Header file declaring the target class.
    #[arg(value_name = "HEADER", help = "Header declaring the class")]
    pub header: PathBuf,

    /// Class whose public methods are bound.
    #[arg(value_name = "CLASS", help = "Class name to bind")]
    pub class: String,

    /// Implementation file, consulted for enum cast-site inference.
    #[arg(
        short = 'i',
        long = "impl",
        value_name = "FILE",
        help = "Implementation file for cast-site enum inference"
    )]
    pub implementation: Option<PathBuf>,

    /// Directory the three artifacts are written into.
    #[arg(
        short = 'o',
        long = "out-dir",
        value_name = "DIR",
        help = "Output directory (default: current directory)"
    )]
    pub out_dir: Option<PathBuf>,

    /// Root of the library source tree searched for external enum headers.
    #[arg(
        short = 'r',
        long = "source-root",
        value_name = "DIR",
        help = "Source tree root (default: the header's directory)"
    )]
    pub source_root: Option<PathBuf>,

    /// Compiler binaries tried in order.
    #[arg(
        long = "compiler",
        value_name = "BIN",
        help = "Compiler binary to try (repeatable; default: clang++, clang)"
    )]
    pub compilers: Vec<String>,

    /// Language dialect passed as `-std=`.
    #[arg(long = "std", value_name = "DIALECT", help = "C++ dialect (default: c++17)")]
    pub dialect: Option<String>,

    /// Method names excluded from the binding surface.
    #[arg(
        long = "ignore",
        value_name = "NAME",
        value_delimiter = ',',
        help = "Method to skip, original or camel spelling (repeatable)"
    )]
    pub ignore: Vec<String>,

    /// Render everything but write nothing.
    #[arg(long = "dry-run", help = "Show what would be generated without writing")]
    pub dry_run: bool,
}

// ── inspect ───────────────────────────────────────────────────────────────────

/// Arguments for `cxxbind inspect`.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Header file declaring the target class.
    #[arg(value_name = "HEADER", help = "Header declaring the class")]
    pub header: PathBuf,

    /// Class whose public methods are inspected.
    #[arg(value_name = "CLASS", help = "Class name to inspect")]
    pub class: String,

    /// Implementation file, consulted for enum cast-site inference.
    #[arg(
        short = 'i',
        long = "impl",
        value_name = "FILE",
        help = "Implementation file for cast-site enum inference"
    )]
    pub implementation: Option<PathBuf>,

    /// Root of the library source tree searched for external enum headers.
    #[arg(
        short = 'r',
        long = "source-root",
        value_name = "DIR",
        help = "Source tree root (default: the header's directory)"
    )]
    pub source_root: Option<PathBuf>,

    /// Compiler binaries tried in order.
    #[arg(
        long = "compiler",
        value_name = "BIN",
        help = "Compiler binary to try (repeatable; default: clang++, clang)"
    )]
    pub compilers: Vec<String>,

    /// Language dialect passed as `-std=`.
    #[arg(long = "std", value_name = "DIALECT", help = "C++ dialect (default: c++17)")]
    pub dialect: Option<String>,

    /// Method names excluded from the inspected surface.
    #[arg(
        long = "ignore",
        value_name = "NAME",
        value_delimiter = ',',
        help = "Method to skip, original or camel spelling (repeatable)"
    )]
    pub ignore: Vec<String>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `cxxbind completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from([
            "cxxbind",
            "generate",
            "include/engine.h",
            "Engine",
            "--impl",
            "src/engine.cpp",
            "--out-dir",
            "bindings",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.header, PathBuf::from("include/engine.h"));
        assert_eq!(args.class, "Engine");
        assert_eq!(args.implementation, Some(PathBuf::from("src/engine.cpp")));
        assert_eq!(args.out_dir, Some(PathBuf::from("bindings")));
        assert!(!args.dry_run);
    }

    #[test]
    fn generate_alias_and_repeatable_flags() {
        let cli = Cli::parse_from([
            "cxxbind",
            "g",
            "engine.h",
            "Engine",
            "--compiler",
            "clang-18",
            "--compiler",
            "clang++",
            "--ignore",
            "Tick,InternalReset",
            "--dry-run",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.compilers, vec!["clang-18", "clang++"]);
        assert_eq!(args.ignore, vec!["Tick", "InternalReset"]);
        assert!(args.dry_run);
    }

    #[test]
    fn parse_inspect_command() {
        let cli = Cli::parse_from(["cxxbind", "inspect", "engine.h", "Engine"]);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected Inspect command");
        };
        assert_eq!(args.class, "Engine");
        assert!(args.implementation.is_none());
    }

    #[test]
    fn missing_class_is_rejected() {
        let result = Cli::try_parse_from(["cxxbind", "generate", "engine.h"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        // clap should reject --quiet --verbose together
        let result =
            Cli::try_parse_from(["cxxbind", "--quiet", "--verbose", "inspect", "e.h", "E"]);
        assert!(result.is_err());
    }
}

//! rpc-stencil CLI
//!
//! Usage:
//!   rpc-stencil --manifest functions.toml --templates templates.toml
//!
//! Options:
//!   -m, --manifest <FILE>   Function manifest (TOML)
//!   -t, --templates <FILE>  Template set, one template per client kind (TOML)
//!   -k, --kind <KIND>       Client kind(s) to generate (default: all)
//!   -o, --out <FILE>        Output file (stdout if not provided)
//!       --sentinel <LIT>    Literal for empty argument lists (default: nil)

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rpc_stencil::{
    manifest_from_file, Engine, FunctionDescriptor, GenerateError, RenderOptions, TemplateSet,
};

#[derive(Parser)]
#[command(name = "rpc-stencil")]
#[command(about = "Template-driven generator for RPC client method bodies")]
struct Cli {
    /// Function manifest file (TOML)
    #[arg(short, long)]
    manifest: PathBuf,

    /// Template set file (TOML)
    #[arg(short, long)]
    templates: PathBuf,

    /// Client kind(s) to generate; may be repeated (default: every kind in
    /// the template set)
    #[arg(short, long)]
    kind: Vec<String>,

    /// Output file (stdout if not provided)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Literal emitted for empty argument lists
    #[arg(long, default_value = "nil")]
    sentinel: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let descriptors = match manifest_from_file(&cli.manifest) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error loading manifest '{}': {}", cli.manifest.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let templates = match TemplateSet::from_file(&cli.templates) {
        Ok(t) => t,
        Err(e) => {
            eprintln!(
                "Error loading templates '{}': {}",
                cli.templates.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    let kinds: Vec<String> = if cli.kind.is_empty() {
        templates.kinds().map(str::to_string).collect()
    } else {
        cli.kind.clone()
    };
    if kinds.is_empty() {
        eprintln!("Error: template set '{}' is empty", cli.templates.display());
        return ExitCode::FAILURE;
    }

    let engine = Engine::new()
        .with_templates(templates)
        .with_options(RenderOptions::new().with_empty_args_sentinel(cli.sentinel.clone()));

    match generate_kinds(&engine, &kinds, &descriptors) {
        Ok(output) => match &cli.out {
            Some(path) => {
                if let Err(e) = fs::write(path, output) {
                    eprintln!("Error writing '{}': {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
                ExitCode::SUCCESS
            }
            None => {
                println!("{}", output);
                ExitCode::SUCCESS
            }
        },
        Err(failures) => {
            for line in failures {
                eprintln!("{}", line);
            }
            ExitCode::FAILURE
        }
    }
}

/// Generate every requested kind, concatenated under a generated-file header.
///
/// Collects failures across all kinds instead of stopping at the first; no
/// output is produced when any kind fails.
fn generate_kinds(
    engine: &Engine,
    kinds: &[String],
    descriptors: &[FunctionDescriptor],
) -> Result<String, Vec<String>> {
    let mut output = String::from("// File generated by rpc-stencil\n");
    let mut failures = Vec::new();

    for kind in kinds {
        match engine.generate(kind, descriptors) {
            Ok(text) => {
                output.push('\n');
                output.push_str(&text);
                output.push('\n');
            }
            Err(e) => failures.extend(describe_failure(engine, kind, &e)),
        }
    }

    if failures.is_empty() {
        Ok(output)
    } else {
        Err(failures)
    }
}

/// One stderr line (or ariadne report) per failing (kind, descriptor, reason).
fn describe_failure(engine: &Engine, kind: &str, error: &GenerateError) -> Vec<String> {
    match error {
        GenerateError::Parse(parse_err) => {
            // Lex/parse errors get full source context
            match engine.templates().get(kind) {
                Some(source) => vec![parse_err.format(source, kind)],
                None => vec![format!("{}: {}", kind, parse_err)],
            }
        }
        GenerateError::Batch(batch) => batch
            .failures
            .iter()
            .map(|f| format!("{}: {}", kind, f))
            .collect(),
        other => vec![format!("{}: {}", kind, other)],
    }
}

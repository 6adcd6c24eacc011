//! CLI for `asn2proto`.
//!
//! Standalone binary exercising the `asn2proto-translate` library. The
//! real ASN.1 lexer, parser and fixer passes are out of scope for this
//! workspace; this binary's `fixtures/` directory holds JSON-serialized
//! ASTs standing in for what that frontend would hand down, so the
//! pipeline is runnable end to end without one.
//!
//! ```text
//! asn2proto-cli translate --input fixtures/s2_constrained_integer.json
//! ```

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use asn2proto_core::ast::Expr;
use asn2proto_core::ir::ProtoModule;
use asn2proto_translate::{render, render_andfree, IdentityResolver, OutputSink, RenderOptions};
use clap::Parser;
use serde::Deserialize;

/// ASN.1-to-`Protobuf` schema translator.
#[derive(Parser)]
#[command(name = "asn2proto", version, about)]
enum Cli {
    /// Translate a JSON AST fixture into proto3 text.
    Translate(TranslateArgs),
}

#[derive(Parser)]
struct TranslateArgs {
    /// Path to a JSON-serialized module fixture.
    #[arg(short, long)]
    input: PathBuf,

    /// Write rendered output here instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suppress nesting indentation (`APF_NOINDENT2`).
    #[arg(long)]
    no_indent2: bool,

    /// Consume the IR while rendering (`andfree` mode).
    #[arg(long)]
    andfree: bool,

    /// Tool name/version banner emitted in the generated-from comment.
    #[arg(long, default_value = "asn2proto-0.1")]
    tool_version: String,
}

/// The practical stand-in for a fully resolved AST handed down by the
/// parser/fixer: module metadata plus an ordered list of top-level
/// declarations, each an [`Expr`].
#[derive(Deserialize)]
struct ModuleFixture {
    module_name: String,
    source_file: String,
    #[serde(default)]
    oid: Vec<u32>,
    declarations: Vec<Expr>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli {
        Cli::Translate(args) => run_translate(&args),
    }
}

fn run_translate(args: &TranslateArgs) -> anyhow::Result<()> {
    eprintln!("Reading fixture: {}", args.input.display());
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let fixture: ModuleFixture = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    let mut module = ProtoModule::new(fixture.module_name, fixture.source_file);
    module.oid = fixture.oid;

    let resolver = IdentityResolver;
    let mut failures = 0usize;
    for decl in &fixture.declarations {
        if let Err(err) = asn2proto_translate::translate_expr(decl, &mut module, &resolver) {
            eprintln!(
                "asn2proto: failed to translate `{}`: {err}",
                decl.ident.as_deref().unwrap_or("<anonymous>")
            );
            failures += 1;
        }
    }
    if failures > 0 {
        eprintln!("asn2proto: {failures} declaration(s) failed translation; continuing best-effort");
    }

    let opts = RenderOptions { no_indent2: args.no_indent2, tool_version: args.tool_version.clone() };
    let rendered = if args.andfree { render_andfree(module, &opts) } else { render(&module, &opts) };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => OutputSink::Stdout.write_rendered(&rendered).context("Failed to write to standard output")?,
    }

    Ok(())
}

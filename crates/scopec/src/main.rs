//! scopec - resolve names in a parsed program
//!
//! Usage: scopec [OPTIONS] <ast>

use clap::{Parser as ClapParser, ValueEnum};
use scope_checker::driver::{render_report, EXIT_FATAL};
use scope_checker::{Pipeline, ReportFormat, ResolverConfig};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Symbol report format
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
enum Format {
    /// Aligned text table
    #[default]
    Table,
    /// JSON array of symbols
    Json,
    /// No report, diagnostics only
    None,
}

#[derive(ClapParser, Debug)]
#[command(name = "scopec")]
#[command(version)]
#[command(about = "Build the symbol table for a parsed program and check its references", long_about = None)]
struct Args {
    /// Syntax tree produced by the parser, as JSON
    #[arg(required = true)]
    ast: PathBuf,

    /// Program text the tree was parsed from (enables source snippets)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Symbol report format
    #[arg(short, long, value_enum, default_value = "table")]
    format: Format,

    /// Stop at the first malformed node
    #[arg(long)]
    fatal_malformed: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(EXIT_FATAL);
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug output for this crate
/// with `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "scope_checker=debug,scopec=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn run(args: &Args) -> anyhow::Result<i32> {
    let config = ResolverConfig {
        abort_on_malformed: args.fatal_malformed,
    };
    let mut pipeline = Pipeline::new(config);

    if let Some(source) = &args.source {
        pipeline.attach_source(source)?;
    }

    let tree = pipeline.load_tree(&args.ast)?;
    let analysis = pipeline.analyze(&tree);
    pipeline.report_diagnostics(&analysis);

    let format = match args.format {
        Format::Table => ReportFormat::Table,
        Format::Json => ReportFormat::Json,
        Format::None => ReportFormat::None,
    };
    if let Some(report) = render_report(&analysis, format)? {
        println!("{}", report.trim_end());
    }

    tracing::info!(
        symbols = analysis.table.len(),
        diagnostics = analysis.diagnostics.len(),
        "analyzed {}",
        args.ast.display()
    );
    Ok(Pipeline::exit_code(&analysis))
}

//! Analysis driver: load a tree, resolve it, and report the outcome

use anyhow::Context;
use std::fs;
use std::path::Path;

use crate::ast::Node;
use crate::common::DiagnosticReporter;
use crate::sema::{Analysis, Resolver, ResolverConfig};

/// How the symbol report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Aligned text table
    #[default]
    Table,
    Json,
    /// Diagnostics only
    None,
}

/// Exit status when there is nothing to report
pub const EXIT_OK: i32 = 0;
/// Exit status when the program has duplicate or undefined names
pub const EXIT_DIAGNOSTICS: i32 = 1;
/// Exit status for malformed trees and unreadable input
pub const EXIT_FATAL: i32 = 2;

/// Pipeline that runs the resolver over a tree and reports the outcome
pub struct Pipeline {
    config: ResolverConfig,
    reporter: DiagnosticReporter,
    source_id: Option<usize>,
}

impl Pipeline {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_reporter(config, DiagnosticReporter::new())
    }

    pub fn with_reporter(config: ResolverConfig, reporter: DiagnosticReporter) -> Self {
        Self {
            config,
            reporter,
            source_id: None,
        }
    }

    /// Register the program text the tree was parsed from, so diagnostics
    /// can show the offending lines.
    pub fn add_source(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.source_id = Some(self.reporter.add_file(name, text));
    }

    pub fn attach_source(&mut self, path: &Path) -> anyhow::Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read source file {}", path.display()))?;
        self.add_source(path.display().to_string(), text);
        Ok(())
    }

    pub fn load_tree(&self, path: &Path) -> anyhow::Result<Node> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read syntax tree {}", path.display()))?;
        let tree = Node::from_json(&json)
            .with_context(|| format!("{} is not a valid syntax tree", path.display()))?;
        tracing::debug!(path = %path.display(), root = %tree.kind, "loaded syntax tree");
        Ok(tree)
    }

    pub fn analyze(&self, root: &Node) -> Analysis {
        Resolver::new(self.config).run(root)
    }

    /// Print every diagnostic to stderr
    pub fn report_diagnostics(&self, analysis: &Analysis) {
        for error in &analysis.diagnostics {
            self.reporter.report_error(self.source_id, error);
        }
    }

    /// Diagnostics rendered without colors, in traversal order
    pub fn render_diagnostics(&self, analysis: &Analysis) -> String {
        analysis
            .diagnostics
            .iter()
            .map(|error| self.reporter.render(self.source_id, error))
            .collect()
    }

    pub fn exit_code(analysis: &Analysis) -> i32 {
        if analysis.has_internal_errors() {
            EXIT_FATAL
        } else if analysis.is_success() {
            EXIT_OK
        } else {
            EXIT_DIAGNOSTICS
        }
    }
}

/// Render the symbol report, or `None` when reports are disabled
pub fn render_report(analysis: &Analysis, format: ReportFormat) -> anyhow::Result<Option<String>> {
    let report = analysis.report();
    match format {
        ReportFormat::Table => Ok(Some(report.to_string())),
        ReportFormat::Json => report
            .to_json()
            .map(Some)
            .context("failed to serialize symbol report"),
        ReportFormat::None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::{function, global_var, program, var_ref};
    use codespan_reporting::term::termcolor::ColorChoice;

    fn quiet_pipeline() -> Pipeline {
        Pipeline::with_reporter(ResolverConfig::default(), DiagnosticReporter::with_color(ColorChoice::Never))
    }

    #[test]
    fn test_exit_codes() {
        let pipeline = quiet_pipeline();

        let clean = pipeline.analyze(&program(vec![global_var(1, "int", "x")]));
        assert_eq!(Pipeline::exit_code(&clean), EXIT_OK);

        let undefined = pipeline.analyze(&program(vec![var_ref(1, "y")]));
        assert_eq!(Pipeline::exit_code(&undefined), EXIT_DIAGNOSTICS);

        let mut broken = function(1, "int", "f", vec![], vec![]);
        broken.children.clear();
        let malformed = pipeline.analyze(&program(vec![broken, var_ref(2, "y")]));
        assert_eq!(Pipeline::exit_code(&malformed), EXIT_FATAL);
    }

    #[test]
    fn test_render_diagnostics_with_source() {
        let mut pipeline = quiet_pipeline();
        pipeline.add_source("demo.c", "int x;\nint main() { return y; }\n");

        let analysis = pipeline.analyze(&program(vec![
            global_var(1, "int", "x"),
            function(2, "int", "main", vec![], vec![var_ref(2, "y")]),
        ]));
        let rendered = pipeline.render_diagnostics(&analysis);

        assert!(rendered.contains("undefined variable 'y' in scope 'main'"));
        assert!(rendered.contains("demo.c:2:1"));
        assert!(rendered.contains("int main() { return y; }"));
    }

    #[test]
    fn test_render_report_formats() {
        let pipeline = quiet_pipeline();
        let analysis = pipeline.analyze(&program(vec![global_var(1, "int", "x")]));

        let table = render_report(&analysis, ReportFormat::Table).unwrap().unwrap();
        assert!(table.starts_with("Category"));

        let json = render_report(&analysis, ReportFormat::Json).unwrap().unwrap();
        assert!(json.contains("\"scope\": \"global\""));

        assert!(render_report(&analysis, ReportFormat::None).unwrap().is_none());
    }

    #[test]
    fn test_missing_tree_file() {
        let pipeline = quiet_pipeline();
        let err = pipeline.load_tree(Path::new("/nonexistent/tree.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read syntax tree"));
    }
}

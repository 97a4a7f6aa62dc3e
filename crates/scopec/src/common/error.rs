//! Semantic error taxonomy and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, NoColor, StandardStream, WriteColor};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use super::Line;

/// Which namespace a symbol lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolCategory {
    Variable,
    Function,
}

impl SymbolCategory {
    /// Capitalized label used in the symbol report
    pub fn label(self) -> &'static str {
        match self {
            SymbolCategory::Variable => "Variable",
            SymbolCategory::Function => "Function",
        }
    }
}

impl fmt::Display for SymbolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolCategory::Variable => f.write_str("variable"),
            SymbolCategory::Function => f.write_str("function"),
        }
    }
}

/// Error raised while resolving a syntax tree.
///
/// `DuplicateDeclaration` and `UndefinedReference` are problems in the user's
/// program and accumulate as ordinary diagnostics. `MalformedNode` means the
/// tree handed over by the parser broke its structural contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("{category} '{name}' is already declared in scope '{scope}'")]
    DuplicateDeclaration {
        category: SymbolCategory,
        name: String,
        scope: String,
        line: Option<Line>,
        previous: Option<Line>,
    },

    #[error("undefined {category} '{name}' in scope '{scope}'")]
    UndefinedReference {
        category: SymbolCategory,
        name: String,
        scope: String,
        line: Option<Line>,
    },

    #[error("malformed `{kind}` node: {reason}")]
    MalformedNode {
        kind: String,
        reason: String,
        line: Option<Line>,
    },
}

impl SemanticError {
    pub fn duplicate(
        category: SymbolCategory,
        name: impl Into<String>,
        scope: impl Into<String>,
        line: Option<Line>,
        previous: Option<Line>,
    ) -> Self {
        Self::DuplicateDeclaration {
            category,
            name: name.into(),
            scope: scope.into(),
            line,
            previous,
        }
    }

    pub fn undefined(
        category: SymbolCategory,
        name: impl Into<String>,
        scope: impl Into<String>,
        line: Option<Line>,
    ) -> Self {
        Self::UndefinedReference {
            category,
            name: name.into(),
            scope: scope.into(),
            line,
        }
    }

    pub fn malformed(kind: impl Into<String>, reason: impl Into<String>, line: Option<Line>) -> Self {
        Self::MalformedNode {
            kind: kind.into(),
            reason: reason.into(),
            line,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn line(&self) -> Option<Line> {
        match self {
            Self::DuplicateDeclaration { line, .. }
            | Self::UndefinedReference { line, .. }
            | Self::MalformedNode { line, .. } => *line,
        }
    }

    /// Category of the offending symbol; `None` for structural faults
    pub fn category(&self) -> Option<SymbolCategory> {
        match self {
            Self::DuplicateDeclaration { category, .. } | Self::UndefinedReference { category, .. } => {
                Some(*category)
            }
            Self::MalformedNode { .. } => None,
        }
    }

    /// True for upstream contract violations rather than user-code errors
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::MalformedNode { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateDeclaration { .. } => "E0001",
            Self::UndefinedReference { .. } => "E0002",
            Self::MalformedNode { .. } => "E0900",
        }
    }
}

pub type SemanticResult<T> = Result<T, SemanticError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::with_color(ColorChoice::Auto)
    }

    pub fn with_color(choice: ColorChoice) -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(choice),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Build the diagnostic for `error`.
    ///
    /// Labels are only attached when the source file is known and the line
    /// exists in it; otherwise the line goes into a note.
    pub fn diagnostic(&self, file_id: Option<usize>, error: &SemanticError) -> Diagnostic<usize> {
        let base = if error.is_internal() {
            Diagnostic::bug()
        } else {
            Diagnostic::error()
        };
        let mut diagnostic = base.with_message(error.message()).with_code(error.code());

        let mut labels = Vec::new();
        let mut notes = Vec::new();

        if let Some(line) = error.line() {
            match self.line_label(file_id, line) {
                Some(label) => labels.push(label.with_message(primary_label(error))),
                None => notes.push(format!("at line {line}")),
            }
        }

        if let SemanticError::DuplicateDeclaration { previous: Some(previous), .. } = error {
            match self.line_label(file_id, *previous) {
                Some(label) => {
                    labels.push(Label::secondary(label.file_id, label.range).with_message("previously declared here"));
                }
                None => notes.push(format!("previously declared at line {previous}")),
            }
        }

        if error.is_internal() {
            notes.push("the syntax tree does not match the shape the parser guarantees".to_string());
        }

        if !labels.is_empty() {
            diagnostic = diagnostic.with_labels(labels);
        }
        if !notes.is_empty() {
            diagnostic = diagnostic.with_notes(notes);
        }
        diagnostic
    }

    pub fn report_error(&self, file_id: Option<usize>, error: &SemanticError) {
        let diagnostic = self.diagnostic(file_id, error);
        let _ = self.emit(&mut self.writer.lock(), &diagnostic);
    }

    /// Render without colors, for logs and tests
    pub fn render(&self, file_id: Option<usize>, error: &SemanticError) -> String {
        let diagnostic = self.diagnostic(file_id, error);
        let mut buffer = NoColor::new(Vec::new());
        let _ = self.emit(&mut buffer, &diagnostic);
        String::from_utf8_lossy(&buffer.into_inner()).into_owned()
    }

    fn emit(
        &self,
        writer: &mut dyn WriteColor,
        diagnostic: &Diagnostic<usize>,
    ) -> Result<(), codespan_reporting::files::Error> {
        term::emit(writer, &self.config, &self.files, diagnostic)
    }

    fn line_label(&self, file_id: Option<usize>, line: Line) -> Option<Label<usize>> {
        let file_id = file_id?;
        let source = self.files.source(file_id).ok()?;
        let mut range = self.files.line_range(file_id, line.index()).ok()?;
        // Keep the label on one line; `line_range` includes the line terminator.
        let text = source.get(range.clone())?;
        range.end = range.start + text.trim_end_matches(['\n', '\r']).len();
        Some(Label::primary(file_id, range))
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn primary_label(error: &SemanticError) -> String {
    match error {
        SemanticError::DuplicateDeclaration { name, .. } => format!("'{name}' declared again here"),
        SemanticError::UndefinedReference { category, .. } => format!("no {category} with this name is in scope"),
        SemanticError::MalformedNode { kind, .. } => format!("while resolving this `{kind}`"),
    }
}

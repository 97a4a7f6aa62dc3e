//! Common infrastructure shared by the resolver and the driver

mod error;
mod line;

pub use error::{DiagnosticReporter, SemanticError, SemanticResult, SymbolCategory};
pub use line::Line;

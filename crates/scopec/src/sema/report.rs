//! Tabular symbol report

use serde::Serialize;
use std::fmt;

use crate::common::{Line, SymbolCategory};
use super::scope::{SymbolTable, GLOBAL_SCOPE};

/// One symbol in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub category: SymbolCategory,
    pub name: String,
    /// Variable type, or function return type
    #[serde(rename = "type")]
    pub ty: String,
    pub scope: String,
    pub line: Option<Line>,
}

/// Every stored symbol, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolReport {
    rows: Vec<ReportRow>,
}

const HEADERS: [&str; 5] = ["Category", "Name", "Type", "Scope", "Line"];

impl SymbolReport {
    pub fn from_table(table: &SymbolTable) -> Self {
        let rows = table
            .symbols()
            .map(|symbol| ReportRow {
                category: symbol.category(),
                name: symbol.name().to_string(),
                ty: symbol.ty().to_string(),
                scope: table
                    .scope(symbol.owner())
                    .map_or(GLOBAL_SCOPE, |s| s.name())
                    .to_string(),
                line: symbol.line(),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.rows)
    }

    fn cells(row: &ReportRow) -> [String; 5] {
        [
            row.category.label().to_string(),
            row.name.clone(),
            row.ty.clone(),
            row.scope.clone(),
            row.line.map_or_else(|| "-".to_string(), |l| l.to_string()),
        ]
    }
}

impl fmt::Display for SymbolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body: Vec<[String; 5]> = self.rows.iter().map(Self::cells).collect();

        let mut widths = HEADERS.map(str::len);
        for cells in &body {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.len());
            }
        }

        write_row(f, &widths, &HEADERS)?;
        let rule = widths.map(|w| "-".repeat(w));
        write_row(f, &widths, &rule.each_ref().map(String::as_str))?;
        for cells in &body {
            write_row(f, &widths, &cells.each_ref().map(String::as_str))?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, widths: &[usize; 5], cells: &[&str; 5]) -> fmt::Result {
    let mut line = String::new();
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(&format!("{cell:<width$}"));
    }
    writeln!(f, "{}", line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::{function, global_var, local_var, param, program};
    use crate::sema::Resolver;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_table() {
        let tree = program(vec![
            global_var(1, "int", "total"),
            function(3, "float", "average", vec![param("int", "count")], vec![local_var(4, "float", "sum")]),
        ]);
        let report = Resolver::analyze(&tree).report();

        let expected = "\
Category  Name     Type   Scope    Line
--------  -------  -----  -------  ----
Variable  total    int    global   1
Function  average  float  global   3
Variable  count    int    average  3
Variable  sum      float  average  4
";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_report_json() {
        let tree = program(vec![global_var(2, "char", "c")]);
        let report = Resolver::analyze(&tree).report();

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "category": "Variable", "name": "c", "type": "char", "scope": "global", "line": 2 }
            ])
        );
    }

    #[test]
    fn test_empty_report_has_headers() {
        let report = SymbolReport::from_table(&SymbolTable::new());
        assert!(report.rows().is_empty());
        assert_eq!(report.to_string().lines().count(), 2);
    }
}

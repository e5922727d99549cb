//! Failure reports and the run summary.

use camino::Utf8Path;
use pyreact_parser::ParseError;
use pyreact_transpiler::TranspileError;
use serde::Serialize;
use source_span::LineIndex;

/// One failure, positioned in its source file and ready to print.
#[derive(Debug, Clone, Serialize)]
pub struct FormattedFailure {
    /// The file the failure came from.
    pub filename: String,
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Component name, absent for syntax errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// The message.
    pub message: String,
    /// Stable machine-readable code.
    pub code: String,
}

/// The single JSON document printed by `--output json`.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    /// Number of files compiled.
    pub files: usize,
    /// Names of the components in the bundle, in bundle order.
    pub components: Vec<String>,
    /// Every failure across the batch.
    pub failures: Vec<FormattedFailure>,
}

/// Positions a syntax error within its file.
pub fn parse_failure(path: &Utf8Path, index: &LineIndex, error: &ParseError) -> FormattedFailure {
    let start = index.line_col(error.span.start);
    FormattedFailure {
        filename: path.to_string(),
        line: start.line + 1,
        column: start.col + 1,
        component: None,
        message: error.to_string(),
        code: "parse-error".to_string(),
    }
}

/// Positions a component failure within its file.
pub fn transpile_failure(
    path: &Utf8Path,
    index: &LineIndex,
    failure: &TranspileError,
) -> FormattedFailure {
    let start = index.line_col(failure.span.start);
    FormattedFailure {
        filename: path.to_string(),
        line: start.line + 1,
        column: start.col + 1,
        component: Some(failure.component.to_string()),
        message: failure.to_string(),
        code: failure.kind.code().to_string(),
    }
}

/// Formats one failure for the human-readable report.
pub fn format_human(failure: &FormattedFailure) -> String {
    format!(
        "{}:{}:{}\nError: {} ({})\n\n",
        failure.filename, failure.line, failure.column, failure.message, failure.code
    )
}

/// Summary of one compile run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of files compiled.
    pub file_count: usize,
    /// Number of components in the bundle.
    pub component_count: usize,
    /// Number of components that failed.
    pub failure_count: usize,
    /// Number of syntax errors.
    pub parse_error_count: usize,
}

impl RunSummary {
    /// True when the run should exit nonzero.
    pub fn failed(&self) -> bool {
        self.failure_count > 0 || self.parse_error_count > 0
    }

    /// Formats the summary line.
    pub fn format(&self) -> String {
        let error_count = self.failure_count + self.parse_error_count;
        let component_word = if self.component_count == 1 {
            "component"
        } else {
            "components"
        };
        let file_word = if self.file_count == 1 { "file" } else { "files" };
        let error_word = if error_count == 1 { "error" } else { "errors" };

        format!(
            "====================================\npyreact-rs emitted {} {} from {} {} with {} {}",
            self.component_count, component_word, self.file_count, file_word, error_count, error_word
        )
    }
}

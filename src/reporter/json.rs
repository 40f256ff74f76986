use crate::linter::Diagnostic;
use std::path::Path;

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    file: String,
    diagnostics: &'a [Diagnostic],
}

pub(crate) fn format(diagnostics: &[Diagnostic], path: &Path) -> String {
    let report = JsonReport {
        file: path.display().to_string(),
        diagnostics,
    };
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}

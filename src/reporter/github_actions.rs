use crate::linter::Diagnostic;
use std::path::Path;

pub(crate) fn format(diagnostics: &[Diagnostic], path: &Path) -> Vec<String> {
    let path_str = path.display();
    diagnostics
        .iter()
        .map(|diagnostic| {
            let location = diagnostic.location();
            let mut params = format!(
                "file={path_str},line={},col={}",
                location.row, location.column
            );
            if let Some(end) = diagnostic.end_location() {
                params.push_str(&format!(",endLine={},endColumn={}", end.row, end.column));
            }
            params.push_str(&format!(",title={}", diagnostic.code()));
            format!(
                "::error {params}::{} {}",
                diagnostic.code(),
                escape(diagnostic.message())
            )
        })
        .collect()
}

/// Workflow commands end at a newline; `%` starts an escape.
fn escape(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::Location;

    #[test]
    fn test_annotation() {
        let diagnostics = vec![
            Diagnostic::new("E501", "Line too long (92 > 88)", Location::new(10, 89))
                .with_end(Location::new(10, 93)),
        ];
        let lines = format(&diagnostics, Path::new("src/app.py"));
        assert_eq!(
            lines,
            vec![
                "::error file=src/app.py,line=10,col=89,endLine=10,endColumn=93,title=E501::E501 Line too long (92 > 88)"
            ]
        );
    }

    #[test]
    fn test_without_end() {
        let diagnostics = vec![Diagnostic::new("F403", "100% star", Location::new(1, 1))];
        let lines = format(&diagnostics, Path::new("app.py"));
        assert_eq!(lines, vec!["::error file=app.py,line=1,col=1,title=F403::F403 100%25 star"]);
    }

    #[test]
    fn test_empty() {
        assert!(format(&[], Path::new("app.py")).is_empty());
    }
}

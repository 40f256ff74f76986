use crate::linter::Diagnostic;
use colored::Colorize;
use std::path::Path;

pub(crate) fn format(diagnostics: &[Diagnostic], path: &Path, show_fixes: bool) -> Vec<String> {
    let path_str = path.display();
    diagnostics
        .iter()
        .map(|diagnostic| {
            let location = diagnostic.location();
            let marker = if show_fixes && diagnostic.fix().is_some() {
                format!(" {}", "[*]".cyan())
            } else {
                String::new()
            };
            format!(
                "{}:{}:{}: {}{} {}",
                path_str.to_string().bold(),
                location.row,
                location.column,
                diagnostic.code().red().bold(),
                marker,
                diagnostic.message()
            )
        })
        .collect()
}

pub(crate) fn summary(total: usize, fixable: usize, suppressed: usize) -> Option<String> {
    if total == 0 && suppressed == 0 {
        return None;
    }
    let mut parts = vec![format!("Found {total} error(s)")];
    if fixable > 0 {
        parts.push(format!("{fixable} fixable with `--fix`"));
    }
    if suppressed > 0 {
        parts.push(format!("{suppressed} suppressed by noqa"));
    }
    Some(parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::{Fix, Location};

    fn plain<T>(f: impl FnOnce() -> T) -> T {
        colored::control::set_override(false);
        f()
    }

    #[test]
    fn test_format_line() {
        let diagnostics = vec![Diagnostic::new(
            "F401",
            "`os` imported but unused",
            Location::new(1, 8),
        )];
        let lines = plain(|| format(&diagnostics, Path::new("app.py"), true));
        assert_eq!(lines, vec!["app.py:1:8: F401 `os` imported but unused"]);
    }

    #[test]
    fn test_fix_marker() {
        let location = Location::new(2, 6);
        let diagnostics = vec![
            Diagnostic::new("W291", "Trailing whitespace", location)
                .with_fix(Fix::deletion(location, Location::new(2, 8))),
        ];
        let lines = plain(|| format(&diagnostics, Path::new("app.py"), true));
        assert_eq!(lines, vec!["app.py:2:6: W291 [*] Trailing whitespace"]);
        let lines = plain(|| format(&diagnostics, Path::new("app.py"), false));
        assert_eq!(lines, vec!["app.py:2:6: W291 Trailing whitespace"]);
    }

    #[test]
    fn test_summary() {
        assert_eq!(summary(0, 0, 0), None);
        assert_eq!(summary(3, 0, 0).as_deref(), Some("Found 3 error(s)"));
        assert_eq!(
            summary(3, 1, 2).as_deref(),
            Some("Found 3 error(s), 1 fixable with `--fix`, 2 suppressed by noqa")
        );
    }
}

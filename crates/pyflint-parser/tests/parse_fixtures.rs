//! Integration tests for parsing real-world Python files
//!
//! Every file under `fixtures/valid` must parse, every file under
//! `fixtures/invalid` must be rejected as a syntax error.

use pyflint_parser::parse_program;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn python_files(dir: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(fixtures_dir().join(dir))
        .expect("Failed to read fixtures directory")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "py"))
        .collect();
    files.sort();
    files
}

#[test]
fn test_parse_valid_fixtures() {
    let files = python_files("valid");
    assert!(!files.is_empty(), "No .py files found in valid fixtures");

    let mut failures: Vec<String> = Vec::new();
    for path in &files {
        let source = std::fs::read_to_string(path).unwrap();
        if let Err(e) = parse_program(&source) {
            failures.push(format!(
                "Failed to parse {} at {}: {}",
                path.display(),
                e.position(),
                e
            ));
        }
    }

    assert!(
        failures.is_empty(),
        "Parse failures:\n{}",
        failures.join("\n")
    );
}

#[test]
fn test_reject_invalid_fixtures() {
    let files = python_files("invalid");
    assert!(!files.is_empty(), "No .py files found in invalid fixtures");

    for path in &files {
        let source = std::fs::read_to_string(path).unwrap();
        match parse_program(&source) {
            Ok(_) => panic!("{} parsed but should have failed", path.display()),
            Err(e) => {
                assert!(e.is_syntax_error(), "{}: {e}", path.display());
                assert!(e.position().row >= 1, "{}: no position", path.display());
            }
        }
    }
}

#[test]
fn test_spans_slice_back_to_source() {
    let source = std::fs::read_to_string(fixtures_dir().join("valid/statements.py")).unwrap();
    let module = parse_program(&source).unwrap();
    for stmt in &module.body {
        let text = stmt.span.slice(&source);
        assert!(!text.is_empty());
        assert!(!text.starts_with(char::is_whitespace), "{text:?}");
        assert!(!text.ends_with('\n'), "{text:?}");
    }
}

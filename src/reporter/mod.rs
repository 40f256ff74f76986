mod github_actions;
mod json;
mod text;

use crate::linter::Diagnostic;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    GithubActions,
}

pub struct Reporter {
    format: OutputFormat,
    show_fixes: bool,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            show_fixes: true,
        }
    }

    /// Whether the text format marks fixable diagnostics with `[*]`.
    pub fn with_fix_markers(mut self, show_fixes: bool) -> Self {
        self.show_fixes = show_fixes;
        self
    }

    /// Print the diagnostics of one file.
    pub fn report(&self, diagnostics: &[Diagnostic], path: &Path) {
        match self.format {
            OutputFormat::Text => {
                for line in text::format(diagnostics, path, self.show_fixes) {
                    println!("{line}");
                }
            }
            OutputFormat::Json => println!("{}", json::format(diagnostics, path)),
            OutputFormat::GithubActions => {
                for line in github_actions::format(diagnostics, path) {
                    println!("{line}");
                }
            }
        }
    }

    /// Print the run summary. Only the text format has one.
    pub fn summary(&self, total: usize, fixable: usize, suppressed: usize) {
        if self.format == OutputFormat::Text {
            if let Some(summary) = text::summary(total, fixable, suppressed) {
                println!("{summary}");
            }
        }
    }
}

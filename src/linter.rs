use crate::docs::{RuleDoc, SYNTAX_ERROR};
use crate::error::{AnalysisError, InitializationError};
use crate::noqa::NoqaDirectives;
use crate::semantic::SemanticModel;
use crate::settings::Settings;
use log::debug;
use pyflint_parser::ast::{Module, Position, Span, Stmt};
use pyflint_parser::error::ParseError;
use pyflint_parser::lexer::{StringToken, Token, TokenKind};
#[cfg(feature = "cli")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

/// A 1-based source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub row: usize,
    pub column: usize,
}

impl Location {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl From<Position> for Location {
    fn from(position: Position) -> Self {
        Self::new(position.row, position.column)
    }
}

/// A replacement of the source range `location..end_location` with `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    pub content: String,
    pub location: Location,
    pub end_location: Location,
}

impl Fix {
    pub fn replacement(
        content: impl Into<String>,
        location: impl Into<Location>,
        end_location: impl Into<Location>,
    ) -> Self {
        Self {
            content: content.into(),
            location: location.into(),
            end_location: end_location.into(),
        }
    }

    pub fn deletion(location: impl Into<Location>, end_location: impl Into<Location>) -> Self {
        Self::replacement(String::new(), location, end_location)
    }

    pub fn insertion(content: impl Into<String>, at: impl Into<Location>) -> Self {
        let at = at.into();
        Self::replacement(content, at, at)
    }
}

/// One finding. Built once by a rule and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    code: String,
    message: String,
    location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fix: Option<Fix>,
}

impl Diagnostic {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        location: impl Into<Location>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            location: location.into(),
            end_location: None,
            fix: None,
        }
    }

    /// A diagnostic covering `span`.
    pub fn spanning(code: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self::new(code, message, span.start).with_end(span.end)
    }

    pub fn with_end(mut self, end_location: impl Into<Location>) -> Self {
        self.end_location = Some(end_location.into());
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub(crate) fn without_fix(mut self) -> Self {
        self.fix = None;
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn end_location(&self) -> Option<Location> {
        self.end_location
    }

    pub fn fix(&self) -> Option<&Fix> {
        self.fix.as_ref()
    }
}

/// Sorts by row, column, code and message, a total order on the wire fields.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.location
            .cmp(&b.location)
            .then_with(|| a.code.cmp(&b.code))
            .then_with(|| a.message.cmp(&b.message))
    });
}

pub trait Rule: Send + Sync {
    fn doc(&self) -> &'static RuleDoc;

    fn check(&self, checker: &Checker) -> Vec<Diagnostic>;

    fn code(&self) -> &'static str {
        self.doc().code
    }

    fn name(&self) -> &'static str {
        self.doc().name
    }

    fn linter(&self) -> &'static str {
        self.doc().linter
    }

    fn description(&self) -> &'static str {
        self.doc().description
    }
}

/// The immutable set of rules the engine can run.
pub struct Registry {
    rules: Vec<Box<dyn Rule>>,
}

impl Registry {
    /// All builtin rules.
    pub fn builtin() -> Result<Self, InitializationError> {
        Self::from_rules(crate::rules::all_rules())
    }

    /// Check that codes are well formed and unique.
    pub fn from_rules(rules: Vec<Box<dyn Rule>>) -> Result<Self, InitializationError> {
        if rules.is_empty() {
            return Err(InitializationError::EmptyRegistry);
        }
        let mut seen = HashSet::new();
        seen.insert(SYNTAX_ERROR.code);
        for rule in &rules {
            let code = rule.code();
            if !is_valid_code(code) {
                return Err(InitializationError::InvalidCode {
                    code: code.to_string(),
                });
            }
            if !seen.insert(code) {
                return Err(InitializationError::DuplicateCode {
                    code: code.to_string(),
                });
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn get(&self, code: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|rule| rule.code() == code)
            .map(|rule| rule.as_ref())
    }

    /// Every code the engine can emit, `E999` included.
    pub fn codes(&self) -> Vec<&'static str> {
        let mut codes: Vec<_> = self.rules.iter().map(|rule| rule.code()).collect();
        codes.push(SYNTAX_ERROR.code);
        codes
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Uppercase letters followed by digits, like `E501` or `TID252`.
fn is_valid_code(code: &str) -> bool {
    let digits = code.trim_start_matches(|c: char| c.is_ascii_uppercase());
    digits.len() < code.len()
        && !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
}

/// Diagnostics of one check, plus how many `# noqa` comments suppressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResult {
    pub diagnostics: Vec<Diagnostic>,
    pub suppressed: usize,
}

/// Runs the enabled rules of a registry over source text.
pub struct Linter {
    registry: Arc<Registry>,
    settings: Settings,
}

impl Linter {
    pub fn new(registry: Arc<Registry>, settings: Settings) -> Self {
        Self { registry, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Rules selected by the settings, in registry order.
    pub fn enabled_rules(&self) -> Vec<&dyn Rule> {
        self.registry
            .rules()
            .iter()
            .filter(|rule| self.settings.rules.is_enabled(rule.code()))
            .map(|rule| rule.as_ref())
            .collect()
    }

    /// Analyse `source`.
    ///
    /// Syntax errors complete the analysis with a single `E999` diagnostic.
    /// Constructs the parser does not cover fail with [`AnalysisError`].
    pub fn check(&self, source: &str) -> Result<CheckResult, AnalysisError> {
        let tokens = match pyflint_parser::tokenize(source) {
            Ok(tokens) => tokens,
            Err(error) => return syntax_error(&error),
        };
        let module = match pyflint_parser::parse_tokens(&tokens) {
            Ok(module) => module,
            Err(error) => return syntax_error(&error),
        };

        let checker = Checker::new(source, &module, &tokens, &self.settings);
        let rules = self.enabled_rules();
        debug!("running {} rules", rules.len());
        let diagnostics = run_rules(&rules, &checker);

        let directives = NoqaDirectives::from_tokens(&tokens);
        let (diagnostics, suppressed) = directives.filter(diagnostics);

        let mut diagnostics: Vec<Diagnostic> = diagnostics
            .into_iter()
            .map(|diagnostic| {
                if diagnostic.fix.is_some() && !self.settings.fixable.is_enabled(&diagnostic.code) {
                    diagnostic.without_fix()
                } else {
                    diagnostic
                }
            })
            .collect();
        sort_diagnostics(&mut diagnostics);

        Ok(CheckResult {
            diagnostics,
            suppressed,
        })
    }
}

#[cfg(feature = "cli")]
fn run_rules(rules: &[&dyn Rule], checker: &Checker) -> Vec<Diagnostic> {
    rules
        .par_iter()
        .map(|rule| rule.check(checker))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

#[cfg(not(feature = "cli"))]
fn run_rules(rules: &[&dyn Rule], checker: &Checker) -> Vec<Diagnostic> {
    rules.iter().flat_map(|rule| rule.check(checker)).collect()
}

fn syntax_error(error: &ParseError) -> Result<CheckResult, AnalysisError> {
    if let Some(analysis_error) = AnalysisError::from_parse_error(error) {
        return Err(analysis_error);
    }
    debug!("syntax error at {}: {}", error.position(), error);
    Ok(CheckResult {
        diagnostics: vec![Diagnostic::new(
            SYNTAX_ERROR.code,
            format!("SyntaxError: {error}"),
            error.position(),
        )],
        suppressed: 0,
    })
}

/// Everything a rule may look at for one source file.
pub struct Checker<'a> {
    source: &'a str,
    module: &'a Module,
    tokens: &'a [Token],
    settings: &'a Settings,
    /// Row ranges (first, last) covered by multi-line string tokens.
    multiline_strings: Vec<(usize, usize)>,
    semantic: OnceLock<SemanticModel<'a>>,
}

impl<'a> Checker<'a> {
    pub fn new(
        source: &'a str,
        module: &'a Module,
        tokens: &'a [Token],
        settings: &'a Settings,
    ) -> Self {
        let multiline_strings = tokens
            .iter()
            .filter(|token| matches!(token.kind, TokenKind::String(_)))
            .filter(|token| token.span.start.row < token.span.end.row)
            .map(|token| (token.span.start.row, token.span.end.row))
            .collect();
        Self {
            source,
            module,
            tokens,
            settings,
            multiline_strings,
            semantic: OnceLock::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn module(&self) -> &'a Module {
        self.module
    }

    /// Top-level statements.
    pub fn body(&self) -> &'a [Stmt] {
        &self.module.body
    }

    pub fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    /// Scopes and bindings, built on first use and shared by all rules.
    pub fn semantic(&self) -> &SemanticModel<'a> {
        self.semantic
            .get_or_init(|| SemanticModel::build(self.source, self.module, &self.settings.builtins))
    }

    pub fn slice(&self, span: Span) -> &'a str {
        span.slice(self.source)
    }

    /// Physical lines with their 1-based row, without line terminators
    /// or a leading byte order mark.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &'a str)> {
        let source = self.source;
        source
            .strip_prefix('\u{feff}')
            .unwrap_or(source)
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line))
    }

    /// String tokens with their spans.
    pub fn string_tokens(&self) -> impl Iterator<Item = (&'a StringToken, Span)> {
        self.tokens.iter().filter_map(|token| match &token.kind {
            TokenKind::String(string) => Some((string, token.span)),
            _ => None,
        })
    }

    /// Whether `row` continues a string that started on an earlier row.
    pub fn is_inside_multiline_string(&self, row: usize) -> bool {
        self.multiline_strings
            .iter()
            .any(|&(first, last)| first < row && row <= last)
    }

    /// Tokens lying entirely within `start..end`.
    pub fn tokens_between(
        &self,
        start: Position,
        end: Position,
    ) -> impl Iterator<Item = &'a Token> {
        self.tokens
            .iter()
            .filter(move |token| token.span.start >= start && token.span.end <= end)
    }
}

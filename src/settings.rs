//! Typed settings built from a [`ResolvedConfig`].
//!
//! [`Settings::from_resolved`] is where the engine refuses malformed
//! configuration: unknown groups, unknown options, wrong value types,
//! invalid choices, invalid regexes and rule selectors that match nothing
//! all fail with a [`ConfigResolutionError`] naming the offending input.

use crate::config::{GLOBALS, OptionValue, ResolvedConfig};
use crate::error::ConfigResolutionError;
use crate::options::{self, DEFAULT_DUMMY_VARIABLE_RGX, DEFAULT_IGNORE_NAMES, ValueError};
use regex::Regex;

/// Which rules a selector list turns on.
///
/// A code is selected when its most specific matching selector comes from
/// the select side. On a tie the ignore side wins; `ALL` is the least
/// specific selector of all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSelection {
    select: Vec<String>,
    ignore: Vec<String>,
}

impl RuleSelection {
    pub fn new(select: Vec<String>, ignore: Vec<String>) -> Self {
        Self { select, ignore }
    }

    pub fn is_enabled(&self, code: &str) -> bool {
        match (specificity(&self.select, code), specificity(&self.ignore, code)) {
            (Some(_), None) => true,
            (Some(selected), Some(ignored)) => selected > ignored,
            (None, _) => false,
        }
    }
}

fn specificity(selectors: &[String], code: &str) -> Option<usize> {
    selectors
        .iter()
        .filter_map(|selector| {
            if selector == "ALL" {
                Some(0)
            } else if code.starts_with(selector.as_str()) {
                Some(selector.len())
            } else {
                None
            }
        })
        .max()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
}

impl Quote {
    fn parse(value: &str) -> Self {
        if value == "single" { Quote::Single } else { Quote::Double }
    }

    pub fn as_char(self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Quote::Single => Quote::Double,
            Quote::Double => Quote::Single,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Quote::Single => "single",
            Quote::Double => "double",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteSettings {
    pub inline_quotes: Quote,
    pub multiline_quotes: Quote,
    pub docstring_quotes: Quote,
    pub avoid_escape: bool,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            inline_quotes: Quote::Double,
            multiline_quotes: Quote::Double,
            docstring_quotes: Quote::Double,
            avoid_escape: true,
        }
    }
}

/// Names exempt from pep8-naming checks; `*` matches any run of characters.
#[derive(Debug, Clone)]
pub struct IgnoreNames {
    patterns: Vec<Regex>,
}

impl IgnoreNames {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, regex::Error> {
        let patterns = names
            .iter()
            .map(|name| {
                let pattern = name
                    .as_ref()
                    .split('*')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(".*");
                Regex::new(&format!("^{pattern}$"))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(name))
    }
}

#[derive(Debug, Clone)]
pub struct NamingSettings {
    pub ignore_names: IgnoreNames,
    pub classmethod_decorators: Vec<String>,
    pub staticmethod_decorators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugbearSettings {
    pub extend_immutable_calls: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BanRelativeImports {
    #[default]
    Parents,
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TidyImportsSettings {
    pub ban_relative_imports: BanRelativeImports,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McCabeSettings {
    pub max_complexity: usize,
}

impl Default for McCabeSettings {
    fn default() -> Self {
        Self { max_complexity: 10 }
    }
}

/// Everything the rules read from configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub line_length: usize,
    pub rules: RuleSelection,
    pub fixable: RuleSelection,
    pub dummy_variable_rgx: Regex,
    pub builtins: Vec<String>,
    pub flake8_quotes: QuoteSettings,
    pub pep8_naming: NamingSettings,
    pub flake8_bugbear: BugbearSettings,
    pub flake8_tidy_imports: TidyImportsSettings,
    pub mccabe: McCabeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            line_length: 88,
            rules: RuleSelection::new(vec!["E".to_string(), "F".to_string()], Vec::new()),
            fixable: RuleSelection::new(vec!["ALL".to_string()], Vec::new()),
            dummy_variable_rgx: Regex::new(DEFAULT_DUMMY_VARIABLE_RGX)
                .expect("default dummy-variable-rgx compiles"),
            builtins: Vec::new(),
            flake8_quotes: QuoteSettings::default(),
            pep8_naming: NamingSettings {
                ignore_names: IgnoreNames::new(DEFAULT_IGNORE_NAMES)
                    .expect("default ignore-names compile"),
                classmethod_decorators: Vec::new(),
                staticmethod_decorators: Vec::new(),
            },
            flake8_bugbear: BugbearSettings::default(),
            flake8_tidy_imports: TidyImportsSettings::default(),
            mccabe: McCabeSettings::default(),
        }
    }
}

impl Settings {
    /// Validate `config` against the option registry and build settings.
    ///
    /// `codes` are the registered rule codes, used to reject selectors that
    /// match no rule. Absent values keep their defaults.
    pub fn from_resolved(
        config: &ResolvedConfig,
        codes: &[&str],
    ) -> Result<Self, ConfigResolutionError> {
        if let Some(error) = validate(config, codes).into_iter().next() {
            return Err(error);
        }

        let mut settings = Settings::default();
        let get = |group: &str, field: &str| config.get(group, field).filter(|v| !v.is_absent());
        let list =
            |group: &str, field: &str| get(group, field).and_then(OptionValue::as_string_list);

        if let Some(line_length) = get(GLOBALS, "line-length")
            .and_then(OptionValue::as_integer)
            .and_then(|n| usize::try_from(n).ok())
        {
            settings.line_length = line_length;
        }

        let mut select = list(GLOBALS, "select").unwrap_or_else(|| vec!["E".into(), "F".into()]);
        select.extend(list(GLOBALS, "extend-select").unwrap_or_default());
        let mut ignore = list(GLOBALS, "ignore").unwrap_or_default();
        ignore.extend(list(GLOBALS, "extend-ignore").unwrap_or_default());
        settings.rules = RuleSelection::new(select, ignore);
        settings.fixable = RuleSelection::new(
            list(GLOBALS, "fixable").unwrap_or_else(|| vec!["ALL".into()]),
            list(GLOBALS, "unfixable").unwrap_or_default(),
        );

        if let Some(pattern) = get(GLOBALS, "dummy-variable-rgx").and_then(OptionValue::as_str) {
            settings.dummy_variable_rgx = Regex::new(pattern)
                .map_err(|e| invalid(GLOBALS, "dummy-variable-rgx", pattern, e))?;
        }
        if let Some(builtins) = list(GLOBALS, "builtins") {
            settings.builtins = builtins;
        }

        let quotes = &mut settings.flake8_quotes;
        let quote = |field: &str| {
            get("flake8-quotes", field)
                .and_then(OptionValue::as_str)
                .map(Quote::parse)
        };
        if let Some(style) = quote("inline-quotes") {
            quotes.inline_quotes = style;
        }
        if let Some(style) = quote("multiline-quotes") {
            quotes.multiline_quotes = style;
        }
        if let Some(style) = quote("docstring-quotes") {
            quotes.docstring_quotes = style;
        }
        if let Some(avoid) = get("flake8-quotes", "avoid-escape").and_then(OptionValue::as_bool) {
            quotes.avoid_escape = avoid;
        }

        if let Some(names) = list("pep8-naming", "ignore-names") {
            settings.pep8_naming.ignore_names = IgnoreNames::new(&names)
                .map_err(|e| invalid("pep8-naming", "ignore-names", &names.join(", "), e))?;
        }
        if let Some(decorators) = list("pep8-naming", "classmethod-decorators") {
            settings.pep8_naming.classmethod_decorators = decorators;
        }
        if let Some(decorators) = list("pep8-naming", "staticmethod-decorators") {
            settings.pep8_naming.staticmethod_decorators = decorators;
        }

        if let Some(calls) = list("flake8-bugbear", "extend-immutable-calls") {
            settings.flake8_bugbear.extend_immutable_calls = calls;
        }

        if let Some(ban) =
            get("flake8-tidy-imports", "ban-relative-imports").and_then(OptionValue::as_str)
        {
            settings.flake8_tidy_imports.ban_relative_imports = if ban == "all" {
                BanRelativeImports::All
            } else {
                BanRelativeImports::Parents
            };
        }

        if let Some(max) = get("mccabe", "max-complexity")
            .and_then(OptionValue::as_integer)
            .and_then(|n| usize::try_from(n).ok())
        {
            settings.mccabe.max_complexity = max;
        }

        Ok(settings)
    }
}

fn invalid(group: &str, field: &str, raw: &str, error: regex::Error) -> ConfigResolutionError {
    ConfigResolutionError::InvalidValue {
        group: group.to_string(),
        field: field.to_string(),
        raw: raw.to_string(),
        reason: error.to_string(),
    }
}

/// Every problem with `config`, in group/field order.
pub fn validate(config: &ResolvedConfig, codes: &[&str]) -> Vec<ConfigResolutionError> {
    let mut errors = Vec::new();
    for (group_name, field_name, value) in config.entries() {
        let group = group_name.to_string();
        let field = field_name.to_string();
        let raw = value.to_string();

        let Some(option_group) = options::find_group(group_name) else {
            errors.push(ConfigResolutionError::UnknownGroup { group, field, raw });
            continue;
        };
        let Some(option) = option_group.field(field_name) else {
            errors.push(ConfigResolutionError::UnknownOption { group, field, raw });
            continue;
        };
        match option.kind.check(value, codes) {
            Ok(()) => {}
            Err(ValueError::Type) => errors.push(ConfigResolutionError::InvalidType {
                group,
                field,
                raw,
                expected: option.type_hint.to_string(),
            }),
            Err(ValueError::Invalid(reason)) => {
                errors.push(ConfigResolutionError::InvalidValue {
                    group,
                    field,
                    raw,
                    reason,
                })
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RawConfig, resolve};

    const CODES: &[&str] = &["E501", "E711", "E712", "F401", "F841", "W291", "Q000", "C901"];

    fn settings_for(pairs: &[(&str, &str, &str)]) -> Result<Settings, ConfigResolutionError> {
        let mut raw = RawConfig::new();
        for (group, field, value) in pairs {
            raw.set(*group, *field, *value);
        }
        Settings::from_resolved(&resolve(&raw).unwrap(), CODES)
    }

    #[test]
    fn test_empty_config_gives_defaults() {
        let settings = Settings::from_resolved(&ResolvedConfig::new(), CODES).unwrap();
        assert_eq!(settings.line_length, 88);
        assert!(settings.rules.is_enabled("E501"));
        assert!(settings.rules.is_enabled("F401"));
        assert!(!settings.rules.is_enabled("W291"));
        assert_eq!(settings.mccabe.max_complexity, 10);
    }

    #[test]
    fn test_registry_defaults_match_settings_default() {
        let resolved = resolve(&RawConfig::defaults()).unwrap();
        let from_registry = Settings::from_resolved(&resolved, CODES).unwrap();
        let default = Settings::default();
        assert_eq!(from_registry.line_length, default.line_length);
        assert_eq!(from_registry.rules, default.rules);
        assert_eq!(from_registry.fixable, default.fixable);
        assert_eq!(
            from_registry.dummy_variable_rgx.as_str(),
            default.dummy_variable_rgx.as_str()
        );
        assert_eq!(from_registry.flake8_quotes, default.flake8_quotes);
        assert_eq!(from_registry.flake8_tidy_imports, default.flake8_tidy_imports);
        assert_eq!(from_registry.mccabe, default.mccabe);
    }

    #[test]
    fn test_absent_values_keep_defaults() {
        let settings = settings_for(&[("globals", "line-length", "None")]).unwrap();
        assert_eq!(settings.line_length, 88);
    }

    #[test]
    fn test_options_are_applied() {
        let settings = settings_for(&[
            ("globals", "line-length", "120"),
            ("flake8-quotes", "inline-quotes", "\"single\""),
            ("flake8-tidy-imports", "ban-relative-imports", "\"all\""),
            ("mccabe", "max-complexity", "3"),
        ])
        .unwrap();
        assert_eq!(settings.line_length, 120);
        assert_eq!(settings.flake8_quotes.inline_quotes, Quote::Single);
        assert_eq!(
            settings.flake8_tidy_imports.ban_relative_imports,
            BanRelativeImports::All
        );
        assert_eq!(settings.mccabe.max_complexity, 3);
    }

    #[test]
    fn test_unknown_option_fails() {
        let error = settings_for(&[("globals", "line-lenght", "100")]).unwrap_err();
        assert!(matches!(error, ConfigResolutionError::UnknownOption { .. }));
        assert_eq!(error.field(), "line-lenght");
    }

    #[test]
    fn test_unknown_group_fails() {
        let error = settings_for(&[("flake8-quotez", "inline-quotes", "\"single\"")]).unwrap_err();
        assert!(matches!(error, ConfigResolutionError::UnknownGroup { .. }));
        assert_eq!(error.group(), "flake8-quotez");
    }

    #[test]
    fn test_wrong_type_fails() {
        let error = settings_for(&[("globals", "line-length", "\"long\"")]).unwrap_err();
        assert!(matches!(
            error,
            ConfigResolutionError::InvalidType { ref expected, .. } if expected == "int"
        ));
        assert_eq!(error.raw(), "\"long\"");
    }

    #[test]
    fn test_invalid_choice_fails() {
        let error =
            settings_for(&[("flake8-quotes", "inline-quotes", "\"backtick\"")]).unwrap_err();
        assert!(matches!(error, ConfigResolutionError::InvalidValue { .. }));
    }

    #[test]
    fn test_unknown_selector_fails() {
        let error = settings_for(&[("globals", "select", "[\"E\", \"XYZ\"]")]).unwrap_err();
        assert!(matches!(
            error,
            ConfigResolutionError::InvalidValue { ref reason, .. } if reason.contains("XYZ")
        ));
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let mut raw = RawConfig::new();
        raw.set("globals", "line-length", "true");
        raw.set("globals", "nope", "1");
        raw.set("mccabe", "max-complexity", "-1");
        let errors = validate(&resolve(&raw).unwrap(), CODES);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_most_specific_selector_wins() {
        let selection = RuleSelection::new(
            vec!["E".to_string(), "E501".to_string()],
            vec!["E5".to_string()],
        );
        assert!(selection.is_enabled("E501"));
        assert!(!selection.is_enabled("E502"));
        assert!(selection.is_enabled("E711"));
        assert!(!selection.is_enabled("F401"));
    }

    #[test]
    fn test_ignore_wins_ties_and_all_is_weakest() {
        let tie = RuleSelection::new(vec!["E7".to_string()], vec!["E7".to_string()]);
        assert!(!tie.is_enabled("E711"));

        let all = RuleSelection::new(vec!["ALL".to_string()], vec!["W".to_string()]);
        assert!(all.is_enabled("Q000"));
        assert!(!all.is_enabled("W291"));

        let ignore_all = RuleSelection::new(vec!["F401".to_string()], vec!["ALL".to_string()]);
        assert!(ignore_all.is_enabled("F401"));
        assert!(!ignore_all.is_enabled("F841"));
    }

    #[test]
    fn test_ignore_names_globs() {
        let names = IgnoreNames::new(&["setUp", "test_*", "*_hook"]).unwrap();
        assert!(names.matches("setUp"));
        assert!(names.matches("test_Thing"));
        assert!(names.matches("pre_hook"));
        assert!(!names.matches("setup"));
        assert!(!names.matches("a.b"));
    }
}

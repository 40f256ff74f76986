//! Registry of every configuration option the engine understands.
//!
//! Each field carries its raw default (as a settings form would hold it),
//! a type hint and one line of documentation. The same table drives
//! validation in [`crate::settings`], `RawConfig::defaults`, the option
//! listing exposed to the playground and `pyflint config init`.

use crate::config::{GLOBALS, OptionValue};
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Integer { min: i64 },
    Str,
    StrList,
    Choice(&'static [&'static str]),
    Regex,
    /// List of rule codes, code prefixes or `ALL`.
    RuleSelectors,
}

/// Why a value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The value has the wrong type.
    Type,
    /// The type is right but the value is not acceptable.
    Invalid(String),
}

impl OptionKind {
    /// Check `value` against this kind. Absent values are always accepted.
    pub fn check(&self, value: &OptionValue, codes: &[&str]) -> Result<(), ValueError> {
        if value.is_absent() {
            return Ok(());
        }
        match self {
            OptionKind::Bool => value.as_bool().map(|_| ()).ok_or(ValueError::Type),
            OptionKind::Integer { min } => {
                let integer = value.as_integer().ok_or(ValueError::Type)?;
                if integer < *min {
                    return Err(ValueError::Invalid(format!("must be at least {min}")));
                }
                Ok(())
            }
            OptionKind::Str => value.as_str().map(|_| ()).ok_or(ValueError::Type),
            OptionKind::StrList => value.as_string_list().map(|_| ()).ok_or(ValueError::Type),
            OptionKind::Choice(choices) => {
                let choice = value.as_str().ok_or(ValueError::Type)?;
                if !choices.contains(&choice) {
                    return Err(ValueError::Invalid(format!(
                        "expected one of {}",
                        choices
                            .iter()
                            .map(|c| format!("\"{c}\""))
                            .collect::<Vec<_>>()
                            .join(", ")
                    )));
                }
                Ok(())
            }
            OptionKind::Regex => {
                let pattern = value.as_str().ok_or(ValueError::Type)?;
                Regex::new(pattern)
                    .map(|_| ())
                    .map_err(|e| ValueError::Invalid(format!("invalid regex: {e}")))
            }
            OptionKind::RuleSelectors => {
                let selectors = value.as_string_list().ok_or(ValueError::Type)?;
                match selectors
                    .iter()
                    .find(|selector| !is_known_selector(selector, codes))
                {
                    Some(unknown) => Err(ValueError::Invalid(format!(
                        "`{unknown}` does not match any rule"
                    ))),
                    None => Ok(()),
                }
            }
        }
    }
}

/// `ALL`, or a prefix of at least one registered rule code.
pub fn is_known_selector(selector: &str, codes: &[&str]) -> bool {
    selector == "ALL"
        || (!selector.is_empty() && codes.iter().any(|code| code.starts_with(selector)))
}

#[derive(Debug, Serialize)]
pub struct OptionField {
    pub name: &'static str,
    /// Raw default: `"None"` or JSON text.
    pub default: &'static str,
    #[serde(skip)]
    pub kind: OptionKind,
    #[serde(rename = "type")]
    pub type_hint: &'static str,
    pub doc: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OptionGroup {
    pub name: &'static str,
    pub fields: &'static [OptionField],
}

impl OptionGroup {
    pub fn field(&self, name: &str) -> Option<&'static OptionField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

pub fn find_group(name: &str) -> Option<&'static OptionGroup> {
    OPTION_GROUPS.iter().find(|group| group.name == name)
}

pub const DEFAULT_DUMMY_VARIABLE_RGX: &str = "^(_+|(_+[a-zA-Z0-9_]*[a-zA-Z0-9]+?))$";

pub const DEFAULT_IGNORE_NAMES: &[&str] = &[
    "setUp",
    "tearDown",
    "setUpClass",
    "tearDownClass",
    "setUpModule",
    "tearDownModule",
    "asyncSetUp",
    "asyncTearDown",
    "setUpTestData",
    "failureException",
    "longMessage",
    "maxDiff",
];

pub static OPTION_GROUPS: &[OptionGroup] = &[
    OptionGroup {
        name: GLOBALS,
        fields: &[
            OptionField {
                name: "line-length",
                default: "88",
                kind: OptionKind::Integer { min: 1 },
                type_hint: "int",
                doc: "The line length to use when enforcing long-lines violations (E501).",
            },
            OptionField {
                name: "select",
                default: "[\"E\", \"F\"]",
                kind: OptionKind::RuleSelectors,
                type_hint: "list[str]",
                doc: "Rule codes or prefixes to enable.",
            },
            OptionField {
                name: "extend-select",
                default: "[]",
                kind: OptionKind::RuleSelectors,
                type_hint: "list[str]",
                doc: "Rule codes or prefixes to enable on top of `select`.",
            },
            OptionField {
                name: "ignore",
                default: "[]",
                kind: OptionKind::RuleSelectors,
                type_hint: "list[str]",
                doc: "Rule codes or prefixes to disable.",
            },
            OptionField {
                name: "extend-ignore",
                default: "[]",
                kind: OptionKind::RuleSelectors,
                type_hint: "list[str]",
                doc: "Rule codes or prefixes to disable on top of `ignore`.",
            },
            OptionField {
                name: "fixable",
                default: "[\"ALL\"]",
                kind: OptionKind::RuleSelectors,
                type_hint: "list[str]",
                doc: "Rules whose diagnostics may carry a fix.",
            },
            OptionField {
                name: "unfixable",
                default: "[]",
                kind: OptionKind::RuleSelectors,
                type_hint: "list[str]",
                doc: "Rules whose fixes are dropped.",
            },
            OptionField {
                name: "dummy-variable-rgx",
                default: "\"^(_+|(_+[a-zA-Z0-9_]*[a-zA-Z0-9]+?))$\"",
                kind: OptionKind::Regex,
                type_hint: "str",
                doc: "Regex matching unused local variables that should not be reported.",
            },
            OptionField {
                name: "builtins",
                default: "[]",
                kind: OptionKind::StrList,
                type_hint: "list[str]",
                doc: "Extra names to treat as builtins.",
            },
        ],
    },
    OptionGroup {
        name: "flake8-quotes",
        fields: &[
            OptionField {
                name: "inline-quotes",
                default: "\"double\"",
                kind: OptionKind::Choice(&["single", "double"]),
                type_hint: "\"single\" | \"double\"",
                doc: "Quote style preferred for inline strings.",
            },
            OptionField {
                name: "multiline-quotes",
                default: "\"double\"",
                kind: OptionKind::Choice(&["single", "double"]),
                type_hint: "\"single\" | \"double\"",
                doc: "Quote style preferred for multiline strings.",
            },
            OptionField {
                name: "docstring-quotes",
                default: "\"double\"",
                kind: OptionKind::Choice(&["single", "double"]),
                type_hint: "\"single\" | \"double\"",
                doc: "Quote style preferred for docstrings.",
            },
            OptionField {
                name: "avoid-escape",
                default: "true",
                kind: OptionKind::Bool,
                type_hint: "bool",
                doc: "Allow the other quote style when it avoids escaping inner quotes.",
            },
        ],
    },
    OptionGroup {
        name: "pep8-naming",
        fields: &[
            OptionField {
                name: "ignore-names",
                default: "[\"setUp\", \"tearDown\", \"setUpClass\", \"tearDownClass\", \"setUpModule\", \"tearDownModule\", \"asyncSetUp\", \"asyncTearDown\", \"setUpTestData\", \"failureException\", \"longMessage\", \"maxDiff\"]",
                kind: OptionKind::StrList,
                type_hint: "list[str]",
                doc: "Names (or `*` glob patterns) exempt from the naming rules.",
            },
            OptionField {
                name: "classmethod-decorators",
                default: "[]",
                kind: OptionKind::StrList,
                type_hint: "list[str]",
                doc: "Extra decorators that make a method a class method.",
            },
            OptionField {
                name: "staticmethod-decorators",
                default: "[]",
                kind: OptionKind::StrList,
                type_hint: "list[str]",
                doc: "Extra decorators that make a method a static method.",
            },
        ],
    },
    OptionGroup {
        name: "flake8-bugbear",
        fields: &[OptionField {
            name: "extend-immutable-calls",
            default: "[]",
            kind: OptionKind::StrList,
            type_hint: "list[str]",
            doc: "Extra calls considered immutable in argument defaults (B008).",
        }],
    },
    OptionGroup {
        name: "flake8-tidy-imports",
        fields: &[OptionField {
            name: "ban-relative-imports",
            default: "\"parents\"",
            kind: OptionKind::Choice(&["parents", "all"]),
            type_hint: "\"parents\" | \"all\"",
            doc: "Whether to ban all relative imports or only those reaching into parent modules.",
        }],
    },
    OptionGroup {
        name: "mccabe",
        fields: &[OptionField {
            name: "max-complexity",
            default: "10",
            kind: OptionKind::Integer { min: 0 },
            type_hint: "int",
            doc: "The maximum McCabe complexity to allow before reporting C901.",
        }],
    },
];

/// A `pyflint.toml` listing every option at its default.
pub fn default_config_template() -> String {
    let mut out = String::from("# pyflint configuration\n");
    for group in OPTION_GROUPS {
        out.push('\n');
        if group.name != GLOBALS {
            out.push_str(&format!("[{}]\n", group.name));
        }
        for field in group.fields {
            out.push_str(&format!("# {}\n", field.doc));
            if field.default == crate::config::ABSENT {
                out.push_str(&format!("# {} =\n", field.name));
            } else {
                out.push_str(&format!("{} = {}\n", field.name, field.default));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResolvedConfig, decode_value};

    #[test]
    fn test_defaults_decode_and_type_check() {
        let codes = ["E501", "F401", "C901"];
        for group in OPTION_GROUPS {
            for field in group.fields {
                let value = decode_value(group.name, field.name, field.default).unwrap();
                assert_eq!(
                    field.kind.check(&value, &codes),
                    Ok(()),
                    "{}.{}",
                    group.name,
                    field.name
                );
            }
        }
    }

    #[test]
    fn test_field_names_are_unique() {
        for group in OPTION_GROUPS {
            let mut names: Vec<_> = group.fields.iter().map(|f| f.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), group.fields.len(), "{}", group.name);
        }
    }

    #[test]
    fn test_selector_checks() {
        let codes = ["E501", "E711", "F401", "TID252"];
        assert!(is_known_selector("ALL", &codes));
        assert!(is_known_selector("E", &codes));
        assert!(is_known_selector("E7", &codes));
        assert!(is_known_selector("TID", &codes));
        assert!(!is_known_selector("X1", &codes));
        assert!(!is_known_selector("", &codes));

        let value = OptionValue::List(vec![OptionValue::String("Z9".to_string())]);
        assert!(matches!(
            OptionKind::RuleSelectors.check(&value, &codes),
            Err(ValueError::Invalid(_))
        ));
    }

    #[test]
    fn test_kind_checks() {
        assert_eq!(
            OptionKind::Integer { min: 1 }.check(&OptionValue::String("x".into()), &[]),
            Err(ValueError::Type)
        );
        assert!(matches!(
            OptionKind::Integer { min: 1 }.check(&OptionValue::Integer(0), &[]),
            Err(ValueError::Invalid(_))
        ));
        assert!(matches!(
            OptionKind::Choice(&["single", "double"])
                .check(&OptionValue::String("back".into()), &[]),
            Err(ValueError::Invalid(_))
        ));
        assert!(matches!(
            OptionKind::Regex.check(&OptionValue::String("(".into()), &[]),
            Err(ValueError::Invalid(_))
        ));
        assert_eq!(OptionKind::Bool.check(&OptionValue::Absent, &[]), Ok(()));
    }

    #[test]
    fn test_template_is_valid_toml() {
        let template = default_config_template();
        let table: toml::Table = toml::from_str(&template).unwrap();
        let config = ResolvedConfig::from_toml_table(table);
        assert_eq!(
            config.get(GLOBALS, "line-length"),
            Some(&OptionValue::Integer(88))
        );
        assert_eq!(
            config.get("flake8-quotes", "inline-quotes"),
            Some(&OptionValue::String("double".to_string()))
        );
    }

    #[test]
    fn test_default_constants_match_registry() {
        let field = find_group(GLOBALS).and_then(|g| g.field("dummy-variable-rgx")).unwrap();
        assert_eq!(
            decode_value(GLOBALS, field.name, field.default).unwrap(),
            OptionValue::String(DEFAULT_DUMMY_VARIABLE_RGX.to_string())
        );

        let field = find_group("pep8-naming").and_then(|g| g.field("ignore-names")).unwrap();
        let names = decode_value("pep8-naming", field.name, field.default)
            .unwrap()
            .as_string_list()
            .unwrap();
        assert_eq!(names, DEFAULT_IGNORE_NAMES);
    }
}

//! Configuration in its three shapes.
//!
//! - [`RawConfig`] is the form-facing shape: group → field → string, where
//!   every string is either the absence marker `"None"` or JSON text.
//! - [`ResolvedConfig`] is the engine-facing shape: every value decoded into
//!   a typed [`OptionValue`]. Options of the reserved [`GLOBALS`] group live
//!   at the root, other groups are nested under their name.
//! - `pyflint.toml` files, which are loaded straight into a
//!   [`ResolvedConfig`] without going through strings.
//!
//! [`resolve`] is the only place where strings are decoded. It is atomic:
//! one malformed value fails the whole resolution.

use crate::error::ConfigResolutionError;
use crate::options::OPTION_GROUPS;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Group name holding top-level options.
pub const GLOBALS: &str = "globals";

/// Raw value meaning "no value, use the default".
pub const ABSENT: &str = "None";

/// File names searched for by [`find_config_file`], in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &["pyflint.toml", ".pyflint.toml", "pyproject.toml"];

/// String-valued configuration as produced by a settings form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawConfig {
    groups: BTreeMap<String, BTreeMap<String, String>>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every known option set to its default raw value.
    pub fn defaults() -> Self {
        let mut config = Self::new();
        for group in OPTION_GROUPS {
            for field in group.fields {
                config.set(group.name, field.name, field.default);
            }
        }
        config
    }

    /// Parse the JSON form `{ "group": { "field": "value" } }`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set a value; a later write to the same group and field wins.
    pub fn set(
        &mut self,
        group: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.groups
            .entry(group.into())
            .or_default()
            .insert(field.into(), value.into());
    }

    pub fn get(&self, group: &str, field: &str) -> Option<&str> {
        self.groups
            .get(group)
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
    }

    /// All `(group, field, value)` triples in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.groups.iter().flat_map(|(group, fields)| {
            fields
                .iter()
                .map(move |(field, value)| (group.as_str(), field.as_str(), value.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(BTreeMap::is_empty)
    }
}

/// A typed option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Absent,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<OptionValue>),
    Table(BTreeMap<String, OptionValue>),
}

impl OptionValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, OptionValue::Absent)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[OptionValue]> {
        match self {
            OptionValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// The items of a list of strings, or `None` if this is anything else.
    pub fn as_string_list(&self) -> Option<Vec<String>> {
        self.as_list()?
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect()
    }

    /// Name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Absent => "null",
            OptionValue::Bool(_) => "bool",
            OptionValue::Integer(_) => "int",
            OptionValue::Float(_) => "float",
            OptionValue::String(_) => "str",
            OptionValue::List(_) => "list",
            OptionValue::Table(_) => "table",
        }
    }

    fn to_toml(&self) -> Option<toml::Value> {
        let value = match self {
            OptionValue::Absent => return None,
            OptionValue::Bool(value) => toml::Value::Boolean(*value),
            OptionValue::Integer(value) => toml::Value::Integer(*value),
            OptionValue::Float(value) => toml::Value::Float(*value),
            OptionValue::String(value) => toml::Value::String(value.clone()),
            OptionValue::List(items) => {
                toml::Value::Array(items.iter().filter_map(OptionValue::to_toml).collect())
            }
            OptionValue::Table(entries) => toml::Value::Table(
                entries
                    .iter()
                    .filter_map(|(key, value)| value.to_toml().map(|value| (key.clone(), value)))
                    .collect(),
            ),
        };
        Some(value)
    }
}

impl From<serde_json::Value> for OptionValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => OptionValue::Absent,
            serde_json::Value::Bool(value) => OptionValue::Bool(value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(integer) => OptionValue::Integer(integer),
                None => OptionValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(value) => OptionValue::String(value),
            serde_json::Value::Array(items) => {
                OptionValue::List(items.into_iter().map(OptionValue::from).collect())
            }
            serde_json::Value::Object(entries) => OptionValue::Table(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, OptionValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<toml::Value> for OptionValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(value) => OptionValue::String(value),
            toml::Value::Integer(value) => OptionValue::Integer(value),
            toml::Value::Float(value) => OptionValue::Float(value),
            toml::Value::Boolean(value) => OptionValue::Bool(value),
            toml::Value::Datetime(value) => OptionValue::String(value.to_string()),
            toml::Value::Array(items) => {
                OptionValue::List(items.into_iter().map(OptionValue::from).collect())
            }
            toml::Value::Table(entries) => OptionValue::Table(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, OptionValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Absent => serializer.serialize_none(),
            OptionValue::Bool(value) => serializer.serialize_bool(*value),
            OptionValue::Integer(value) => serializer.serialize_i64(*value),
            OptionValue::Float(value) => serializer.serialize_f64(*value),
            OptionValue::String(value) => serializer.serialize_str(value),
            OptionValue::List(items) => serializer.collect_seq(items),
            OptionValue::Table(entries) => serializer.collect_map(entries),
        }
    }
}

impl<'de> Deserialize<'de> for OptionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(OptionValue::from)
    }
}

/// Renders the value as JSON text.
impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Fully decoded configuration consumed by the engine.
///
/// Serializes to a single JSON object: root options as plain members,
/// groups as nested objects. Since no root option takes a table, any
/// object member is read back as a group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    root: BTreeMap<String, OptionValue>,
    groups: BTreeMap<String, BTreeMap<String, OptionValue>>,
}

impl ResolvedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value; `group` [`GLOBALS`] addresses the root.
    pub fn set(&mut self, group: &str, field: impl Into<String>, value: OptionValue) {
        if group == GLOBALS {
            self.root.insert(field.into(), value);
        } else {
            self.groups
                .entry(group.to_string())
                .or_default()
                .insert(field.into(), value);
        }
    }

    pub fn get(&self, group: &str, field: &str) -> Option<&OptionValue> {
        if group == GLOBALS {
            self.root.get(field)
        } else {
            self.groups.get(group).and_then(|fields| fields.get(field))
        }
    }

    /// Root (ungrouped) options.
    pub fn root(&self) -> &BTreeMap<String, OptionValue> {
        &self.root
    }

    pub fn group(&self, name: &str) -> Option<&BTreeMap<String, OptionValue>> {
        self.groups.get(name)
    }

    /// All `(group, field, value)` triples; root options report [`GLOBALS`].
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &OptionValue)> {
        let root = self
            .root
            .iter()
            .map(|(field, value)| (GLOBALS, field.as_str(), value));
        let groups = self.groups.iter().flat_map(|(group, fields)| {
            fields
                .iter()
                .map(move |(field, value)| (group.as_str(), field.as_str(), value))
        });
        root.chain(groups)
    }

    /// Overlay `other` on top of `self`; values present in `other` win.
    pub fn merge(&mut self, other: ResolvedConfig) {
        self.root.extend(other.root);
        for (group, fields) in other.groups {
            self.groups.entry(group).or_default().extend(fields);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.groups.values().all(BTreeMap::is_empty)
    }

    /// Build from a TOML document: top-level tables are groups, everything
    /// else is a root option.
    pub fn from_toml_table(table: toml::Table) -> Self {
        let mut config = Self::new();
        for (key, value) in table {
            match value {
                toml::Value::Table(fields) => {
                    for (field, value) in fields {
                        config.set(&key, field, OptionValue::from(value));
                    }
                }
                other => config.set(GLOBALS, key, OptionValue::from(other)),
            }
        }
        config
    }

    /// Load a configuration file. For `pyproject.toml` only the
    /// `[tool.pyflint]` table is read.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let table: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        if is_pyproject(path) {
            return Ok(pyproject_section(table).map(Self::from_toml_table).unwrap_or_default());
        }
        Ok(Self::from_toml_table(table))
    }

    /// Render as a `pyflint.toml` document. Absent values are omitted.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        let mut table = toml::Table::new();
        for (field, value) in &self.root {
            if let Some(value) = value.to_toml() {
                table.insert(field.clone(), value);
            }
        }
        for (group, fields) in &self.groups {
            let fields: toml::Table = fields
                .iter()
                .filter_map(|(field, value)| value.to_toml().map(|value| (field.clone(), value)))
                .collect();
            table.insert(group.clone(), toml::Value::Table(fields));
        }
        toml::to_string(&table)
    }
}

impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.root.len() + self.groups.len()))?;
        for (field, value) in &self.root {
            map.serialize_entry(field, value)?;
        }
        for (group, fields) in &self.groups {
            map.serialize_entry(group, fields)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResolvedConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut config = ResolvedConfig::new();
        for (key, value) in entries {
            match value {
                serde_json::Value::Object(fields) => {
                    for (field, value) in fields {
                        config.set(&key, field, OptionValue::from(value));
                    }
                }
                other => config.set(GLOBALS, key, OptionValue::from(other)),
            }
        }
        Ok(config)
    }
}

/// Decode every raw value into an [`OptionValue`].
///
/// `"None"` becomes [`OptionValue::Absent`]; anything else must be valid
/// JSON. The first invalid value aborts the whole resolution.
pub fn resolve(raw: &RawConfig) -> Result<ResolvedConfig, ConfigResolutionError> {
    let mut resolved = ResolvedConfig::new();
    for (group, field, value) in raw.iter() {
        resolved.set(group, field, decode_value(group, field, value)?);
    }
    Ok(resolved)
}

/// Decode a single raw value.
pub fn decode_value(
    group: &str,
    field: &str,
    raw: &str,
) -> Result<OptionValue, ConfigResolutionError> {
    if raw == ABSENT {
        return Ok(OptionValue::Absent);
    }
    serde_json::from_str::<serde_json::Value>(raw)
        .map(OptionValue::from)
        .map_err(|e| ConfigResolutionError::InvalidJson {
            group: group.to_string(),
            field: field.to_string(),
            raw: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Find a configuration file in `dir` or any of its parents.
///
/// A `pyproject.toml` only counts when it has a `[tool.pyflint]` table.
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let mut current = dir.to_path_buf();

    loop {
        for name in CONFIG_FILE_NAMES {
            let candidate = current.join(name);
            if !candidate.is_file() {
                continue;
            }
            if !is_pyproject(&candidate) || has_pyproject_section(&candidate) {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

fn is_pyproject(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == "pyproject.toml")
}

fn pyproject_section(mut table: toml::Table) -> Option<toml::Table> {
    match table.remove("tool")? {
        toml::Value::Table(mut tool) => match tool.remove("pyflint")? {
            toml::Value::Table(section) => Some(section),
            _ => None,
        },
        _ => None,
    }
}

fn has_pyproject_section(path: &Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| toml::from_str::<toml::Table>(&content).ok())
        .and_then(pyproject_section)
        .is_some()
}

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_absent_marker_resolves_to_absent() {
        let mut raw = RawConfig::new();
        raw.set(GLOBALS, "line-length", "None");
        let resolved = resolve(&raw).unwrap();
        assert_eq!(resolved.get(GLOBALS, "line-length"), Some(&OptionValue::Absent));
        assert!(resolved.root().contains_key("line-length"));
    }

    #[test]
    fn test_invalid_json_names_group_and_field() {
        let mut raw = RawConfig::new();
        raw.set(GLOBALS, "line-length", "not-json");
        let error = resolve(&raw).unwrap_err();
        assert_eq!(error.group(), "globals");
        assert_eq!(error.field(), "line-length");
        assert_eq!(error.raw(), "not-json");
    }

    #[test]
    fn test_groups_nest_and_globals_merge_into_root() {
        let mut raw = RawConfig::new();
        raw.set(GLOBALS, "line-length", "100");
        raw.set("flake8-quotes", "inline-quotes", "\"single\"");
        raw.set("pep8-naming", "ignore-names", "[\"setUp\"]");

        let resolved = resolve(&raw).unwrap();
        assert_eq!(resolved.root().get("line-length"), Some(&OptionValue::Integer(100)));
        assert!(resolved.group(GLOBALS).is_none());
        assert_eq!(
            resolved.get("flake8-quotes", "inline-quotes"),
            Some(&OptionValue::String("single".to_string()))
        );
        assert_eq!(
            resolved.get("pep8-naming", "ignore-names"),
            Some(&OptionValue::List(vec![OptionValue::String("setUp".to_string())]))
        );
    }

    #[test]
    fn test_last_write_wins() {
        let mut raw = RawConfig::new();
        raw.set(GLOBALS, "line-length", "80");
        raw.set(GLOBALS, "line-length", "120");
        assert_eq!(raw.get(GLOBALS, "line-length"), Some("120"));
        assert_eq!(raw.iter().count(), 1);
    }

    #[test]
    fn test_resolution_is_atomic() {
        let mut raw = RawConfig::new();
        raw.set("a-group", "first", "1");
        raw.set("z-group", "last", "{broken");
        assert!(resolve(&raw).is_err());
    }

    #[test]
    fn test_json_numbers_keep_their_kind() {
        assert_eq!(decode_value("g", "f", "7").unwrap(), OptionValue::Integer(7));
        assert_eq!(decode_value("g", "f", "7.5").unwrap(), OptionValue::Float(7.5));
        assert_eq!(decode_value("g", "f", "null").unwrap(), OptionValue::Absent);
        assert_eq!(
            decode_value("g", "f", "\"None\"").unwrap(),
            OptionValue::String("None".to_string())
        );
    }

    #[test]
    fn test_raw_config_from_json() {
        let raw = RawConfig::from_json(r#"{"globals": {"line-length": "None"}}"#).unwrap();
        assert_eq!(raw.get(GLOBALS, "line-length"), Some("None"));
    }

    #[test]
    fn test_defaults_cover_every_option() {
        let raw = RawConfig::defaults();
        assert_eq!(raw.get(GLOBALS, "line-length"), Some("88"));
        assert_eq!(raw.get("mccabe", "max-complexity"), Some("10"));
        assert!(resolve(&raw).is_ok());
    }

    #[test]
    fn test_resolved_config_json_shape() {
        let mut resolved = ResolvedConfig::new();
        resolved.set(GLOBALS, "line-length", OptionValue::Integer(100));
        resolved.set(GLOBALS, "builtins", OptionValue::Absent);
        resolved.set("mccabe", "max-complexity", OptionValue::Integer(5));

        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "builtins": null,
                "line-length": 100,
                "mccabe": { "max-complexity": 5 }
            })
        );

        let back: ResolvedConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, resolved);
    }

    #[test]
    fn test_merge_overrides_values() {
        let mut base = ResolvedConfig::new();
        base.set(GLOBALS, "line-length", OptionValue::Integer(88));
        base.set("mccabe", "max-complexity", OptionValue::Integer(10));

        let mut overrides = ResolvedConfig::new();
        overrides.set(GLOBALS, "line-length", OptionValue::Integer(120));
        base.merge(overrides);

        assert_eq!(base.get(GLOBALS, "line-length"), Some(&OptionValue::Integer(120)));
        assert_eq!(base.get("mccabe", "max-complexity"), Some(&OptionValue::Integer(10)));
    }

    #[test]
    fn test_load_toml_file() {
        let toml_content = r#"
line-length = 100
select = ["E", "F", "W"]

[flake8-quotes]
inline-quotes = "single"
"#;
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", toml_content).unwrap();

        let config = ResolvedConfig::from_file(file.path()).unwrap();
        assert_eq!(config.get(GLOBALS, "line-length"), Some(&OptionValue::Integer(100)));
        assert_eq!(
            config.get(GLOBALS, "select").and_then(OptionValue::as_string_list),
            Some(vec!["E".to_string(), "F".to_string(), "W".to_string()])
        );
        assert_eq!(
            config.get("flake8-quotes", "inline-quotes").and_then(OptionValue::as_str),
            Some("single")
        );
    }

    #[test]
    fn test_load_pyproject_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pyproject.toml");
        fs::write(
            &path,
            "[project]\nname = \"demo\"\n\n[tool.pyflint]\nline-length = 79\n\n[tool.pyflint.mccabe]\nmax-complexity = 4\n",
        )
        .unwrap();

        let config = ResolvedConfig::from_file(&path).unwrap();
        assert_eq!(config.get(GLOBALS, "line-length"), Some(&OptionValue::Integer(79)));
        assert_eq!(config.get("mccabe", "max-complexity"), Some(&OptionValue::Integer(4)));
        assert!(config.get(GLOBALS, "name").is_none());
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("pkg").join("sub");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("pyflint.toml"), "line-length = 90\n").unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join("pyflint.toml"));
    }

    #[test]
    fn test_pyproject_without_section_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("pkg");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("pyproject.toml"), "[project]\nname = \"demo\"\n").unwrap();
        fs::write(dir.path().join(".pyflint.toml"), "line-length = 90\n").unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(".pyflint.toml"));
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "line-length = = 3").unwrap();
        let error = ResolvedConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::ParseError { .. }));
        assert!(error.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_to_toml_string_skips_absent() {
        let mut config = ResolvedConfig::new();
        config.set(GLOBALS, "line-length", OptionValue::Integer(100));
        config.set(GLOBALS, "builtins", OptionValue::Absent);
        config.set("mccabe", "max-complexity", OptionValue::Integer(5));

        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("line-length = 100"), "{rendered}");
        assert!(rendered.contains("[mccabe]"), "{rendered}");
        assert!(!rendered.contains("builtins"), "{rendered}");
    }
}

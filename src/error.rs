//! Error types for the analysis engine.
//!
//! Every public entry point returns [`Error`], which wraps one of the three
//! failure families a caller has to tell apart:
//!
//! - [`InitializationError`]: the rule registry could not be built.
//! - [`ConfigResolutionError`]: a configuration value could not be decoded
//!   or is not accepted by the engine. Always names the group, field and
//!   raw value that caused it.
//! - [`AnalysisError`]: the source uses something the engine cannot
//!   analyse. Plain syntax errors are *not* analysis errors; they are
//!   reported as an `E999` diagnostic.

use pyflint_parser::ast::Position;
use pyflint_parser::error::ParseError;
use thiserror::Error;

/// The rule registry failed to build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitializationError {
    #[error("rule code `{code}` is registered more than once")]
    DuplicateCode { code: String },

    #[error("rule code `{code}` is not of the form PREFIX + digits")]
    InvalidCode { code: String },

    #[error("no rules are registered")]
    EmptyRegistry,
}

/// A configuration value could not be decoded or is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigResolutionError {
    #[error("invalid JSON for `{group}.{field}`: {raw:?} ({reason})")]
    InvalidJson {
        group: String,
        field: String,
        raw: String,
        reason: String,
    },

    #[error("unknown option group `{group}` (field `{field}` = {raw})")]
    UnknownGroup {
        group: String,
        field: String,
        raw: String,
    },

    #[error("unknown option `{field}` in group `{group}` (value {raw})")]
    UnknownOption {
        group: String,
        field: String,
        raw: String,
    },

    #[error("invalid type for `{group}.{field}`: expected {expected}, got {raw}")]
    InvalidType {
        group: String,
        field: String,
        raw: String,
        expected: String,
    },

    #[error("invalid value for `{group}.{field}`: {raw} ({reason})")]
    InvalidValue {
        group: String,
        field: String,
        raw: String,
        reason: String,
    },
}

impl ConfigResolutionError {
    /// The configuration group of the offending value.
    pub fn group(&self) -> &str {
        match self {
            ConfigResolutionError::InvalidJson { group, .. }
            | ConfigResolutionError::UnknownGroup { group, .. }
            | ConfigResolutionError::UnknownOption { group, .. }
            | ConfigResolutionError::InvalidType { group, .. }
            | ConfigResolutionError::InvalidValue { group, .. } => group,
        }
    }

    /// The field name of the offending value.
    pub fn field(&self) -> &str {
        match self {
            ConfigResolutionError::InvalidJson { field, .. }
            | ConfigResolutionError::UnknownGroup { field, .. }
            | ConfigResolutionError::UnknownOption { field, .. }
            | ConfigResolutionError::InvalidType { field, .. }
            | ConfigResolutionError::InvalidValue { field, .. } => field,
        }
    }

    /// The raw value as the caller supplied it (JSON text for typed values).
    pub fn raw(&self) -> &str {
        match self {
            ConfigResolutionError::InvalidJson { raw, .. }
            | ConfigResolutionError::UnknownGroup { raw, .. }
            | ConfigResolutionError::UnknownOption { raw, .. }
            | ConfigResolutionError::InvalidType { raw, .. }
            | ConfigResolutionError::InvalidValue { raw, .. } => raw,
        }
    }
}

/// The engine could not complete analysis of a source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("{construct} is not supported (at {position})")]
    Unsupported {
        construct: String,
        position: Position,
    },

    #[error("source is nested too deeply to analyse (at {position})")]
    NestingTooDeep { position: Position },
}

impl AnalysisError {
    /// Converts a parser limitation into an analysis error.
    ///
    /// Returns `None` for genuine syntax errors, which are reported as
    /// diagnostics instead.
    pub fn from_parse_error(error: &ParseError) -> Option<Self> {
        match error {
            ParseError::Unsupported {
                construct,
                position,
            } => Some(AnalysisError::Unsupported {
                construct: construct.clone(),
                position: *position,
            }),
            ParseError::NestingTooDeep { position } => Some(AnalysisError::NestingTooDeep {
                position: *position,
            }),
            _ => None,
        }
    }
}

/// Umbrella error for the engine entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("engine is not initialized; call initialize() first")]
    NotInitialized,

    #[error("initialization failed: {0}")]
    Initialization(#[from] InitializationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigResolutionError),

    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_names_group_and_field() {
        let error = ConfigResolutionError::InvalidJson {
            group: "globals".to_string(),
            field: "line-length".to_string(),
            raw: "not-json".to_string(),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(error.group(), "globals");
        assert_eq!(error.field(), "line-length");
        assert_eq!(error.raw(), "not-json");
        let message = error.to_string();
        assert!(message.contains("globals.line-length"), "{message}");
        assert!(message.contains("not-json"), "{message}");
    }

    #[test]
    fn test_parse_limitations_become_analysis_errors() {
        let position = Position::new(1, 1, 0);
        let unsupported = ParseError::Unsupported {
            construct: "match statement".to_string(),
            position,
        };
        assert!(matches!(
            AnalysisError::from_parse_error(&unsupported),
            Some(AnalysisError::Unsupported { .. })
        ));

        let syntax = ParseError::UnexpectedEof { position };
        assert_eq!(AnalysisError::from_parse_error(&syntax), None);
    }

    #[test]
    fn test_umbrella_wraps_sources() {
        let error: Error = InitializationError::EmptyRegistry.into();
        assert_eq!(error.to_string(), "initialization failed: no rules are registered");
        assert_eq!(
            Error::NotInitialized.to_string(),
            "engine is not initialized; call initialize() first"
        );
    }
}

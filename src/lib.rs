//! pyflint: a Python linter engine.
//!
//! The engine is driven through three calls, see [`engine`]:
//!
//! ```
//! use pyflint::{RawConfig, engine};
//!
//! engine::initialize().unwrap();
//! let config = engine::resolve(&RawConfig::defaults()).unwrap();
//! let diagnostics = engine::check("if (1, 2): pass\n", &config).unwrap();
//! assert_eq!(diagnostics[0].code(), "F634");
//! ```

pub mod config;
pub mod docs;
pub mod engine;
pub mod error;
pub mod fix;
pub mod linter;
pub mod noqa;
pub mod options;
pub mod rules;
pub mod semantic;
pub mod settings;

#[cfg(feature = "cli")]
pub mod reporter;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{OptionValue, RawConfig, ResolvedConfig, resolve};
pub use engine::{check, check_with_stats, initialize, is_initialized, teardown};
pub use error::{AnalysisError, ConfigResolutionError, Error, InitializationError};
pub use fix::apply_fixes;
pub use linter::{CheckResult, Diagnostic, Fix, Linter, Location, Registry, Rule};
pub use settings::Settings;

#[cfg(feature = "cli")]
pub use reporter::{OutputFormat, Reporter};

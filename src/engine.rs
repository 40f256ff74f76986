//! Process-wide engine: the three-call contract used by the playground
//! binding and the CLI.
//!
//! ```text
//! initialize()                    -> Result<(), InitializationError>
//! resolve(&RawConfig)             -> Result<ResolvedConfig, Error>
//! check(source, &ResolvedConfig)  -> Result<Vec<Diagnostic>, Error>
//! ```
//!
//! The rule registry lives behind a lock that is only held long enough to
//! clone an `Arc`, so checks can run concurrently.

use crate::config::{self, RawConfig, ResolvedConfig};
use crate::error::{Error, InitializationError};
use crate::linter::{CheckResult, Diagnostic, Linter, Registry};
use crate::semantic;
use crate::settings::Settings;
use log::{debug, info};
use std::sync::{Arc, PoisonError, RwLock};

static ENGINE: RwLock<Option<Arc<Registry>>> = RwLock::new(None);

/// Build the rule registry and mark the engine ready.
///
/// Calling it again after a success does nothing. On failure the engine
/// stays uninitialized.
pub fn initialize() -> Result<(), InitializationError> {
    let mut engine = ENGINE.write().unwrap_or_else(PoisonError::into_inner);
    if engine.is_some() {
        debug!("engine already initialized");
        return Ok(());
    }
    let registry = Registry::builtin()?;
    semantic::builtin_names();
    info!("engine initialized with {} rules", registry.len());
    *engine = Some(Arc::new(registry));
    Ok(())
}

/// Return the engine to the uninitialized state.
pub fn teardown() {
    let mut engine = ENGINE.write().unwrap_or_else(PoisonError::into_inner);
    if engine.take().is_some() {
        info!("engine torn down");
    }
}

pub fn is_initialized() -> bool {
    ENGINE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

fn registry() -> Result<Arc<Registry>, Error> {
    ENGINE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(Error::NotInitialized)
}

/// Decode a form-shaped configuration.
pub fn resolve(raw: &RawConfig) -> Result<ResolvedConfig, Error> {
    registry()?;
    Ok(config::resolve(raw)?)
}

/// A linter for `config`, validated against the registered rules.
pub fn linter(config: &ResolvedConfig) -> Result<Linter, Error> {
    let registry = registry()?;
    let settings = Settings::from_resolved(config, &registry.codes())?;
    Ok(Linter::new(registry, settings))
}

/// Analyse `source` under `config`.
///
/// The result is sorted by row, column, code and message, and is the same
/// for the same inputs.
pub fn check(source: &str, config: &ResolvedConfig) -> Result<Vec<Diagnostic>, Error> {
    Ok(check_with_stats(source, config)?.diagnostics)
}

/// Like [`check`], also reporting how many diagnostics `# noqa` suppressed.
pub fn check_with_stats(source: &str, config: &ResolvedConfig) -> Result<CheckResult, Error> {
    let linter = linter(config)?;
    Ok(linter.check(source)?)
}

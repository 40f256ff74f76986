//! WebAssembly bindings for pyflint
//!
//! The playground calls [`initialize`] once, then [`resolve`] and [`check`]
//! whenever the editor or the settings form changes. Values cross the
//! boundary as JSON strings; every failure becomes a string `JsValue`.

use wasm_bindgen::prelude::*;

use crate::config::{RawConfig, ResolvedConfig};
use crate::{docs, engine, options};

/// Sets up the panic hook for readable errors in the browser console.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Build the rule registry. Safe to call more than once.
#[wasm_bindgen]
pub fn initialize() -> Result<(), JsValue> {
    engine::initialize().map_err(to_js)
}

/// Decode the settings form, `{ "group": { "field": "value" } }`, into the
/// resolved configuration JSON expected by [`check`].
#[wasm_bindgen]
pub fn resolve(config_json: &str) -> Result<String, JsValue> {
    let raw = RawConfig::from_json(config_json).map_err(to_js)?;
    let resolved = engine::resolve(&raw).map_err(to_js)?;
    serde_json::to_string(&resolved).map_err(to_js)
}

/// Analyse `source`. Returns a JSON array of diagnostics, each shaped
/// `{ "code", "message", "location": { "row", "column" } }`.
#[wasm_bindgen]
pub fn check(source: &str, resolved_json: &str) -> Result<String, JsValue> {
    let config: ResolvedConfig = serde_json::from_str(resolved_json).map_err(to_js)?;
    let diagnostics = engine::check(source, &config).map_err(to_js)?;
    serde_json::to_string(&diagnostics).map_err(to_js)
}

/// The settings form with every field at its default.
#[wasm_bindgen(js_name = defaultConfig)]
pub fn default_config() -> String {
    serde_json::to_string(&RawConfig::defaults()).unwrap_or_else(|_| "{}".to_string())
}

/// Every option group and field, with defaults, types and documentation.
#[wasm_bindgen(js_name = availableOptions)]
pub fn available_options() -> String {
    serde_json::to_string(options::OPTION_GROUPS).unwrap_or_else(|_| "[]".to_string())
}

/// Documentation of every rule, sorted by code.
#[wasm_bindgen(js_name = ruleCodes)]
pub fn rule_codes() -> String {
    serde_json::to_string(docs::all_rule_docs()).unwrap_or_else(|_| "[]".to_string())
}

/// Get the version of pyflint
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

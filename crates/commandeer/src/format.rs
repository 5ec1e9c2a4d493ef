//! Output format selection.
//!
//! [`select_format`] derives the effective format name from the option
//! map, once per invocation, at output time. The precedence rules exist
//! because the CLI layer cannot distinguish "the user typed the default
//! value" from "the user omitted the flag", so options that must always
//! win (`field`, `pipe`) are applied as overrides after defaulting, never
//! baked into the default itself.
//!
//! Precedence, highest first:
//!
//! 1. A truthy `field` option forces the fixed scalar format
//!    ([`STRING_FORMAT`]). Field selection is a single-column filter; any
//!    other renderer would be meaningless.
//! 2. `default-format` (when present) is the base for both branches.
//! 3. `format` falls back to the base; `format-pipe` falls back to the
//!    base.
//! 4. A truthy `pipe` option selects `format-pipe`, otherwise `format`.
//!
//! The function is pure: same options in, same format out.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::context::{value_is_truthy, AnnotationData, Options};

/// The fixed scalar-rendering format forced by field mode.
pub const STRING_FORMAT: &str = "string";

/// Resolves the effective format name from the options.
///
/// Returns `None` when no format option resolves to a name; the formatter
/// applies its own default in that case.
pub fn select_format(options: &Options) -> Option<String> {
    if options.is_truthy("field") {
        return Some(STRING_FORMAT.to_string());
    }

    // Presence, not truthiness, decides the format branches: an explicit
    // format wins over the default even when both name the same thing.
    let base = options.get("default-format");
    let format = options.get("format").or(base);
    let pipe_format = options.get("format-pipe").or(base);

    let selected = if options.is_truthy("pipe") {
        pipe_format
    } else {
        format
    };

    selected.and_then(Value::as_str).map(str::to_string)
}

/// Configuration handed to the formatting engine alongside the payload.
///
/// Built by merging the command's annotation metadata with the raw
/// options; option keys shadow annotation keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderConfig {
    settings: BTreeMap<String, Value>,
}

impl RenderConfig {
    /// Merges annotations and options, options shadowing.
    pub fn new(annotations: &AnnotationData, options: &Options) -> Self {
        let mut settings = BTreeMap::new();
        for (key, value) in annotations.iter() {
            settings.insert(key.to_string(), value.clone());
        }
        for (key, value) in options.iter() {
            settings.insert(key.to_string(), value.clone());
        }
        Self { settings }
    }

    /// Returns the setting for a key, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// Returns the setting as a string slice, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(Value::as_str)
    }

    /// Returns the selected field name, when field mode is active.
    ///
    /// An empty or non-string `field` value does not count.
    pub fn field(&self) -> Option<&str> {
        self.get("field")
            .filter(|v| value_is_truthy(v))
            .and_then(Value::as_str)
    }

    /// Returns true if no settings are present.
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

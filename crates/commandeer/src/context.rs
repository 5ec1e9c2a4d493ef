//! Invocation data carriers.
//!
//! [`InvocationContext`] holds everything the external parser produced for
//! one command invocation: positional arguments, named options, and the
//! annotation metadata attached to the command definition. The context is
//! created once per invocation, threaded through the pipeline, and dropped
//! when the invocation completes. It carries no behavior beyond typed
//! accessors.
//!
//! Option and argument values use `serde_json::Value` as the common
//! currency, so any parser front end (clap, a config file, a test) can
//! produce a context without the pipeline caring where it came from.

use serde_json::Value;
use std::collections::BTreeMap;

/// Named options for one invocation, keyed by option name.
///
/// Keys are unique. Truthiness follows the loose convention CLI layers
/// use for flag-like options: `null`, `false`, `0`, `0.0`, `""`, and empty
/// arrays/objects are falsy, everything else is truthy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    map: BTreeMap<String, Value>,
}

impl Options {
    /// Creates an empty option map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option value, replacing any previous value for the name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.map.insert(name.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Returns the raw value for an option, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name)
    }

    /// Returns the option value as a string slice, if present and a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.map.get(name).and_then(Value::as_str)
    }

    /// Returns true if the option is present with a truthy value.
    pub fn is_truthy(&self, name: &str) -> bool {
        self.map.get(name).is_some_and(value_is_truthy)
    }

    /// Returns true if the option name is present, regardless of value.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of options set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no options are set.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Loose truthiness for option values.
pub(crate) fn value_is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Annotation metadata derived from the command definition.
///
/// Values are strings or arrays of strings. The map is built once from the
/// command metadata and never mutated afterwards; there is deliberately no
/// `&mut` accessor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationData {
    map: BTreeMap<String, Value>,
}

impl AnnotationData {
    /// Creates an empty annotation map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the annotation value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Returns the annotation value as a string slice, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(Value::as_str)
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns true if no annotations are present.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AnnotationData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parsed input for one command invocation.
///
/// Owned by the caller for the duration of the invocation and passed by
/// reference to the pipeline's collaborators. Pre-execution hooks
/// (initialize, interact, validate) receive it mutably; everything after
/// execution sees it read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationContext {
    /// Positional argument values, in order.
    pub arguments: Vec<Value>,
    /// Named option values.
    pub options: Options,
    /// Command annotation metadata, immutable after construction.
    pub annotations: AnnotationData,
}

impl InvocationContext {
    /// Creates a context from its three parts.
    pub fn new(arguments: Vec<Value>, options: Options, annotations: AnnotationData) -> Self {
        Self {
            arguments,
            options,
            annotations,
        }
    }

    /// Creates a context with the given positional arguments and nothing else.
    pub fn with_arguments(arguments: Vec<Value>) -> Self {
        Self {
            arguments,
            ..Self::default()
        }
    }
}

//! Command result classification.
//!
//! Everything a command handler can produce is folded into [`RawResult`],
//! a tagged variant type built exactly once at the executor boundary. The
//! rest of the pipeline performs a single exhaustive match instead of
//! re-inspecting the value's shape at every step.
//!
//! Classification rules for dynamic values (`serde_json::Value`):
//!
//! - integer number → [`RawResult::Integer`] (the bare exit-status shortcut)
//! - string → [`RawResult::Text`]
//! - null → [`RawResult::Empty`]
//! - everything else (bool, float, array, object) → [`RawResult::Structured`]
//!
//! A handler that wants to *print* a number returns it inside an object or
//! array; a bare integer is always an exit status.

use serde_json::Value;
use thiserror::Error;

/// A command failure: human-readable message plus exit code.
///
/// Produced when a handler returns `Err`, or constructed directly by
/// validation hooks and handlers that want to signal failure as a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CommandError {
    /// Human-readable failure message.
    pub message: String,
    /// Exit code carried by the failure. 0 when unspecified.
    pub code: i32,
}

impl CommandError {
    /// Creates an error with an explicit exit code.
    pub fn new(message: impl Into<String>, code: i32) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

impl From<anyhow::Error> for CommandError {
    /// Failures without an explicit code default to 0.
    fn from(err: anyhow::Error) -> Self {
        Self::new(err.to_string(), 0)
    }
}

impl From<String> for CommandError {
    fn from(message: String) -> Self {
        Self::new(message, 0)
    }
}

impl From<&str> for CommandError {
    fn from(message: &str) -> Self {
        Self::new(message, 0)
    }
}

/// The classified result of one command execution.
///
/// At most one variant is ever active; the executor and the hook layer
/// construct it, the interpreter consumes it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// The handler failed, or a hook produced a failure value.
    Error(CommandError),
    /// The handler signaled a bare exit status.
    Integer(i64),
    /// Structured data intended for a formatter.
    Structured(Value),
    /// Pre-rendered text.
    Text(String),
    /// No meaningful value. Treated as success with no output.
    Empty,
}

impl RawResult {
    /// Returns the exit code embedded in an error result.
    ///
    /// This is the fallback the status hook chain uses when no hook
    /// assigns an explicit status.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RawResult::Error(err) => Some(err.code),
            _ => None,
        }
    }

    /// Derives the renderable payload when no output hook intervenes.
    ///
    /// Errors surface their message as plain text; integers and empty
    /// results carry nothing to print.
    pub fn default_payload(&self) -> OutputPayload {
        match self {
            RawResult::Error(err) => OutputPayload::Text(err.message.clone()),
            RawResult::Integer(_) => OutputPayload::None,
            RawResult::Structured(value) => OutputPayload::Structured(value.clone()),
            RawResult::Text(text) => OutputPayload::Text(text.clone()),
            RawResult::Empty => OutputPayload::None,
        }
    }

    /// Classifies any serializable value through its JSON representation.
    ///
    /// Lets handlers return typed structs without building
    /// `serde_json::Value` by hand. The classification rules are the same
    /// as [`From<Value>`](#impl-From%3CValue%3E-for-RawResult).
    pub fn from_serialize<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(serde_json::to_value(value)?.into())
    }

    /// Returns true if this is an error result.
    pub fn is_error(&self) -> bool {
        matches!(self, RawResult::Error(_))
    }

    /// Returns true if this is the empty result.
    pub fn is_empty(&self) -> bool {
        matches!(self, RawResult::Empty)
    }
}

impl From<Value> for RawResult {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawResult::Empty,
            Value::String(s) => RawResult::Text(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RawResult::Integer(i),
                None => RawResult::Structured(Value::Number(n)),
            },
            other => RawResult::Structured(other),
        }
    }
}

impl From<()> for RawResult {
    fn from(_: ()) -> Self {
        RawResult::Empty
    }
}

impl From<i32> for RawResult {
    fn from(value: i32) -> Self {
        RawResult::Integer(value.into())
    }
}

impl From<i64> for RawResult {
    fn from(value: i64) -> Self {
        RawResult::Integer(value)
    }
}

impl From<String> for RawResult {
    fn from(text: String) -> Self {
        RawResult::Text(text)
    }
}

impl From<&str> for RawResult {
    fn from(text: &str) -> Self {
        RawResult::Text(text.to_string())
    }
}

impl From<CommandError> for RawResult {
    fn from(err: CommandError) -> Self {
        RawResult::Error(err)
    }
}

/// The renderable output extracted from a result.
///
/// Only [`OutputPayload::Structured`] is eligible for the formatter path;
/// text goes out verbatim and `None` produces no bytes at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OutputPayload {
    /// Structured data for the formatting engine.
    Structured(Value),
    /// Plain text, written verbatim with a trailing newline.
    Text(String),
    /// Nothing to render.
    #[default]
    None,
}

impl OutputPayload {
    /// Returns true if the payload can be handed to a formatter.
    pub fn is_formattable(&self) -> bool {
        matches!(self, OutputPayload::Structured(_))
    }
}

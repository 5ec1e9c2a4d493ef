//! The formatter seam.
//!
//! The pipeline does not render anything itself. When an outcome carries a
//! formattable payload, the router hands it to a [`Formatter`] together
//! with the selected format name and a [`RenderConfig`]. What "json" or
//! "table" actually look like is the formatter's business.
//!
//! [`SerdeFormatter`](crate::SerdeFormatter) is the serde-backed
//! implementation this crate ships; applications with a template engine
//! plug in their own.

use std::io::Write;

use serde_json::Value;
use thiserror::Error;

use crate::format::RenderConfig;
use crate::serialize::SerializeError;

/// Errors surfaced by a formatter.
///
/// These are environment or configuration faults, not command failures;
/// they propagate out of the pipeline as [`OutputError`](crate::OutputError).
#[derive(Debug, Error)]
pub enum RenderError {
    /// The requested format name is not known to this formatter.
    #[error("unknown output format: {0}")]
    UnknownFormat(String),

    /// Field mode named a field the payload does not contain.
    #[error("field not present in output data: {0}")]
    UnknownField(String),

    /// Serializing the payload failed.
    #[error(transparent)]
    Serialize(#[from] SerializeError),

    /// Writing to the stream failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Renders a structured payload to a stream in a named format.
///
/// `format` is `None` when no format option resolved for the invocation;
/// the implementation applies its own default. `config` carries the
/// command's annotation metadata merged with the raw options.
pub trait Formatter: Send + Sync {
    /// Writes the payload to the stream.
    fn write(
        &self,
        stream: &mut dyn Write,
        format: Option<&str>,
        payload: &Value,
        config: &RenderConfig,
    ) -> Result<(), RenderError>;
}

//! Output routing.
//!
//! [`OutputRouter`] takes an interpreted outcome and turns it into bytes
//! on the right stream:
//!
//! - non-zero status → the error path: a configured [`ErrorDisplay`], or
//!   plain text when none is set; the status is returned either way.
//! - formattable payload plus a configured formatter → the formatting
//!   path, with the format selected from the options at this point.
//! - anything else → the bare path: strings are written verbatim with a
//!   trailing newline, everything else produces no output.
//!
//! [`Streams`] owns the two write handles. In a single-stream environment
//! (no error handle) error output falls back to the standard stream.

use std::fmt;
use std::io::{self, Write};

use thiserror::Error;

use crate::context::InvocationContext;
use crate::format::{select_format, RenderConfig};
use crate::interpret::{InterpretedOutcome, TargetStream};
use crate::render::{Formatter, RenderError};
use crate::result::{OutputPayload, RawResult};

/// Environment faults raised while producing output.
///
/// Command failures never take this shape; they travel as interpreted
/// outcomes with a non-zero status.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Writing to a stream failed.
    #[error("failed to write command output: {0}")]
    Io(#[from] io::Error),

    /// The formatter rejected the payload or format.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The write handles for one invocation.
pub struct Streams {
    out: Box<dyn Write + Send>,
    err: Option<Box<dyn Write + Send>>,
}

impl Streams {
    /// Process stdout and stderr.
    pub fn stdio() -> Self {
        Self {
            out: Box::new(io::stdout()),
            err: Some(Box::new(io::stderr())),
        }
    }

    /// Separate standard and error handles.
    pub fn new(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            err: Some(err),
        }
    }

    /// A single-stream environment: everything, errors included, goes to
    /// the one handle.
    pub fn single(out: Box<dyn Write + Send>) -> Self {
        Self { out, err: None }
    }

    /// Resolves the handle for a target stream, falling back to the
    /// standard handle when no error handle exists.
    pub fn target(&mut self, stream: TargetStream) -> &mut dyn Write {
        match stream {
            TargetStream::Error => match self.err.as_mut() {
                Some(err) => err.as_mut(),
                None => self.out.as_mut(),
            },
            TargetStream::Standard => self.out.as_mut(),
        }
    }
}

impl fmt::Debug for Streams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Streams")
            .field("has_err", &self.err.is_some())
            .finish()
    }
}

/// Custom rendering for failed outcomes.
///
/// Receives the stream the outcome resolved to, the extracted payload,
/// the final status, and the original raw result for implementations that
/// want more than the payload.
pub trait ErrorDisplay: Send + Sync {
    /// Writes a representation of the failure to the stream.
    fn display(
        &self,
        stream: &mut dyn Write,
        payload: &OutputPayload,
        status: i32,
        original: &RawResult,
    ) -> io::Result<()>;
}

/// Routes interpreted outcomes to streams.
pub struct OutputRouter<'a> {
    formatter: Option<&'a dyn Formatter>,
    error_display: Option<&'a dyn ErrorDisplay>,
}

impl<'a> OutputRouter<'a> {
    /// Creates a router over the configured collaborators.
    pub fn new(
        formatter: Option<&'a dyn Formatter>,
        error_display: Option<&'a dyn ErrorDisplay>,
    ) -> Self {
        Self {
            formatter,
            error_display,
        }
    }

    /// Writes the outcome and returns its status code.
    pub fn route(
        &self,
        outcome: &InterpretedOutcome,
        ctx: &InvocationContext,
        streams: &mut Streams,
    ) -> Result<i32, OutputError> {
        let stream = streams.target(outcome.stream);

        if outcome.status != 0 {
            match self.error_display {
                Some(display) => {
                    display.display(stream, &outcome.payload, outcome.status, &outcome.original)?
                }
                None => write_plain(stream, &outcome.payload)?,
            }
            return Ok(outcome.status);
        }

        if let OutputPayload::Structured(value) = &outcome.payload {
            if let Some(formatter) = self.formatter {
                let format = select_format(&ctx.options);
                let config = RenderConfig::new(&ctx.annotations, &ctx.options);
                formatter.write(stream, format.as_deref(), value, &config)?;
                return Ok(0);
            }
        }

        write_plain(stream, &outcome.payload)?;
        Ok(0)
    }
}

/// The bare path: strings verbatim plus a newline, anything else silent.
fn write_plain(stream: &mut dyn Write, payload: &OutputPayload) -> io::Result<()> {
    if let OutputPayload::Text(text) = payload {
        writeln!(stream, "{}", text)?;
    }
    Ok(())
}

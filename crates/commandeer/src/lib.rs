//! Hook-driven command execution pipeline.
//!
//! `commandeer` is the dispatch core of a CLI framework: it takes a parsed
//! command invocation, runs the lifecycle hooks around the user-supplied
//! handler, interprets whatever the handler produced, and routes the
//! result to the right stream, in the right format, with the right exit
//! code.
//!
//! # Pipeline
//!
//! ```text
//! parsed invocation
//!   → validate hooks   (abort, or replace arguments)
//!   → command handler  (failures contained at the boundary)
//!   → alter hooks      (rewrite the result)
//!   → interpretation   (status, payload, target stream)
//!   → routing          (error path / formatter path / bare string path)
//! ```
//!
//! # Result interpretation
//!
//! Every handler return value is classified into a [`RawResult`] once,
//! then interpreted deterministically:
//!
//! - a status hook's answer always wins;
//! - otherwise a bare integer result *is* the exit status and nothing is
//!   printed;
//! - otherwise status 0, and the extracted payload is rendered. Non-zero
//!   status routes to the error stream, always.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use commandeer::{
//!     FnHandler, InvocationContext, NoHooks, Options, Pipeline, SerdeFormatter, Streams,
//! };
//! use serde_json::{json, Value};
//!
//! let pipeline = Pipeline::new(Arc::new(NoHooks))
//!     .with_formatter(Arc::new(SerdeFormatter::new()));
//!
//! let mut handler = FnHandler::new(|_args: &[Value], _opts: &Options| {
//!     Ok::<_, anyhow::Error>(json!({"status": "ok"}))
//! });
//!
//! let mut ctx = InvocationContext::default();
//! let mut streams = Streams::stdio();
//! let exit = pipeline
//!     .run(&["status"], &mut handler, &mut ctx, &mut streams)
//!     .expect("writing to stdio failed");
//! assert_eq!(exit, 0);
//! ```
//!
//! # What this crate is not
//!
//! Argument parsing (bring clap or anything else; see [`augment_command`]
//! and [`options_from_matches`] for the clap bridge), hook discovery by
//! annotation, template rendering, and terminal primitives all live
//! outside. The seams are [`HookCoordinator`], [`Formatter`], and
//! [`ErrorDisplay`].

mod args;
mod context;
mod exec;
mod format;
mod hooks;
mod interpret;
mod pipeline;
mod render;
mod result;
mod route;
mod serialize;

pub use args::{
    augment_command, detect_pipe, options_from_matches, FIELD_FLAG, FORMAT_FLAG, FORMAT_PIPE_FLAG,
    PIPE_FLAG,
};

pub use context::{AnnotationData, InvocationContext, Options};

pub use exec::{CommandExecutor, CommandHandler, FnHandler};

pub use format::{select_format, RenderConfig, STRING_FORMAT};

pub use hooks::{
    AlterFn, CommandHooks, ExtractFn, HookCoordinator, HookRegistry, InitializeFn, InteractFn,
    NoHooks, OptionsFn, StatusFn, Validation, ValidateFn,
};

pub use interpret::{Interpretation, InterpretedOutcome, ResultInterpreter, TargetStream};

pub use pipeline::Pipeline;

pub use render::{Formatter, RenderError};

pub use result::{CommandError, OutputPayload, RawResult};

pub use route::{ErrorDisplay, OutputError, OutputRouter, Streams};

pub use serialize::{to_csv, to_json, to_xml, to_yaml, SerdeFormatter, SerializeError};

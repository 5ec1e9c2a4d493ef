//! The invocation pipeline.
//!
//! [`Pipeline`] sequences one command invocation end to end:
//!
//! ```text
//! VALIDATE ──reject──────────────┐
//!    │                           │
//! EXECUTE (failures contained)   │
//!    │                           │
//! ALTER                          │
//!    │                           ▼
//! INTERPRET ──integer shortcut── exit code, no output
//!    │
//! ROUTE ── bytes on a stream, exit code
//! ```
//!
//! A validation reject skips execution and alteration but still flows
//! through interpretation and routing, as if the handler had produced the
//! rejected value. The integer shortcut skips routing entirely.
//!
//! The hook coordinator and the formatter are process-wide collaborators:
//! constructed once at application startup, injected here, and shared by
//! every invocation. Each invocation brings its own context, handler, and
//! streams.

use std::sync::Arc;

use crate::context::InvocationContext;
use crate::exec::{CommandExecutor, CommandHandler};
use crate::hooks::{HookCoordinator, Validation};
use crate::interpret::{Interpretation, ResultInterpreter};
use crate::render::Formatter;
use crate::result::RawResult;
use crate::route::{ErrorDisplay, OutputError, OutputRouter, Streams};

/// Orchestrates hooks, execution, interpretation, and routing for every
/// command in the hosting application. One pipeline per application.
pub struct Pipeline {
    hooks: Arc<dyn HookCoordinator>,
    formatter: Option<Arc<dyn Formatter>>,
    error_display: Option<Arc<dyn ErrorDisplay>>,
    executor: CommandExecutor,
}

impl Pipeline {
    /// Creates a pipeline over the given hook coordinator.
    pub fn new(hooks: Arc<dyn HookCoordinator>) -> Self {
        Self {
            hooks,
            formatter: None,
            error_display: None,
            executor: CommandExecutor,
        }
    }

    /// Configures the formatting engine for structured payloads.
    ///
    /// Without one, structured results produce no output.
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Configures a custom renderer for failed outcomes.
    ///
    /// Without one, failures fall back to plain text.
    pub fn with_error_display(mut self, display: Arc<dyn ErrorDisplay>) -> Self {
        self.error_display = Some(display);
        self
    }

    /// Returns the hook coordinator.
    pub fn hooks(&self) -> &dyn HookCoordinator {
        self.hooks.as_ref()
    }

    /// Returns the configured formatter, if any.
    pub fn formatter(&self) -> Option<&dyn Formatter> {
        self.formatter.as_deref()
    }

    /// Runs the initialize hooks for a command.
    pub fn initialize(&self, names: &[&str], ctx: &mut InvocationContext) {
        self.hooks.initialize(names, ctx);
    }

    /// Runs the collect-options hooks for a command.
    pub fn collect_options(&self, names: &[&str], ctx: &mut InvocationContext) {
        self.hooks.collect_options(names, &mut ctx.options);
    }

    /// Runs the interact hooks for a command.
    pub fn interact(&self, names: &[&str], ctx: &mut InvocationContext) {
        self.hooks.interact(names, ctx);
    }

    /// Processes one invocation and returns the process exit status.
    ///
    /// The returned `Err` covers environment faults only (stream writes,
    /// formatter failures); command failures come back as a non-zero
    /// `Ok` status with their output already written.
    pub fn run(
        &self,
        names: &[&str],
        handler: &mut dyn CommandHandler,
        ctx: &mut InvocationContext,
        streams: &mut Streams,
    ) -> Result<i32, OutputError> {
        let result = self.validate_run_and_alter(names, handler, ctx);
        self.handle_result(names, result, ctx, streams)
    }

    /// VALIDATE, EXECUTE, ALTER. A reject returns its value directly,
    /// skipping execution and alteration.
    fn validate_run_and_alter(
        &self,
        names: &[&str],
        handler: &mut dyn CommandHandler,
        ctx: &mut InvocationContext,
    ) -> RawResult {
        match self.hooks.validate(names, ctx) {
            Validation::Reject(result) => return result,
            Validation::ReplaceArgs(arguments) => ctx.arguments = arguments,
            Validation::Pass => {}
        }

        let result = self.executor.execute(handler, ctx);
        self.hooks.alter_result(names, result, ctx)
    }

    /// INTERPRET and ROUTE. The integer shortcut returns before any
    /// routing happens.
    fn handle_result(
        &self,
        names: &[&str],
        result: RawResult,
        ctx: &InvocationContext,
        streams: &mut Streams,
    ) -> Result<i32, OutputError> {
        let interpreter = ResultInterpreter::new(self.hooks.as_ref());
        match interpreter.interpret(names, result) {
            Interpretation::Exit(code) => Ok(code),
            Interpretation::Outcome(outcome) => {
                let router = OutputRouter::new(self.formatter.as_deref(), self.error_display.as_deref());
                router.route(&outcome, ctx, streams)
            }
        }
    }
}

//! Lifecycle hook coordination.
//!
//! Hooks let applications run custom code at named points of the command
//! pipeline without touching handler logic:
//!
//! ```text
//! parsed invocation
//!   → INITIALIZE      (context setup)
//!   → COLLECT-OPTIONS (inject option defaults)
//!   → INTERACT        (prompt for missing input)
//!   → VALIDATE        (abort, or replace arguments)
//!   → command handler
//!   → ALTER-RESULT    (rewrite the raw result)
//!   → DETERMINE-STATUS (assign an explicit exit code)
//!   → EXTRACT-OUTPUT  (pick the renderable payload)
//! ```
//!
//! The pipeline consumes hooks through the [`HookCoordinator`] trait. How
//! hook implementations are discovered and matched to commands is not this
//! crate's business; [`HookRegistry`] is a straightforward coordinator that
//! stores per-command [`CommandHooks`] and runs every hook registered for
//! any name in the invocation's name set, in registration order.
//!
//! Hooks are total: no hook phase returns an error. A validation hook that
//! wants to fail the invocation returns [`Validation::Reject`] with the
//! value that should become the command result.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::context::{InvocationContext, Options};
use crate::result::{OutputPayload, RawResult};

/// Outcome of the validate phase.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Proceed with execution unchanged.
    Pass,
    /// Replace the positional arguments, then proceed.
    ReplaceArgs(Vec<Value>),
    /// Abort execution. The carried value becomes the command result and
    /// flows through interpretation and routing as if the handler had
    /// produced it.
    Reject(RawResult),
}

/// The hook interface the pipeline consumes.
///
/// Every method takes the invocation's command-name set (primary name plus
/// aliases) so an implementation can resolve which hooks apply. Default
/// implementations are the identity behaviors: nothing happens, results
/// pass through, and the status falls back to the exit code embedded in an
/// error result.
pub trait HookCoordinator: Send + Sync {
    /// Runs once before anything else touches the context.
    fn initialize(&self, _names: &[&str], _ctx: &mut InvocationContext) {}

    /// Lets hooks inject option defaults before execution.
    fn collect_options(&self, _names: &[&str], _options: &mut Options) {}

    /// Runs interactive prompts before validation.
    fn interact(&self, _names: &[&str], _ctx: &mut InvocationContext) {}

    /// Validates (and may rewrite) the arguments.
    fn validate(&self, _names: &[&str], _ctx: &mut InvocationContext) -> Validation {
        Validation::Pass
    }

    /// Post-processes the raw result after a successful execution.
    fn alter_result(
        &self,
        _names: &[&str],
        result: RawResult,
        _ctx: &InvocationContext,
    ) -> RawResult {
        result
    }

    /// Assigns an explicit exit status, or `None` to let the interpreter
    /// infer one. The default surfaces the code carried by an error result.
    fn determine_status(&self, _names: &[&str], result: &RawResult) -> Option<i32> {
        result.exit_code()
    }

    /// Extracts the renderable payload from the result.
    fn extract_output(&self, _names: &[&str], result: &RawResult) -> OutputPayload {
        result.default_payload()
    }
}

/// A coordinator with no hooks registered; every phase is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl HookCoordinator for NoHooks {}

/// Initialize hook: mutate the context before the pipeline starts.
pub type InitializeFn = Arc<dyn Fn(&mut InvocationContext) + Send + Sync>;

/// Collect-options hook: inject option defaults.
pub type OptionsFn = Arc<dyn Fn(&mut Options) + Send + Sync>;

/// Interact hook: prompt for missing input.
pub type InteractFn = Arc<dyn Fn(&mut InvocationContext) + Send + Sync>;

/// Validate hook: pass, replace arguments, or reject.
pub type ValidateFn = Arc<dyn Fn(&mut InvocationContext) -> Validation + Send + Sync>;

/// Alter hook: rewrite the raw result.
pub type AlterFn = Arc<dyn Fn(RawResult, &InvocationContext) -> RawResult + Send + Sync>;

/// Status hook: assign an explicit exit status.
pub type StatusFn = Arc<dyn Fn(&RawResult) -> Option<i32> + Send + Sync>;

/// Extract hook: pick the renderable payload, or `None` to defer.
pub type ExtractFn = Arc<dyn Fn(&RawResult) -> Option<OutputPayload> + Send + Sync>;

/// Hooks registered for a single command name.
///
/// Built with chained `on_*` methods and handed to [`HookRegistry::register`].
#[derive(Clone, Default)]
pub struct CommandHooks {
    initialize: Vec<InitializeFn>,
    options: Vec<OptionsFn>,
    interact: Vec<InteractFn>,
    validate: Vec<ValidateFn>,
    alter: Vec<AlterFn>,
    status: Vec<StatusFn>,
    extract: Vec<ExtractFn>,
}

impl CommandHooks {
    /// Creates an empty hook set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no hooks are registered in any phase.
    pub fn is_empty(&self) -> bool {
        self.initialize.is_empty()
            && self.options.is_empty()
            && self.interact.is_empty()
            && self.validate.is_empty()
            && self.alter.is_empty()
            && self.status.is_empty()
            && self.extract.is_empty()
    }

    /// Adds an initialize hook.
    pub fn on_initialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut InvocationContext) + Send + Sync + 'static,
    {
        self.initialize.push(Arc::new(f));
        self
    }

    /// Adds a collect-options hook.
    pub fn on_options<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Options) + Send + Sync + 'static,
    {
        self.options.push(Arc::new(f));
        self
    }

    /// Adds an interact hook.
    pub fn on_interact<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut InvocationContext) + Send + Sync + 'static,
    {
        self.interact.push(Arc::new(f));
        self
    }

    /// Adds a validate hook.
    pub fn on_validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut InvocationContext) -> Validation + Send + Sync + 'static,
    {
        self.validate.push(Arc::new(f));
        self
    }

    /// Adds an alter-result hook.
    pub fn on_alter<F>(mut self, f: F) -> Self
    where
        F: Fn(RawResult, &InvocationContext) -> RawResult + Send + Sync + 'static,
    {
        self.alter.push(Arc::new(f));
        self
    }

    /// Adds a status hook.
    pub fn on_status<F>(mut self, f: F) -> Self
    where
        F: Fn(&RawResult) -> Option<i32> + Send + Sync + 'static,
    {
        self.status.push(Arc::new(f));
        self
    }

    /// Adds an extract-output hook.
    pub fn on_extract<F>(mut self, f: F) -> Self
    where
        F: Fn(&RawResult) -> Option<OutputPayload> + Send + Sync + 'static,
    {
        self.extract.push(Arc::new(f));
        self
    }
}

impl fmt::Debug for CommandHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHooks")
            .field("initialize", &self.initialize.len())
            .field("options", &self.options.len())
            .field("interact", &self.interact.len())
            .field("validate", &self.validate.len())
            .field("alter", &self.alter.len())
            .field("status", &self.status.len())
            .field("extract", &self.extract.len())
            .finish()
    }
}

/// A [`HookCoordinator`] backed by per-command hook sets.
///
/// Registration is keyed by command name. When an invocation carries a set
/// of names (primary plus aliases), hooks for every matching name run, in
/// the order the names appear and then in registration order.
#[derive(Clone, Default)]
pub struct HookRegistry {
    by_command: HashMap<String, CommandHooks>,
}

impl HookRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers hooks for a command name, merging with any already present.
    pub fn register(&mut self, name: impl Into<String>, hooks: CommandHooks) {
        let entry = self.by_command.entry(name.into()).or_default();
        entry.initialize.extend(hooks.initialize);
        entry.options.extend(hooks.options);
        entry.interact.extend(hooks.interact);
        entry.validate.extend(hooks.validate);
        entry.alter.extend(hooks.alter);
        entry.status.extend(hooks.status);
        entry.extract.extend(hooks.extract);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, hooks: CommandHooks) -> Self {
        self.register(name, hooks);
        self
    }

    /// Returns the hooks registered for a single command name.
    pub fn get(&self, name: &str) -> Option<&CommandHooks> {
        self.by_command.get(name)
    }

    fn matching<'a>(&'a self, names: &'a [&'a str]) -> impl Iterator<Item = &'a CommandHooks> {
        names.iter().filter_map(|name| self.by_command.get(*name))
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("commands", &self.by_command.len())
            .finish()
    }
}

impl HookCoordinator for HookRegistry {
    fn initialize(&self, names: &[&str], ctx: &mut InvocationContext) {
        for hooks in self.matching(names) {
            for hook in &hooks.initialize {
                hook(ctx);
            }
        }
    }

    fn collect_options(&self, names: &[&str], options: &mut Options) {
        for hooks in self.matching(names) {
            for hook in &hooks.options {
                hook(options);
            }
        }
    }

    fn interact(&self, names: &[&str], ctx: &mut InvocationContext) {
        for hooks in self.matching(names) {
            for hook in &hooks.interact {
                hook(ctx);
            }
        }
    }

    fn validate(&self, names: &[&str], ctx: &mut InvocationContext) -> Validation {
        for hooks in self.matching(names) {
            for hook in &hooks.validate {
                match hook(ctx) {
                    Validation::Pass => {}
                    outcome => return outcome,
                }
            }
        }
        Validation::Pass
    }

    fn alter_result(&self, names: &[&str], result: RawResult, ctx: &InvocationContext) -> RawResult {
        let mut current = result;
        for hooks in self.matching(names) {
            for hook in &hooks.alter {
                current = hook(current, ctx);
            }
        }
        current
    }

    fn determine_status(&self, names: &[&str], result: &RawResult) -> Option<i32> {
        for hooks in self.matching(names) {
            for hook in &hooks.status {
                if let Some(status) = hook(result) {
                    return Some(status);
                }
            }
        }
        result.exit_code()
    }

    fn extract_output(&self, names: &[&str], result: &RawResult) -> OutputPayload {
        for hooks in self.matching(names) {
            for hook in &hooks.extract {
                if let Some(payload) = hook(result) {
                    return payload;
                }
            }
        }
        result.default_payload()
    }
}

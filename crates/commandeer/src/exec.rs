//! Command handler execution.
//!
//! [`CommandHandler`] is the contract for the user-supplied command
//! callback. The executor assembles the positional arguments and the
//! option map from the invocation context, invokes the handler, and
//! converts any failure into [`RawResult::Error`]. Nothing escapes this
//! boundary: downstream stages always receive a classified result.
//!
//! Handlers usually come from closures via [`FnHandler`], which accepts
//! any return type that classifies into a [`RawResult`] and any error
//! type that converts into a [`CommandError`]:
//!
//! ```rust
//! use commandeer::{CommandHandler, FnHandler, InvocationContext, CommandExecutor, RawResult};
//! use serde_json::json;
//!
//! let mut handler = FnHandler::new(|args: &[serde_json::Value], _opts: &commandeer::Options| {
//!     Ok::<_, anyhow::Error>(json!({"count": args.len()}))
//! });
//!
//! let ctx = InvocationContext::with_arguments(vec![json!("a")]);
//! let result = CommandExecutor.execute(&mut handler, &ctx);
//! assert_eq!(result, RawResult::Structured(json!({"count": 1})));
//! ```

use std::marker::PhantomData;

use serde_json::Value;

use crate::context::{InvocationContext, Options};
use crate::result::{CommandError, RawResult};

/// The user-supplied command callback.
///
/// Handlers take `&mut self`, allowing direct mutation of internal state;
/// CLI invocations are processed one at a time.
pub trait CommandHandler {
    /// Runs the command with the assembled arguments and options.
    ///
    /// Returning `Ok(RawResult::Error(..))` is legal: a handler may signal
    /// failure as a value instead of an `Err` when it wants full control
    /// over the error result.
    fn execute(&mut self, args: &[Value], options: &Options) -> Result<RawResult, CommandError>;
}

/// Wraps an `FnMut` closure as a [`CommandHandler`].
///
/// The closure may return any `Result<R, E>` where `R` classifies into a
/// [`RawResult`] (unit, integers, strings, `serde_json::Value`, or a
/// `RawResult` itself) and `E` converts into a [`CommandError`]
/// (`anyhow::Error`, strings, or `CommandError`).
pub struct FnHandler<F, R, E> {
    f: F,
    _phantom: PhantomData<fn() -> (R, E)>,
}

impl<F, R, E> FnHandler<F, R, E>
where
    F: FnMut(&[Value], &Options) -> Result<R, E>,
    R: Into<RawResult>,
    E: Into<CommandError>,
{
    /// Creates a handler from the given closure.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, R, E> CommandHandler for FnHandler<F, R, E>
where
    F: FnMut(&[Value], &Options) -> Result<R, E>,
    R: Into<RawResult>,
    E: Into<CommandError>,
{
    fn execute(&mut self, args: &[Value], options: &Options) -> Result<RawResult, CommandError> {
        (self.f)(args, options).map(Into::into).map_err(Into::into)
    }
}

/// Invokes handlers and contains their failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    /// Runs the handler with arguments and options taken from the context.
    ///
    /// A failing handler never propagates: the `Err` is converted into
    /// [`RawResult::Error`] right here.
    pub fn execute(&self, handler: &mut dyn CommandHandler, ctx: &InvocationContext) -> RawResult {
        match handler.execute(&ctx.arguments, &ctx.options) {
            Ok(result) => result,
            Err(err) => RawResult::Error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx_with_args(args: Vec<Value>) -> InvocationContext {
        InvocationContext::with_arguments(args)
    }

    #[test]
    fn test_executor_classifies_structured_result() {
        let mut handler = FnHandler::new(|args: &[Value], _: &Options| {
            Ok::<_, CommandError>(json!({"first": args[0]}))
        });

        let result = CommandExecutor.execute(&mut handler, &ctx_with_args(vec![json!("x")]));
        assert_eq!(result, RawResult::Structured(json!({"first": "x"})));
    }

    #[test]
    fn test_executor_converts_failure() {
        let mut handler =
            FnHandler::new(|_: &[Value], _: &Options| Err::<(), _>(CommandError::new("disk full", 2)));

        let result = CommandExecutor.execute(&mut handler, &ctx_with_args(vec![]));
        assert_eq!(result, RawResult::Error(CommandError::new("disk full", 2)));
    }

    #[test]
    fn test_executor_converts_anyhow_failure_with_default_code() {
        let mut handler =
            FnHandler::new(|_: &[Value], _: &Options| Err::<(), _>(anyhow::anyhow!("boom")));

        match CommandExecutor.execute(&mut handler, &ctx_with_args(vec![])) {
            RawResult::Error(err) => {
                assert_eq!(err.message, "boom");
                assert_eq!(err.code, 0);
            }
            other => panic!("expected error result, got {:?}", other),
        }
    }

    #[test]
    fn test_handler_may_return_error_as_value() {
        let mut handler = FnHandler::new(|_: &[Value], _: &Options| {
            Ok::<_, CommandError>(RawResult::Error(CommandError::new("soft fail", 3)))
        });

        let result = CommandExecutor.execute(&mut handler, &ctx_with_args(vec![]));
        assert_eq!(result.exit_code(), Some(3));
    }

    #[test]
    fn test_integer_and_unit_returns() {
        let mut exit_handler = FnHandler::new(|_: &[Value], _: &Options| Ok::<_, CommandError>(4));
        assert_eq!(
            CommandExecutor.execute(&mut exit_handler, &ctx_with_args(vec![])),
            RawResult::Integer(4)
        );

        let mut silent_handler = FnHandler::new(|_: &[Value], _: &Options| Ok::<_, CommandError>(()));
        assert_eq!(
            CommandExecutor.execute(&mut silent_handler, &ctx_with_args(vec![])),
            RawResult::Empty
        );
    }

    #[test]
    fn test_handler_state_mutation() {
        let mut count = 0u32;
        let mut handler = FnHandler::new(|_: &[Value], _: &Options| {
            count += 1;
            Ok::<_, CommandError>(json!({ "count": count }))
        });

        let ctx = ctx_with_args(vec![]);
        CommandExecutor.execute(&mut handler, &ctx);
        let result = CommandExecutor.execute(&mut handler, &ctx);
        assert_eq!(result, RawResult::Structured(json!({"count": 2})));
    }

    #[test]
    fn test_options_reach_the_handler() {
        let mut handler = FnHandler::new(|_: &[Value], options: &Options| {
            Ok::<_, CommandError>(options.get_str("name").unwrap_or("none").to_string())
        });

        let ctx = InvocationContext::new(
            vec![],
            Options::new().with("name", "alpha"),
            Default::default(),
        );
        assert_eq!(
            CommandExecutor.execute(&mut handler, &ctx),
            RawResult::Text("alpha".into())
        );
    }
}

//! Result interpretation.
//!
//! [`ResultInterpreter`] reconciles the competing status signals of one
//! invocation into a single decision: the exit status, the payload to
//! render, and the stream it belongs on. Precedence, in order:
//!
//! 1. An explicit status from the hook chain is the candidate status.
//! 2. A bare [`RawResult::Integer`] with no explicit status short-circuits
//!    the whole invocation: the integer is the exit status and nothing is
//!    printed. This is the low-ceremony escape hatch for commands that
//!    only need to signal "exit N".
//! 3. Otherwise the candidate defaults to 0: no status reported means
//!    success.
//! 4. The hook chain extracts the renderable payload.
//! 5. Non-zero status targets the error stream.

use crate::hooks::HookCoordinator;
use crate::result::{OutputPayload, RawResult};

/// Which stream an outcome belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStream {
    /// Standard output.
    Standard,
    /// Error output.
    Error,
}

impl TargetStream {
    /// Derives the stream from a status code. Non-zero targets the error
    /// stream, without exception.
    pub fn for_status(status: i32) -> Self {
        if status != 0 {
            TargetStream::Error
        } else {
            TargetStream::Standard
        }
    }
}

/// A fully interpreted invocation outcome, ready for routing.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpretedOutcome {
    /// Final exit status. 0 is success.
    pub status: i32,
    /// The payload to render, possibly rewritten by hooks.
    pub payload: OutputPayload,
    /// Target stream, derived from the status.
    pub stream: TargetStream,
    /// The raw result the outcome was interpreted from. Error display
    /// implementations receive it alongside the payload.
    pub original: RawResult,
}

/// What the interpreter decided.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    /// Integer shortcut: exit immediately with this code, produce no
    /// output, skip routing entirely.
    Exit(i32),
    /// Route this outcome.
    Outcome(InterpretedOutcome),
}

/// The decision engine between "a handler produced a result" and "bytes
/// belong on a stream".
pub struct ResultInterpreter<'a> {
    hooks: &'a dyn HookCoordinator,
}

impl<'a> ResultInterpreter<'a> {
    /// Creates an interpreter over the given hook coordinator.
    pub fn new(hooks: &'a dyn HookCoordinator) -> Self {
        Self { hooks }
    }

    /// Interprets a classified result into an outcome or an immediate exit.
    pub fn interpret(&self, names: &[&str], result: RawResult) -> Interpretation {
        let candidate = self.hooks.determine_status(names, &result);

        // An integer result with no explicit status IS the exit status.
        if let RawResult::Integer(code) = result {
            if candidate.is_none() {
                return Interpretation::Exit(code as i32);
            }
        }

        let status = candidate.unwrap_or(0);
        let payload = self.hooks.extract_output(names, &result);

        Interpretation::Outcome(InterpretedOutcome {
            status,
            payload,
            stream: TargetStream::for_status(status),
            original: result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{CommandHooks, HookRegistry, NoHooks};
    use crate::result::CommandError;
    use serde_json::json;

    #[test]
    fn test_target_stream_from_status() {
        assert_eq!(TargetStream::for_status(0), TargetStream::Standard);
        assert_eq!(TargetStream::for_status(1), TargetStream::Error);
        assert_eq!(TargetStream::for_status(-1), TargetStream::Error);
    }

    #[test]
    fn test_integer_shortcut_fires_without_status_hook() {
        let interpreter = ResultInterpreter::new(&NoHooks);
        assert_eq!(
            interpreter.interpret(&["x"], RawResult::Integer(3)),
            Interpretation::Exit(3)
        );
        assert_eq!(
            interpreter.interpret(&["x"], RawResult::Integer(0)),
            Interpretation::Exit(0)
        );
    }

    #[test]
    fn test_status_hook_suppresses_integer_shortcut() {
        let registry = HookRegistry::new().with("x", CommandHooks::new().on_status(|_| Some(5)));
        let interpreter = ResultInterpreter::new(&registry);

        match interpreter.interpret(&["x"], RawResult::Integer(3)) {
            Interpretation::Outcome(outcome) => {
                assert_eq!(outcome.status, 5);
                assert_eq!(outcome.stream, TargetStream::Error);
                // Integers carry nothing to print even when routed.
                assert_eq!(outcome.payload, OutputPayload::None);
            }
            other => panic!("expected outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_result_is_success_with_no_payload() {
        let interpreter = ResultInterpreter::new(&NoHooks);
        match interpreter.interpret(&["x"], RawResult::Empty) {
            Interpretation::Outcome(outcome) => {
                assert_eq!(outcome.status, 0);
                assert_eq!(outcome.stream, TargetStream::Standard);
                assert_eq!(outcome.payload, OutputPayload::None);
            }
            other => panic!("expected outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_error_code_becomes_status() {
        let interpreter = ResultInterpreter::new(&NoHooks);
        let result = RawResult::Error(CommandError::new("disk full", 2));
        match interpreter.interpret(&["x"], result.clone()) {
            Interpretation::Outcome(outcome) => {
                assert_eq!(outcome.status, 2);
                assert_eq!(outcome.stream, TargetStream::Error);
                assert_eq!(outcome.payload, OutputPayload::Text("disk full".into()));
                assert_eq!(outcome.original, result);
            }
            other => panic!("expected outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_structured_result_keeps_payload() {
        let interpreter = ResultInterpreter::new(&NoHooks);
        match interpreter.interpret(&["x"], RawResult::Structured(json!({"a": 1}))) {
            Interpretation::Outcome(outcome) => {
                assert_eq!(outcome.status, 0);
                assert_eq!(
                    outcome.payload,
                    OutputPayload::Structured(json!({"a": 1}))
                );
            }
            other => panic!("expected outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_stream_matches_status_invariant() {
        let registry =
            HookRegistry::new().with("x", CommandHooks::new().on_status(|_| Some(0)));
        let interpreter = ResultInterpreter::new(&registry);

        // Explicit status 0 still routes to the standard stream.
        match interpreter.interpret(&["x"], RawResult::Text("ok".into())) {
            Interpretation::Outcome(outcome) => {
                assert_eq!(outcome.status, 0);
                assert_eq!(outcome.stream, TargetStream::Standard);
            }
            other => panic!("expected outcome, got {:?}", other),
        }
    }
}

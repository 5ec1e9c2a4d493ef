//! Property tests for format selection.

use commandeer::{select_format, Options};
use proptest::prelude::*;
use serde_json::Value;

/// An arbitrary option value from the shapes the CLI layer produces.
fn option_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| Value::from(n)),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

/// An arbitrary option map drawn from the names format selection reads,
/// plus unrelated noise keys.
fn option_map() -> impl Strategy<Value = Options> {
    proptest::collection::vec(
        (
            prop_oneof![
                Just("format".to_string()),
                Just("format-pipe".to_string()),
                Just("default-format".to_string()),
                Just("pipe".to_string()),
                Just("field".to_string()),
                "[a-z-]{1,10}",
            ],
            option_value(),
        ),
        0..8,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn selection_is_idempotent(options in option_map()) {
        prop_assert_eq!(select_format(&options), select_format(&options));
    }

    #[test]
    fn truthy_field_always_forces_string(options in option_map(), field in "[a-z]{1,8}") {
        let options = options.with("field", field);
        prop_assert_eq!(select_format(&options), Some("string".to_string()));
    }

    #[test]
    fn pipe_prefers_the_pipe_format(options in option_map(), fmt in "[a-z]{1,8}", pipe_fmt in "[a-z]{1,8}") {
        let options = options
            .with("field", "")
            .with("pipe", true)
            .with("format", fmt)
            .with("format-pipe", pipe_fmt.clone());
        prop_assert_eq!(select_format(&options), Some(pipe_fmt));
    }

    #[test]
    fn explicit_format_wins_without_pipe(options in option_map(), fmt in "[a-z]{1,8}") {
        let options = options
            .with("field", "")
            .with("pipe", false)
            .with("format", fmt.clone());
        prop_assert_eq!(select_format(&options), Some(fmt));
    }
}

#[test]
fn field_and_pipe_precedence() {
    let options = Options::new().with("field", "name").with("format", "json");
    assert_eq!(select_format(&options), Some("string".to_string()));

    let options = Options::new()
        .with("pipe", true)
        .with("format", "table")
        .with("format-pipe", "csv");
    assert_eq!(select_format(&options), Some("csv".to_string()));
}

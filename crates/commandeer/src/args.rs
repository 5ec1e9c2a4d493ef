//! clap integration.
//!
//! The pipeline consumes an [`Options`] map and does not care where it
//! came from. For clap-based front ends this module injects the output
//! option contract as global flags and extracts an option map back out of
//! parsed matches.
//!
//! The flags deliberately carry no default values: format selection must
//! distinguish "the user typed nothing" from "the user typed the default",
//! and clap cannot report that difference once a default exists. Defaults
//! belong in `default-format`, supplied by the application or a
//! collect-options hook.

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::context::Options;

/// Option name for the explicit output format.
pub const FORMAT_FLAG: &str = "format";

/// Option name for the format used in pipe mode.
pub const FORMAT_PIPE_FLAG: &str = "format-pipe";

/// Option name for pipe mode.
pub const PIPE_FLAG: &str = "pipe";

/// Option name for single-field selection.
pub const FIELD_FLAG: &str = "field";

/// Adds the output option contract to a clap command as global flags.
pub fn augment_command(cmd: Command) -> Command {
    cmd.arg(
        Arg::new(FORMAT_FLAG)
            .long(FORMAT_FLAG)
            .value_name("FORMAT")
            .global(true)
            .action(ArgAction::Set)
            .help("Output format, e.g. json, yaml, csv"),
    )
    .arg(
        Arg::new(FORMAT_PIPE_FLAG)
            .long(FORMAT_PIPE_FLAG)
            .value_name("FORMAT")
            .global(true)
            .action(ArgAction::Set)
            .help("Output format used when --pipe is active"),
    )
    .arg(
        Arg::new(PIPE_FLAG)
            .long(PIPE_FLAG)
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Favor a machine-consumable output format"),
    )
    .arg(
        Arg::new(FIELD_FLAG)
            .long(FIELD_FLAG)
            .value_name("NAME")
            .global(true)
            .action(ArgAction::Set)
            .help("Select a single field from the structured result"),
    )
}

/// Extracts the output option contract from parsed matches.
///
/// Tolerates commands that were not augmented: absent flag definitions
/// simply contribute nothing.
pub fn options_from_matches(matches: &ArgMatches) -> Options {
    let mut options = Options::new();

    for flag in [FORMAT_FLAG, FORMAT_PIPE_FLAG, FIELD_FLAG] {
        if let Ok(Some(value)) = matches.try_get_one::<String>(flag) {
            options.set(flag, value.as_str());
        }
    }

    if let Ok(Some(true)) = matches.try_get_one::<bool>(PIPE_FLAG).map(|v| v.copied()) {
        options.set(PIPE_FLAG, true);
    }

    options
}

/// Turns pipe mode on when stdout is not a terminal.
///
/// Opt-in: call it after extracting options to make piped invocations
/// default to the machine-consumable format. An already truthy `pipe`
/// option is left alone.
pub fn detect_pipe(options: &mut Options) {
    if !options.is_truthy(PIPE_FLAG) && !atty::is(atty::Stream::Stdout) {
        options.set(PIPE_FLAG, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::select_format;

    fn parse(args: &[&str]) -> ArgMatches {
        augment_command(Command::new("app"))
            .try_get_matches_from(args)
            .unwrap()
    }

    #[test]
    fn test_augmented_flags_parse() {
        let matches = parse(&["app", "--format", "json", "--pipe", "--field", "name"]);
        let options = options_from_matches(&matches);

        assert_eq!(options.get_str(FORMAT_FLAG), Some("json"));
        assert!(options.is_truthy(PIPE_FLAG));
        assert_eq!(options.get_str(FIELD_FLAG), Some("name"));
    }

    #[test]
    fn test_absent_flags_stay_absent() {
        let matches = parse(&["app"]);
        let options = options_from_matches(&matches);

        assert!(!options.contains(FORMAT_FLAG));
        assert!(!options.contains(FORMAT_PIPE_FLAG));
        assert!(!options.contains(FIELD_FLAG));
        // SetTrue reports false when the flag was not given; absence is
        // what format selection needs, so false is simply not recorded.
        assert!(!options.contains(PIPE_FLAG));
    }

    #[test]
    fn test_unaugmented_command_yields_empty_options() {
        let matches = Command::new("app").try_get_matches_from(["app"]).unwrap();
        let options = options_from_matches(&matches);
        assert!(options.is_empty());
    }

    #[test]
    fn test_flags_flow_into_format_selection() {
        let matches = parse(&[
            "app",
            "--format",
            "table",
            "--format-pipe",
            "csv",
            "--pipe",
        ]);
        let options = options_from_matches(&matches);
        assert_eq!(select_format(&options), Some("csv".into()));
    }

    #[test]
    fn test_detect_pipe_respects_explicit_flag() {
        let mut options = Options::new().with(PIPE_FLAG, true);
        detect_pipe(&mut options);
        assert!(options.is_truthy(PIPE_FLAG));
    }
}

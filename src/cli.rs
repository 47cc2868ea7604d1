use clap::{Arg, ArgAction, Command};
use std::ffi::OsString;

pub const DEFAULT_COUNT: &str = "3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub verbose: bool,
    pub count: usize,
    /// Task words joined by single spaces; `None` only with `--config`.
    pub task: Option<String>,
    pub show_config: bool,
}

pub fn command() -> Command {
    Command::new("ai")
        .about("Turns a task description into a shell command and runs it")
        .long_about(
            "ai asks a text-generation API for shell commands that perform the described \
             task, lets you pick one, then runs it with your shell",
        )
        .version(env!("CARGO_PKG_VERSION"))
        .after_help("Examples:\n  ai find biggest file here\n  ai -v list files in current dir\n  ai -n 5 find files here")
        .arg(Arg::new("verbose")
            .short('v')
            .help("Show per-call timings, raw responses and the command list")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("count")
            .short('n')
            .value_name("COUNT")
            .help("Number of concurrent API calls")
            .value_parser(clap::value_parser!(u32).range(1..))
            .default_value(DEFAULT_COUNT))
        .arg(Arg::new("config")
            .long("config")
            .help("Show configuration information")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("task")
            .help("The task to perform, in plain words")
            .num_args(1..)
            .trailing_var_arg(true)
            .allow_hyphen_values(true)
            .required_unless_present("config"))
}

/// Parses process arguments; clap errors carry their own exit codes.
pub fn parse_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;

    let task = matches
        .get_many::<String>("task")
        .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "));

    Ok(CliArgs {
        verbose: matches.get_flag("verbose"),
        count: matches.get_one::<u32>("count").copied().unwrap_or(3) as usize,
        task,
        show_config: matches.get_flag("config"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_task_words_are_joined_with_spaces() {
        let args = parse_from(["ai", "find", "biggest", "file", "here"]).unwrap();
        assert_eq!(args.task.as_deref(), Some("find biggest file here"));
        assert_eq!(args.count, 3);
        assert!(!args.verbose);
    }

    #[test]
    fn test_flags_before_task() {
        let args = parse_from(["ai", "-v", "-n", "5", "list", "files"]).unwrap();
        assert!(args.verbose);
        assert_eq!(args.count, 5);
        assert_eq!(args.task.as_deref(), Some("list files"));
    }

    #[test]
    fn test_flag_like_words_after_task_belong_to_task() {
        let args = parse_from(["ai", "grep", "-r", "TODO", "-v"]).unwrap();
        assert!(!args.verbose);
        assert_eq!(args.task.as_deref(), Some("grep -r TODO -v"));
    }

    #[test]
    fn test_missing_task_is_usage_error() {
        let err = parse_from(["ai"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);

        let err = parse_from(["ai", "-v"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_count_must_be_positive_integer() {
        for bad in ["0", "-2", "three"] {
            let err = parse_from(["ai", "-n", bad, "list", "files"]).unwrap_err();
            assert_eq!(err.exit_code(), 2, "value {:?}", bad);
        }
    }

    #[test]
    fn test_count_requires_value() {
        let err = parse_from(["ai", "-n"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_config_flag_needs_no_task() {
        let args = parse_from(["ai", "--config"]).unwrap();
        assert!(args.show_config);
        assert!(args.task.is_none());
    }
}

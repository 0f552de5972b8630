//! Command-line flag parsing.
//!
//! Flags follow the single-dash convention: `-s url`, `-s=url`, `--s url`
//! and `-creds file` are all accepted. Parsing stops at the first
//! positional argument, a lone `-`, or `--`.

use std::path::PathBuf;

/// Which binary is parsing its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// `mqtt-pub`
    Publisher,
    /// `mqtt-req`
    Requester,
}

impl Tool {
    /// Binary name, also used as the MQTT client id prefix.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Publisher => "mqtt-pub",
            Self::Requester => "mqtt-req",
        }
    }

    /// Usage text printed for `-h` and on usage errors.
    #[must_use]
    pub fn usage(self) -> String {
        let name = self.name();
        let raw_flag = match self {
            Self::Publisher => "",
            Self::Requester => " [-o]",
        };
        let raw_help = match self {
            Self::Publisher => "",
            Self::Requester => "  -o            Write the raw reply to stdout\n",
        };

        format!(
            r"Usage: {name} [-s server] [-creds file]{raw_flag} <subject> [<msg>...]

FLAGS:
  -s <urls>     The broker URLs, separated by comma (default tcp://localhost:1883)
  -creds <file> User credentials file (JSON with username and password)
{raw_help}  -h            Show this help message

MESSAGES:
  text          sent as-is
  @path         contents of a file
  hex:<hex>     hex-decoded bytes
  b64:<base64>  base64-decoded bytes
  a85:<ascii85> ascii85-decoded bytes
  (none)        standard input is sent as one message
"
        )
    }

    fn has_raw_output(self) -> bool {
        matches!(self, Self::Requester)
    }
}

/// Parsed flags and positional arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// `-s`: comma-separated broker URLs
    pub servers: Option<String>,
    /// `-creds`: credential file
    pub creds: Option<PathBuf>,
    /// `-o`: write raw replies to stdout (requester only)
    pub raw_output: bool,
    /// Subject to publish or request on
    pub subject: String,
    /// Message arguments, still undecoded
    pub messages: Vec<String>,
}

/// Outcome of argument parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `-h` was given
    Help,
    /// Run the command with these options
    Run(Options),
}

/// Parse arguments (without the program name) for `tool`.
///
/// # Errors
///
/// Returns error on an unknown flag, a flag missing its value, a bad
/// boolean value, or a missing subject.
///
/// # Examples
///
/// ```
/// use mqtt_tools_cli::{parse_args, Invocation, Tool};
///
/// let Invocation::Run(options) = parse_args(Tool::Publisher, ["-s", "tcp://b:1883", "greet", "hello"]).unwrap() else {
///     unreachable!()
/// };
/// assert_eq!(options.servers.as_deref(), Some("tcp://b:1883"));
/// assert_eq!(options.subject, "greet");
/// assert_eq!(options.messages, ["hello"]);
/// ```
pub fn parse_args<I, S>(tool: Tool, args: I) -> Result<Invocation, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut options = Options::default();
    let mut help = false;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--" {
            break;
        }
        let Some(flag) = arg.strip_prefix('-').filter(|flag| !flag.is_empty()) else {
            positional.push(arg);
            break;
        };
        let flag = flag.strip_prefix('-').unwrap_or(flag);
        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (flag, None),
        };

        match name {
            "s" => options.servers = Some(flag_value(name, inline, &mut args)?),
            "creds" => options.creds = Some(PathBuf::from(flag_value(name, inline, &mut args)?)),
            "h" | "help" => help = bool_value(name, inline.as_deref())?,
            "o" if tool.has_raw_output() => {
                options.raw_output = bool_value(name, inline.as_deref())?;
            }
            _ => return Err(UsageError::UnknownFlag(name.to_string())),
        }
    }
    positional.extend(args);

    if help {
        return Ok(Invocation::Help);
    }

    let mut positional = positional.into_iter();
    options.subject = positional.next().ok_or(UsageError::MissingSubject)?;
    options.messages = positional.collect();

    Ok(Invocation::Run(options))
}

fn flag_value(
    name: &str,
    inline: Option<String>,
    rest: &mut impl Iterator<Item = String>,
) -> Result<String, UsageError> {
    inline
        .or_else(|| rest.next())
        .ok_or_else(|| UsageError::MissingValue(name.to_string()))
}

fn bool_value(name: &str, inline: Option<&str>) -> Result<bool, UsageError> {
    match inline {
        None | Some("1" | "t" | "T" | "true" | "TRUE" | "True") => Ok(true),
        Some("0" | "f" | "F" | "false" | "FALSE" | "False") => Ok(false),
        Some(value) => Err(UsageError::InvalidBool {
            flag: name.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Errors in the command line itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    /// Flag not known to this tool
    #[error("flag provided but not defined: -{0}")]
    UnknownFlag(String),
    /// Flag given without its value
    #[error("flag needs an argument: -{0}")]
    MissingValue(String),
    /// Boolean flag with an unparseable value
    #[error("invalid boolean value {value:?} for -{flag}")]
    InvalidBool {
        /// Flag name
        flag: String,
        /// Rejected value
        value: String,
    },
    /// No subject positional argument
    #[error("missing subject")]
    MissingSubject,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tool: Tool, args: &[&str]) -> Options {
        match parse_args(tool, args.iter().copied()) {
            Ok(Invocation::Run(options)) => options,
            other => panic!("unexpected parse result: {other:?}"),
        }
    }

    #[test]
    fn subject_and_messages() {
        let options = run(Tool::Publisher, &["greet", "hello", "hex:00"]);
        assert_eq!(options.subject, "greet");
        assert_eq!(options.messages, ["hello", "hex:00"]);
        assert!(options.servers.is_none());
        assert!(options.creds.is_none());
    }

    #[test]
    fn subject_only_means_stdin() {
        let options = run(Tool::Requester, &["svc.echo"]);
        assert_eq!(options.subject, "svc.echo");
        assert!(options.messages.is_empty());
    }

    #[test]
    fn flag_spellings() {
        let options = run(
            Tool::Publisher,
            &["-s=tcp://a:1", "--creds", "/etc/creds.json", "t"],
        );
        assert_eq!(options.servers.as_deref(), Some("tcp://a:1"));
        assert_eq!(options.creds, Some(PathBuf::from("/etc/creds.json")));

        let options = run(Tool::Publisher, &["--s=b:2", "-creds=c.json", "t"]);
        assert_eq!(options.servers.as_deref(), Some("b:2"));
        assert_eq!(options.creds, Some(PathBuf::from("c.json")));
    }

    #[test]
    fn last_flag_wins() {
        let options = run(Tool::Publisher, &["-s", "a", "-s", "b", "t"]);
        assert_eq!(options.servers.as_deref(), Some("b"));
    }

    #[test]
    fn flags_stop_at_first_positional() {
        let options = run(Tool::Publisher, &["t", "-s", "x"]);
        assert!(options.servers.is_none());
        assert_eq!(options.messages, ["-s", "x"]);
    }

    #[test]
    fn double_dash_ends_flags() {
        let options = run(Tool::Publisher, &["--", "-t", "-h"]);
        assert_eq!(options.subject, "-t");
        assert_eq!(options.messages, ["-h"]);
    }

    #[test]
    fn lone_dash_is_positional() {
        let options = run(Tool::Publisher, &["-", "m"]);
        assert_eq!(options.subject, "-");
    }

    #[test]
    fn help_wins_over_missing_subject() {
        for args in [&["-h"][..], &["--help"], &["-h", "t", "m"], &["-s", "x", "-h=true"]] {
            assert_eq!(
                parse_args(Tool::Publisher, args.iter().copied()),
                Ok(Invocation::Help)
            );
        }
    }

    #[test]
    fn help_false_runs() {
        let options = run(Tool::Publisher, &["-h=false", "t"]);
        assert_eq!(options.subject, "t");
    }

    #[test]
    fn raw_output_only_for_requester() {
        let options = run(Tool::Requester, &["-o", "t", "m"]);
        assert!(options.raw_output);

        assert_eq!(
            parse_args(Tool::Publisher, ["-o", "t"]),
            Err(UsageError::UnknownFlag("o".to_string()))
        );
    }

    #[test]
    fn missing_subject() {
        assert_eq!(
            parse_args(Tool::Publisher, Vec::<String>::new()),
            Err(UsageError::MissingSubject)
        );
        assert_eq!(
            parse_args(Tool::Requester, ["-s", "x"]),
            Err(UsageError::MissingSubject)
        );
    }

    #[test]
    fn missing_value() {
        assert_eq!(
            parse_args(Tool::Publisher, ["-creds"]),
            Err(UsageError::MissingValue("creds".to_string()))
        );
    }

    #[test]
    fn invalid_bool() {
        assert!(matches!(
            parse_args(Tool::Requester, ["-o=maybe", "t"]),
            Err(UsageError::InvalidBool { .. })
        ));
    }

    #[test]
    fn usage_mentions_tool_flags() {
        assert!(Tool::Publisher.usage().starts_with("Usage: mqtt-pub"));
        assert!(!Tool::Publisher.usage().contains("-o "));
        assert!(Tool::Requester.usage().contains("-o"));
    }
}

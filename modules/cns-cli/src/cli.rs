//! Argument parsing (spec §6). A thin `clap` derive over the documented
//! flags, with its error formatting overridden so illegal options and
//! missing arguments exit with the literal messages the store operator
//! contract promises, not clap's own wording.

use clap::Parser;
use cns_common::{EngineConfig, EngineError};

#[derive(Parser, Debug)]
#[command(
    name = "cns-orchestrator",
    about = "Reconciling controller for the cns configuration store",
    version,
    disable_version_flag = true
)]
pub struct Cli {
    /// Print version and exit
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    pub version: (),

    /// Store host (overrides CNS_HOST; default 127.0.0.1)
    #[arg(short = 'H', long = "host")]
    pub host: Option<String>,

    /// Store port (overrides CNS_PORT; default 2379)
    #[arg(short = 'P', long = "port")]
    pub port: Option<u16>,

    /// Store username (overrides CNS_USERNAME; default empty)
    #[arg(short = 'u', long = "username")]
    pub username: Option<String>,

    /// Store password (overrides CNS_PASSWORD; default empty)
    #[arg(short = 'p', long = "password")]
    pub password: Option<String>,

    /// Disable ANSI colour in status output
    #[arg(short = 'm', long = "monochrome")]
    pub monochrome: bool,

    /// Suppress informational output
    #[arg(short = 's', long = "silent")]
    pub silent: bool,

    /// Emit debug traces
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Merge with the environment, CLI flags winning on every field.
    pub fn into_config(self) -> EngineConfig {
        let mut config = EngineConfig::from_env();
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(username) = self.username {
            config.username = username;
        }
        if let Some(password) = self.password {
            config.password = password;
        }
        config.monochrome = self.monochrome;
        config.silent = self.silent;
        config.debug = self.debug;
        config
    }
}

/// Outcome of parsing argv: either a ready `Cli`, or a request to print
/// something (help/version) and exit 0 without treating it as an error.
pub enum ParseOutcome {
    Parsed(Cli),
    Print(String),
}

pub fn parse<I, T>(args: I) -> Result<ParseOutcome, EngineError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(ParseOutcome::Parsed(cli)),
        Err(e) => translate(e),
    }
}

fn translate(e: clap::Error) -> Result<ParseOutcome, EngineError> {
    use clap::error::ErrorKind;

    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            Ok(ParseOutcome::Print(e.render().to_string()))
        }
        ErrorKind::UnknownArgument | ErrorKind::InvalidSubcommand => {
            Err(EngineError::IllegalOption(offending_arg(&e)))
        }
        ErrorKind::MissingRequiredArgument | ErrorKind::InvalidValue | ErrorKind::NoEquals => {
            Err(EngineError::MissingArgument(offending_arg(&e)))
        }
        _ => Err(EngineError::IllegalOption(offending_arg(&e))),
    }
}

/// Pull the offending flag or value out of clap's error context, falling
/// back to the rendered message if clap didn't tag one.
fn offending_arg(e: &clap::Error) -> String {
    use clap::error::{ContextKind, ContextValue};

    e.context()
        .find_map(|(kind, value)| match (kind, value) {
            (ContextKind::InvalidArg, ContextValue::String(s)) => Some(s.clone()),
            (ContextKind::InvalidArg, ContextValue::Strings(ss)) => ss.first().cloned(),
            _ => None,
        })
        .unwrap_or_else(|| e.render().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &[&str]) -> Vec<String> {
        std::iter::once("cns-orchestrator".to_string())
            .chain(s.iter().map(|a| a.to_string()))
            .collect()
    }

    #[test]
    fn parses_documented_flags() {
        let outcome = parse(args(&[
            "-H", "store.local", "-P", "2390", "-u", "root", "-p", "hunter2", "-m", "-s", "-d",
        ]))
        .expect("valid flags parse");
        let cli = match outcome {
            ParseOutcome::Parsed(cli) => cli,
            ParseOutcome::Print(_) => panic!("expected a parsed Cli"),
        };
        assert_eq!(cli.host.as_deref(), Some("store.local"));
        assert_eq!(cli.port, Some(2390));
        assert_eq!(cli.username.as_deref(), Some("root"));
        assert_eq!(cli.password.as_deref(), Some("hunter2"));
        assert!(cli.monochrome && cli.silent && cli.debug);
    }

    #[test]
    fn short_version_flag_prints_and_does_not_error() {
        let outcome = parse(args(&["-v"])).expect("-v is recognised");
        assert!(matches!(outcome, ParseOutcome::Print(_)));
    }

    #[test]
    fn short_help_flag_prints_and_does_not_error() {
        let outcome = parse(args(&["-h"])).expect("-h is recognised");
        assert!(matches!(outcome, ParseOutcome::Print(_)));
    }

    #[test]
    fn unknown_flag_is_illegal_option() {
        let err = parse(args(&["--bogus"])).unwrap_err();
        assert_eq!(err.category(), "illegal_option");
    }

    #[test]
    fn missing_value_is_missing_argument() {
        let err = parse(args(&["--host"])).unwrap_err();
        assert_eq!(err.category(), "missing_argument");
    }

    #[test]
    fn cli_flags_override_env() {
        std::env::set_var("CNS_HOST", "env-host");
        std::env::set_var("CNS_PORT", "9999");
        let outcome = parse(args(&["-H", "cli-host"])).unwrap();
        let cli = match outcome {
            ParseOutcome::Parsed(cli) => cli,
            ParseOutcome::Print(_) => panic!("expected a parsed Cli"),
        };
        let config = cli.into_config();
        assert_eq!(config.host, "cli-host");
        assert_eq!(config.port, 9999); // untouched by CLI, env still applies
        std::env::remove_var("CNS_HOST");
        std::env::remove_var("CNS_PORT");
    }

    #[test]
    fn host_defaults_to_loopback_when_unset() {
        std::env::remove_var("CNS_HOST");
        let outcome = parse(args(&[])).unwrap();
        let cli = match outcome {
            ParseOutcome::Parsed(cli) => cli,
            ParseOutcome::Print(_) => panic!("expected a parsed Cli"),
        };
        let config = cli.into_config();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 2379);
    }
}

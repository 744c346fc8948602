use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser};
use std::ffi::OsString;

use crate::model::LaunchConfig;
use crate::orchestrator::LaunchError;

pub const BIN_NAME: &str = "wholebif-launcher";

/// CLI entry point for the WholeBIF launcher.
///
/// Help and version flags are disabled: every token other than the four
/// forwarded flags is rejected.
#[derive(Parser, Debug)]
#[command(
    name = BIN_NAME,
    about = "Check the environment and database, then start the WholeBIF query app",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
pub struct Cli {
    /// Create a public share link
    #[arg(long)]
    pub share: bool,

    /// Basic auth credentials
    #[arg(long, value_name = "USER:PASSWORD", allow_hyphen_values = true, value_parser = flag_value)]
    pub auth: Option<String>,

    /// Bind address (e.g. 0.0.0.0)
    #[arg(long, value_name = "HOSTNAME", allow_hyphen_values = true, value_parser = flag_value)]
    pub host: Option<String>,

    /// Port to serve on
    #[arg(long, value_name = "PORT", allow_hyphen_values = true, value_parser = flag_value)]
    pub port: Option<String>,
}

impl From<Cli> for LaunchConfig {
    fn from(cli: Cli) -> Self {
        Self {
            share: cli.share,
            auth: cli.auth,
            host: cli.host,
            port: cli.port,
        }
    }
}

/// A flag value must be present and must not itself look like a flag.
fn flag_value(raw: &str) -> Result<String, String> {
    if raw.is_empty() {
        Err("value must not be empty".to_string())
    } else if raw.starts_with("--") {
        Err(format!("expected a value, found flag '{raw}'"))
    } else {
        Ok(raw.to_string())
    }
}

/// Parse the raw argument list (program name excluded).
pub fn parse_args<I, T>(args: I) -> Result<LaunchConfig, LaunchError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    reject_unsupported_forms(&args)?;

    let argv = std::iter::once(OsString::from(BIN_NAME)).chain(args);

    Cli::try_parse_from(argv)
        .map(LaunchConfig::from)
        .map_err(|err| classify(&err))
}

/// Flags that consume the following token as their value.
const VALUE_FLAGS: [&str; 3] = ["--auth", "--host", "--port"];

/// Only `--flag` and `--flag VALUE` are accepted. A bare `--` and the
/// `--flag=value` form are unknown options, checked before clap sees them.
fn reject_unsupported_forms(args: &[OsString]) -> Result<(), LaunchError> {
    let mut tokens = args.iter();
    while let Some(token) = tokens.next() {
        let text = token.to_string_lossy();
        if VALUE_FLAGS.iter().any(|flag| text == *flag) {
            // The value is checked by `flag_value`
            tokens.next();
            continue;
        }
        if text == "--" || (text.starts_with("--") && text.contains('=')) {
            return Err(LaunchError::UnknownOption(text.into_owned()));
        }
    }
    Ok(())
}

fn classify(err: &clap::Error) -> LaunchError {
    let arg = context_string(err, ContextKind::InvalidArg).unwrap_or_default();

    if err.kind() == ErrorKind::UnknownArgument {
        return LaunchError::UnknownOption(arg);
    }

    match context_string(err, ContextKind::InvalidValue) {
        Some(value) if !value.is_empty() => {
            LaunchError::InvalidArgument(format!("invalid value '{value}' for {arg}"))
        }
        _ if !arg.is_empty() => LaunchError::InvalidArgument(format!("{arg} requires a value")),
        _ => LaunchError::InvalidArgument(
            err.kind().as_str().unwrap_or("malformed arguments").to_string(),
        ),
    }
}

fn context_string(err: &clap::Error, kind: ContextKind) -> Option<String> {
    match err.get(kind)? {
        ContextValue::String(value) => Some(value.clone()),
        _ => None,
    }
}

/// Full usage text, printed for unknown options.
pub fn usage_text() -> String {
    Cli::command().render_help().to_string()
}

/// One-line usage synopsis, printed for bad flag values.
pub fn usage_synopsis() -> String {
    Cli::command().render_usage().to_string()
}

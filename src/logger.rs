use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use std::env;
use std::fmt;
use std::io::Write;

const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// Operator-facing output on stdout.
///
/// Stage progress prints as plain lines, warnings and errors carry a marker.
/// With `verbose`, debug lines also name the module they came from. The ODBC
/// layer's own records stay at warn unless `RUST_LOG` asks for more.
pub fn setup_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::new();
    builder
        .filter(None, level)
        .filter_module("odbc_api", LevelFilter::Warn)
        .target(Target::Stdout);

    builder.format(move |buf, record| {
        writeln!(
            buf,
            "{}",
            render(record.level(), record.target(), record.args(), verbose)
        )
    });

    if env::var_os("RUST_LOG").is_some() {
        builder.parse_default_env();
    }

    builder.init();
}

/// One log line as the operator sees it.
fn render(level: Level, target: &str, message: impl fmt::Display, verbose: bool) -> String {
    match level {
        Level::Error => format!("❌ {message}"),
        Level::Warn => format!("⚠️  {message}"),
        Level::Info => message.to_string(),
        Level::Debug | Level::Trace if verbose => {
            let module = target.strip_prefix(CRATE_PREFIX).unwrap_or(target);
            format!("[{module}] {message}")
        }
        Level::Debug | Level::Trace => message.to_string(),
    }
}

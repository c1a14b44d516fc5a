mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::{Command, ConnectArgs};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "nutprims",
    version,
    about = "Network UPS Tools client CLI",
    args_override_self = true
)]
struct Cli {
    #[command(flatten)]
    conn: ConnectArgs,

    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, &cli.conn, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_subcommand() {
        let cli = Cli::try_parse_from([
            "nutprims",
            "set",
            "ups1",
            "ups.delay.shutdown",
            "120",
            "--username",
            "admin",
            "--password",
            "secret",
        ])
        .expect("set args should parse");

        assert!(matches!(cli.command, Command::Set(_)));
        assert_eq!(cli.conn.username.as_deref(), Some("admin"));
    }

    #[test]
    fn connection_flags_are_global() {
        let cli = Cli::try_parse_from([
            "nutprims",
            "show",
            "ups1",
            "--host",
            "nas.local",
            "--port",
            "3494",
            "--timeout",
            "500ms",
        ])
        .expect("show args should parse");

        assert_eq!(cli.conn.host, "nas.local");
        assert_eq!(cli.conn.port, 3494);
        assert_eq!(cli.conn.timeout, "500ms");
    }

    #[test]
    fn get_requires_variable_name() {
        let err = Cli::try_parse_from(["nutprims", "get", "ups1"])
            .expect_err("missing variable should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_info_subcommand() {
        let cli = Cli::try_parse_from(["nutprims", "info", "--format", "json"])
            .expect("info args should parse");
        assert!(matches!(cli.command, Command::Info));
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }
}

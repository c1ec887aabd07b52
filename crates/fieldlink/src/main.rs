mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "fieldlink", version, about = "Command/control CLI for fieldlink radio nodes")]
struct Cli {
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
    let result = cmd::run(cli.command, format);

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
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from([
            "fieldlink",
            "serve",
            "/tmp/node.sock",
            "--settings",
            "/tmp/settings.json",
        ])
        .expect("serve args should parse");

        assert!(matches!(cli.command, Command::Serve(_)));
    }

    #[test]
    fn parses_get_with_multiple_tags() {
        let cli = Cli::try_parse_from(["fieldlink", "get", "/tmp/node.sock", "sf", "freq_hz"])
            .expect("get args should parse");

        match cli.command {
            Command::Get(args) => assert_eq!(args.tags, vec!["sf", "freq_hz"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn get_requires_at_least_one_tag() {
        let err = Cli::try_parse_from(["fieldlink", "get", "/tmp/node.sock"])
            .expect_err("tagless get should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn parses_id_with_and_without_new_value() {
        let cli = Cli::try_parse_from(["fieldlink", "id", "/tmp/node.sock"])
            .expect("read form should parse");
        match cli.command {
            Command::Id(args) => assert!(args.new_id.is_none()),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["fieldlink", "id", "/tmp/node.sock", "N30"])
            .expect("write form should parse");
        match cli.command {
            Command::Id(args) => assert_eq!(args.new_id.as_deref(), Some("N30")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_set_fields_and_timeout() {
        let cli = Cli::try_parse_from([
            "fieldlink",
            "set",
            "/tmp/node.sock",
            "sf=9",
            "alias=ridge",
            "--timeout",
            "500ms",
        ])
        .expect("set args should parse");

        match cli.command {
            Command::Set(args) => {
                assert_eq!(args.fields, vec!["sf=9", "alias=ridge"]);
                assert_eq!(args.timeout, "500ms");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::{Command, Target};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "jr3pci", version, about = "JR3 PCI force/torque card CLI")]
struct Cli {
    #[command(flatten)]
    target: Target,

    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, &cli.target, format);

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
    fn parses_read_with_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "jr3pci",
            "read",
            "0x90",
            "--count",
            "8",
            "--channel",
            "2",
            "--simulate",
        ])
        .expect("read args should parse");

        assert!(matches!(cli.command, Command::Read(_)));
        assert_eq!(cli.target.channel, 2);
        assert!(cli.target.simulate);
    }

    #[test]
    fn device_defaults_to_zero() {
        let cli = Cli::try_parse_from(["jr3pci", "channels"]).expect("channels should parse");
        assert_eq!(cli.target.device, 0);
        assert_eq!(cli.target.channel, 0);
    }

    #[test]
    fn write_requires_value() {
        let err = Cli::try_parse_from(["jr3pci", "write", "0x55"]).expect_err("missing value");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_stream_options() {
        let cli = Cli::try_parse_from([
            "jr3pci",
            "stream",
            "--filter",
            "2",
            "--samples",
            "10",
            "--interval",
            "50ms",
        ])
        .expect("stream args should parse");
        match cli.command {
            Command::Stream(args) => {
                assert_eq!(args.filter, 2);
                assert_eq!(args.samples, Some(10));
                assert_eq!(args.interval, "50ms");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_stream_csv_output() {
        let cli = Cli::try_parse_from(["jr3pci", "stream", "-o", "forces.csv"])
            .expect("stream output should parse");
        match cli.command {
            Command::Stream(args) => {
                assert_eq!(args.output, Some(std::path::PathBuf::from("forces.csv")));
                assert_eq!(args.samples, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

//! # SCPI Command Line Client
//!
//! Talks to SCPI instruments over TCP and writes their bulk replies to a
//! file or stdout.
//!
//! ## Overview
//!
//! Three subcommands cover the common cases:
//!
//! - `csv` — fetch the current waveform record as ASCII CSV
//! - `screen` — capture the instrument display as an image
//! - `raw` — send an arbitrary command; queries echo the instrument's reply
//!
//! Output goes to stdout by default, or to a file with `-f`. Diagnostics use
//! the `log` crate and go to stderr; set `RUST_LOG=debug` to see the
//! exchange.
use std::error::Error;
use std::fs::File;
use std::io::{self, Write};

use clap::Parser;
use env_logger::Env;
use scpi_client::ScpiClient;
use scpi_protocol::{Response, ScreenshotOptions, parse_flag};

#[derive(Parser, Eq, PartialEq, Clone)]
enum Action {
    /// Fetch the current waveform record as ASCII CSV
    Csv,
    /// Capture the instrument display as an image
    Screen {
        /// Either no arguments (defaults to ON,OFF,BMP24) or exactly three:
        /// {color bool} {inverted bool} {format {BMP24|BMP8|PNG|JPEG|TIFF}}
        args: Vec<String>,
    },
    /// Send a raw command; commands containing '?' echo the instrument reply
    Raw {
        /// Command words, joined with single spaces (e.g. :WAVeform:SOURce?)
        #[arg(required = true)]
        command: Vec<String>,
    },
}

#[derive(Parser)]
#[command(about = "SCPI client for TMC instruments", long_about = None)]
struct Args {
    #[arg(
        short = 'H',
        long,
        default_value = "127.0.0.1:5555",
        help = "Instrument address as host:port"
    )]
    host: String,

    #[arg(
        short,
        long,
        default_value = "-",
        help = "Output filename, '-' writes to stdout"
    )]
    file: String,

    #[clap(subcommand)]
    action: Action,
}

/// An action with its user-supplied parameters fully validated.
enum Plan {
    Csv,
    Screen(ScreenshotOptions),
    Raw(String),
}

fn screen_options(args: &[String]) -> Result<ScreenshotOptions, Box<dyn Error>> {
    match args {
        [] => Ok(ScreenshotOptions::default()),
        [color, inverted, format] => Ok(ScreenshotOptions {
            color: parse_flag(color)?,
            inverted: parse_flag(inverted)?,
            format: format.parse()?,
        }),
        _ => Err("expected {color bool} {inverted bool} {format {BMP24|BMP8|PNG|JPEG|TIFF}}".into()),
    }
}

/// Validate all user-supplied parameters before any file or network I/O.
fn resolve(action: Action) -> Result<Plan, Box<dyn Error>> {
    Ok(match action {
        Action::Csv => Plan::Csv,
        Action::Screen { args } => Plan::Screen(screen_options(&args)?),
        Action::Raw { command } => Plan::Raw(command.join(" ")),
    })
}

fn open_sink(path: &str) -> io::Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(File::create(path)?))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // Usage errors exit 1; --help and --version exit 0.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    log::debug!("Parsed arguments: host={}, file={}", args.host, args.file);

    let plan = resolve(args.action)?;
    let mut sink = open_sink(&args.file)?;

    log::info!("Connecting to {}", args.host);
    let mut client = ScpiClient::connect(&args.host)?;

    match plan {
        Plan::Csv => {
            let data = client.waveform_csv()?;
            log::debug!("Received {} byte waveform record", data.len());
            sink.write_all(&data)?;
        }
        Plan::Screen(options) => {
            log::debug!("Requesting screenshot with parameters {}", options);
            let image = client.screenshot(options)?;
            log::debug!("Received {} byte image", image.len());
            sink.write_all(&image)?;
        }
        Plan::Raw(command) => match client.raw(command, &mut sink)? {
            Some(Response::Block { len }) => log::debug!("Copied {} byte block reply", len),
            Some(Response::Line { len }) => log::debug!("Echoed {} byte text reply", len),
            None => log::debug!("Command does not expect a reply"),
        },
    }

    sink.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::screen_options;
    use scpi_protocol::ImageFormat;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn screen_defaults_with_no_args() {
        let options = screen_options(&[]).unwrap();
        assert_eq!(options.to_string(), "ON,OFF,BMP24");
    }

    #[test]
    fn screen_parses_three_args() {
        let options = screen_options(&args(&["true", "false", "png"])).unwrap();
        assert!(options.color);
        assert!(!options.inverted);
        assert_eq!(options.format, ImageFormat::Png);
        assert_eq!(options.to_string(), "ON,OFF,PNG");
    }

    #[test]
    fn screen_rejects_unknown_format() {
        let err = screen_options(&args(&["true", "false", "gif"])).unwrap_err();
        assert!(err.to_string().contains("invalid format"));
    }

    #[test]
    fn screen_rejects_non_boolean_flag() {
        let err = screen_options(&args(&["maybe", "false", "png"])).unwrap_err();
        assert!(err.to_string().contains("invalid flag"));
    }

    #[test]
    fn screen_rejects_wrong_arg_count() {
        assert!(screen_options(&args(&["true"])).is_err());
        assert!(screen_options(&args(&["true", "false"])).is_err());
    }
}

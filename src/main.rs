mod debug_report;

use oscstamp::{Context, Legend, Options, build_verbose_with};
use std::io::{self, IsTerminal, Read, Write};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "OSCSTAMP_LOG";

fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let res = build_verbose_with(&config.library, &Context::default(), &config.options);
    if config.report {
        debug_report::print_run(&res, config.color);
    }

    if let Err(err) = write_output(config.output.as_deref(), &res.document) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

struct CliConfig {
    library: String,
    output: Option<String>,
    options: Options,
    report: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut output: Option<String> = None;
    let mut options = Options::default();
    let mut report = false;
    let mut color = io::stderr().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("oscstamp {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--report" => report = true,
            "--sequential" => options.parallel = false,
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a file".to_string())?;
                set_input(&mut input, value)?;
            }
            "--output" | "-o" => {
                output = Some(args.next().ok_or_else(|| "error: --output expects a file".to_string())?);
            }
            "--legend" => {
                let value = args.next().ok_or_else(|| "error: --legend expects a file".to_string())?;
                options.legend = Legend::with_body(read_file(&value)?);
            }
            "--row-width" => {
                let value = args.next().ok_or_else(|| "error: --row-width expects a value".to_string())?;
                options.row_width = parse_cells("--row-width", &value)?;
            }
            "--column-height" => {
                let value = args.next().ok_or_else(|| "error: --column-height expects a value".to_string())?;
                options.column_height = parse_cells("--column-height", &value)?;
            }
            "--" => {
                if let Some(value) = args.next() {
                    set_input(&mut input, value)?;
                }
                break;
            }
            _ if arg.starts_with("--input=") => set_input(&mut input, arg.trim_start_matches("--input=").to_string())?,
            _ if arg.starts_with("--output=") => output = Some(arg.trim_start_matches("--output=").to_string()),
            _ if arg.starts_with("--row-width=") => {
                options.row_width = parse_cells("--row-width", arg.trim_start_matches("--row-width="))?;
            }
            _ if arg.starts_with("--column-height=") => {
                options.column_height = parse_cells("--column-height", arg.trim_start_matches("--column-height="))?;
            }
            _ if arg.starts_with('-') && arg != "-" => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => set_input(&mut input, arg)?,
        }
    }

    if let Some(extra) = args.next() {
        return Err(format!("error: unexpected argument '{extra}'"));
    }

    let library = match input.as_deref() {
        Some("-") | None => read_stdin_input()?,
        Some(path) => read_file(path)?,
    };

    if library.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { library, output, options, report, color })
}

fn set_input(input: &mut Option<String>, value: String) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *input = Some(value);
    Ok(())
}

fn parse_cells(flag: &str, value: &str) -> Result<i64, String> {
    match value.parse::<i64>() {
        Ok(cells) if cells > 0 => Ok(cells),
        _ => Err(format!("error: invalid {flag} '{value}' (expected a positive number of cells)")),
    }
}

fn read_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|err| format!("error: failed to read '{path}': {err}"))
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn write_output(path: Option<&str>, document: &str) -> Result<(), String> {
    match path {
        Some(path) => {
            std::fs::write(path, document).map_err(|err| format!("error: failed to write '{path}': {err}"))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(document.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|err| format!("error: failed to write stdout: {err}"))
        }
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    let defaults = Options::default();
    format!(
        "oscstamp {version}

Builds an oscillator stamp collection from a library of B3/S23 patterns.

Usage:
  oscstamp [OPTIONS] [--] [FILE]
  oscstamp [OPTIONS] --input <FILE>

Reads the library from FILE, or stdin when FILE is omitted or '-'.
Patterns are separated by blank lines.

Options:
  -i, --input <file>         Pattern library to read.
  -o, --output <file>        Write the catalog here instead of stdout.
  --legend <file>            Replace the legend text with the file's content.
  --row-width <cells>        Row width right of the period labels.
                             Default: {row_width}
  --column-height <cells>    Column height. Default: {column_height}
  --sequential               Classify patterns on one thread.
  --report                   Print a run report on stderr.
  --color                    Force ANSI color in the report.
  --no-color                 Disable ANSI color in the report.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}=<filter>     Log filter (tracing syntax). Default: warn

Exit codes:
  0  Success.
  1  Could not write the output.
  2  Invalid arguments or unreadable input.
",
        version = env!("CARGO_PKG_VERSION"),
        row_width = defaults.row_width,
        column_height = defaults.column_height,
        log_env = LOG_ENV,
    )
}

//! Jotcalc - free-form calculator notes from the command line

mod config;
mod report;

use anyhow::{Context as _, bail};
use jotcalc_core::Board;
use jotcalc_engine::timezone::LocalZone;
use jotcalc_engine::{Context, calculate};
use std::env;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug, warn};

fn print_usage() {
    eprintln!("Usage: jotcalc [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Board file to evaluate (.jot)");
    eprintln!();
    eprintln!("Without -c or FILE the note is read from standard input.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <TEXT>      Evaluate TEXT as a note and print the result");
    eprintln!("  -o, --output <FILE>       Export to markdown file");
    eprintln!("  --tz <ZONE>               Local time zone (abbreviation or IANA name)");
    eprintln!("  --config <FILE>           Read settings from FILE");
    eprintln!("  --no-config               Ignore the config file");
    eprintln!("  -v, --verbose             Log debug output to stderr");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default)]
struct Options {
    file_path: Option<PathBuf>,
    command: Option<String>,
    output_file: Option<PathBuf>,
    tz: Option<String>,
    config_file: Option<PathBuf>,
    no_config: bool,
    verbose: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let mut opts = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a value");
                    return ExitCode::FAILURE;
                }
                opts.command = Some(args[i].to_string());
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a file path");
                    return ExitCode::FAILURE;
                }
                opts.output_file = Some(PathBuf::from(&args[i]));
            }
            "--tz" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --tz requires a value");
                    return ExitCode::FAILURE;
                }
                opts.tz = Some(args[i].to_string());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    return ExitCode::FAILURE;
                }
                opts.config_file = Some(PathBuf::from(&args[i]));
            }
            "--no-config" => opts.no_config = true,
            "-v" | "--verbose" => opts.verbose = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                return ExitCode::FAILURE;
            }
            _ => {
                if opts.file_path.is_none() {
                    opts.file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    return ExitCode::FAILURE;
                }
            }
        }
        i += 1;
    }

    tracing_subscriber::fmt()
        .with_max_level(if opts.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    match run(opts) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Build the calculation context. The zone comes from `--tz`, then the
/// config file, then the environment.
fn build_context(opts: &Options) -> anyhow::Result<Context> {
    let config = if opts.no_config {
        config::Config::default()
    } else {
        let (config, warnings) = config::load_config(opts.config_file.as_deref());
        for warning in warnings {
            warn!("{}", warning);
        }
        config
    };

    let local_zone = match opts.tz.as_deref() {
        Some(tz) => match LocalZone::parse(tz) {
            Some(zone) => zone,
            None => bail!("Unknown time zone: {}", tz),
        },
        None => config.local_zone.unwrap_or_else(LocalZone::from_env),
    };
    debug!(?local_zone, locale = ?config.locale, "context");

    Ok(Context::system()
        .with_locale(config.locale)
        .with_zone(local_zone))
}

fn run(opts: Options) -> anyhow::Result<ExitCode> {
    if opts.command.is_some() && opts.file_path.is_some() {
        bail!("--command cannot be combined with a board FILE");
    }
    let ctx = build_context(&opts)?;

    if let Some(path) = opts.file_path.clone() {
        if !path.exists() {
            bail!("No such board file: {}", path.display());
        }
        let board = Board::with_file(Some(path.clone()), &ctx)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        return finish_board(&board, &opts);
    }

    let text = match opts.command.clone() {
        Some(text) => text,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read standard input")?;
            text
        }
    };

    if opts.output_file.is_some() {
        let mut board = Board::new();
        board.add_note(0, 0, &text, &ctx);
        return finish_board(&board, &opts);
    }

    let Some(result) = calculate(&text, &ctx) else {
        eprintln!("Nothing to calculate");
        return Ok(ExitCode::FAILURE);
    };
    println!("{}", report::render_result(&result));
    Ok(if result.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Export or print a loaded board.
fn finish_board(board: &Board, opts: &Options) -> anyhow::Result<ExitCode> {
    if let Some(output_path) = &opts.output_file {
        board
            .export_markdown(output_path)
            .with_context(|| format!("Failed to export {}", output_path.display()))?;
        println!("Exported to {}", output_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    if !board.is_empty() {
        println!("{}", report::render_board(board));
    }
    let failed = board
        .notes()
        .any(|note| note.result.as_ref().is_some_and(|r| r.is_error()));
    debug!(notes = board.len(), failed, "board evaluated");
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

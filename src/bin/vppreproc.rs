use clap::Parser;
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use verinet::core::lang::{self, LanguageStandard};
use verinet::core::preproc::Preproc;
use verinet::error::{EXIT_IO, EXIT_OK, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "vppreproc")]
#[command(about = "Preprocess Verilog/SystemVerilog sources")]
#[command(version)]
struct Cli {
    /// Define a macro before processing (repeatable)
    #[arg(short = 'D', value_name = "NAME[=VALUE]")]
    defines: Vec<String>,

    /// Undefine a macro (repeatable)
    #[arg(short = 'U', value_name = "NAME")]
    undefines: Vec<String>,

    /// Add an include search path (repeatable)
    #[arg(short = 'I', value_name = "PATH")]
    include_paths: Vec<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Emit only the final macro table as `define lines
    #[arg(long)]
    defines_only: bool,

    /// Language standard (1364-1995 .. 1800-2023, vams)
    #[arg(long, value_name = "STD")]
    standard: Option<String>,

    /// Input files, processed in order
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    ExitCode::from(run() as u8)
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap renders its own message; keep the documented usage code
            let _ = e.print();
            return match e.use_stderr() {
                true => EXIT_USAGE,
                false => EXIT_OK,
            };
        }
    };

    let standard = match &cli.standard {
        Some(s) => match s.parse::<LanguageStandard>() {
            Ok(std) => std,
            Err(e) => {
                eprintln!("{}: {}", "error".red().bold(), e);
                return EXIT_USAGE;
            }
        },
        None => lang::language_standard(),
    };

    let mut preproc = Preproc::new(standard)
        .with_defines(cli.defines.iter().map(|d| split_define(d)).collect())
        .with_include_paths(gather_include_paths(cli.include_paths.clone()));
    for name in &cli.undefines {
        preproc.undefine(name);
    }

    let mut text = String::new();
    for file in &cli.files {
        match preproc.preprocess_file(&file.to_string_lossy()) {
            Ok(t) => {
                text.push_str(&t);
                if text.ends_with('\n') == false {
                    text.push('\n');
                }
            }
            Err(e) => {
                eprintln!("{}: {}", "error".red().bold(), e);
                return verinet::error::Error::from(e).exit_code();
            }
        }
    }
    for d in preproc.take_diagnostics() {
        eprintln!("{}", d.render());
    }

    if cli.defines_only == true {
        text = preproc
            .defines()
            .iter()
            .map(|d| d.to_define_line())
            .collect::<Vec<String>>()
            .join("\n");
        text.push('\n');
    }

    match &cli.output {
        Some(path) => match fs::File::create(path).and_then(|mut f| f.write_all(text.as_bytes()))
        {
            Ok(_) => EXIT_OK,
            Err(e) => {
                eprintln!("{}: failed to write {:?}: {}", "error".red().bold(), path, e);
                EXIT_IO
            }
        },
        None => match std::io::stdout().write_all(text.as_bytes()) {
            Ok(_) => EXIT_OK,
            Err(e) => {
                eprintln!("{}: {}", "error".red().bold(), e);
                EXIT_IO
            }
        },
    }
}

/// Splits `NAME` or `NAME=VALUE`; a bare name defines to `1`.
fn split_define(arg: &str) -> (String, String) {
    match arg.split_once('=') {
        Some((name, value)) => (name.to_string(), value.to_string()),
        None => (arg.to_string(), String::from("1")),
    }
}

/// Command-line include paths, then any from `VERILOG_INCLUDE`.
fn gather_include_paths(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if let Ok(extra) = std::env::var("VERILOG_INCLUDE") {
        paths.extend(
            extra
                .split(':')
                .filter(|p| p.is_empty() == false)
                .map(PathBuf::from),
        );
    }
    paths
}

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use chest_inspect::{run, CommandKind, CommonOptions};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(error = %message, "inspect_failed");
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run_cli() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        return Err(usage_text());
    }
    if args[0] == "-h" || args[0] == "--help" {
        print_usage();
        return Ok(());
    }

    let mut options = CommonOptions::default();
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "--root" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --root".to_string())?;
                options.root = Some(PathBuf::from(value));
                index += 2;
            }
            "--ext" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --ext".to_string())?;
                options.extension = Some(value.clone());
                index += 2;
            }
            _ => break,
        }
    }

    let command = args
        .get(index)
        .ok_or_else(|| "missing subcommand".to_string())?
        .as_str();
    let command_args = &args[(index + 1)..];

    let kind = match command {
        "list" => {
            if !command_args.is_empty() {
                return Err("list takes no arguments".to_string());
            }
            CommandKind::List
        }
        "show" => match command_args {
            [key] => CommandKind::Show { key: key.clone() },
            _ => return Err("show requires exactly one location key (world,x,y,z)".to_string()),
        },
        other => return Err(format!("unknown subcommand '{other}'")),
    };

    run(kind, options, &mut io::stdout())
}

fn print_usage() {
    println!("{}", usage_text());
}

fn usage_text() -> String {
    [
        "chest_inspect - list and print stored container records",
        "",
        "Usage:",
        "  chest_inspect [--root <dir>] [--ext <ext>] list",
        "  chest_inspect [--root <dir>] [--ext <ext>] show <world,x,y,z>",
        "",
        "Defaults:",
        "  --root $CHEST_RESTOCK_DATA_DIR, else ./chests",
        "  --ext json",
    ]
    .join("\n")
}

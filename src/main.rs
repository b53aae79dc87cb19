//! Trackline - roster autofill pipeline.

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use trackline::config::{Credentials, StudentFolder};
use trackline::pipeline;

fn print_usage() {
    eprintln!("Usage: trackline [OPTIONS] <COMMAND>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  update                    Run the full roster update");
    eprintln!("  reconcile <FOLDER>        Reconcile one scan folder's cache");
    eprintln!("                            (photo-id | completion-certificate | osha30-card)");
    eprintln!("  show                      Print the roster grid");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>       Config file (default: the user config dir)");
    eprintln!("  -h, --help                Print help");
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut command: Option<String> = None;
    let mut folder_arg: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_path = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if command.is_none() {
                    command = Some(args[i].to_string());
                } else if folder_arg.is_none() {
                    folder_arg = Some(args[i].to_string());
                } else {
                    eprintln!("Error: Too many arguments");
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    let Some(command) = command else {
        print_usage();
        std::process::exit(1);
    };

    let creds = Credentials::load(config_path.as_deref()).context("loading config")?;

    match command.as_str() {
        "update" => pipeline::run_update(&creds).context("running update")?,
        "reconcile" => {
            let Some(folder) = folder_arg.as_deref().and_then(StudentFolder::parse) else {
                eprintln!("Error: reconcile needs a folder name");
                print_usage();
                std::process::exit(1);
            };
            pipeline::run_reconcile(&creds, folder).context("reconciling cache")?;
        }
        "show" => pipeline::run_show(&creds).context("printing roster")?,
        other => {
            eprintln!("Error: Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}

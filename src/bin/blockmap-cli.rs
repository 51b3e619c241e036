//! blockmap command-line driver
//!
//! Reads a command count N from stdin followed by N commands
//! (`insert <key> <value>`, `delete <key> <value>`, `find <key>`) and
//! writes one result line per `find` to stdout.

use blockmap::{command, Engine, Result, StoreConfig, StoreError};
use std::env;
use std::io::{self, BufWriter};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DATA_FILE: &str = "data.bin";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut data_file = PathBuf::from(DEFAULT_DATA_FILE);
    let mut config = StoreConfig::default();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("blockmap v{}", VERSION);
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" => {
                let path = args.next().ok_or_else(|| {
                    StoreError::Config("--config requires a file path".into())
                })?;
                config = StoreConfig::from_file(path)?;
            }
            path if !path.starts_with('-') => {
                data_file = PathBuf::from(path);
            }
            other => {
                return Err(StoreError::Config(format!("unknown option: {}", other)));
            }
        }
    }

    let engine = Engine::open(&data_file, config)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    command::run(&engine, stdin.lock(), &mut out)
}

fn print_help() {
    println!(
        r#"blockmap v{} - persistent block-organized multimap

Usage:
  blockmap-cli [data-file] [--config <file.json>]

Reads from stdin: a command count N, then N commands:
  insert <key> <value>   add (key, value); duplicate pairs are ignored
  delete <key> <value>   remove (key, value) if present
  find <key>             print the key's values ascending, or 'null'

Options:
  --config <file.json>   block capacity / rebuild threshold overrides
  --version, -v          show version
  --help, -h             show this help

The data file defaults to ./{} and is created on first insert."#,
        VERSION, DEFAULT_DATA_FILE
    );
}

//! flowgraph-layout CLI
//!
//! Usage:
//!   flowgraph-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>         Layout configuration (TOML format)
//!       --no-displacement       Keep the entry node on its row
//!   -h, --help                  Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use flowgraph_layout::{layout_to_toml, LayoutConfig};

#[derive(Parser)]
#[command(name = "flowgraph-layout")]
#[command(about = "Lay out a flow graph document and print the geometry as TOML")]
struct Cli {
    /// Graph document (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Layout configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep the entry node on its row
    #[arg(long)]
    no_displacement: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.input.is_none() && io::stdin().is_terminal() {
        eprintln!("Reading graph document from stdin (pass a FILE or --help for usage)");
    }

    let mut config = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };
    if cli.no_displacement {
        config.disable_vertical_displacement = true;
    }

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    match layout_to_toml(&source, &config) {
        Ok(report) => print!("{}", report),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

//! `docfield` binary: reads JSON documents and applies field writes to them.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use docfield::cli::args::*;
use docfield::cli::commands::*;

fn main() {
    let args = DocfieldArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // -q
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug, // -vvv and up, shows overwritten keys and deletes
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

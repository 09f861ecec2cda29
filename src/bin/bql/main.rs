mod args;
mod commands;

use crate::args::Command;
use args::Args;
use clap::Parser;
use colored::Colorize;
use std::process::exit;
use vysta_bql::config::{self, Config};

fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(error) = run(args) {
        eprintln!("{intro}: {error}", intro = "error".bold().red());
        exit(1);
    }
}

fn run(args: Args) -> Result<(), vysta_bql::Error> {
    let config = read_config(&args)?;

    match args.command {
        Command::Render { format, file } => commands::render(&config, format, file),
        Command::Conditions { mode, file } => commands::conditions(&config, mode, file),
        Command::ParseRef { text, column } => commands::parse_ref(&text, column),
        Command::Escape { text, always } => {
            commands::escape(&text, always);
            Ok(())
        }
        Command::Unescape { text } => {
            commands::unescape(&text);
            Ok(())
        }
        Command::Operators { data_type } => {
            commands::operators(&data_type);
            Ok(())
        }
    }
}

fn read_config(args: &Args) -> Result<Config, vysta_bql::Error> {
    match &args.config {
        Some(path) => config::read_from(path),
        None => config::read(),
    }
}

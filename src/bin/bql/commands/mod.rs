use crate::args::Mode;
use colored::Colorize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use vysta_bql::condition::{
    comparison_operators_by_data_type, filter_empty_groups, render_conditions, Condition, DataType,
};
use vysta_bql::config::Config;
use vysta_bql::identifiers::{
    escape_identifier, escape_identifier_if_required, un_escape_identifier,
};
use vysta_bql::refs::{un_escape_ref, ColumnRef};
use vysta_bql::statement::SelectStatement;
use vysta_bql::{render_statement, Error};

pub fn render(config: &Config, format: bool, file: Option<PathBuf>) -> Result<(), Error> {
    let statement: SelectStatement = read_json(file)?;

    let mut options = config.writer_options();
    options.format |= format;

    println!("{}", render_statement(&statement, options)?);

    Ok(())
}

pub fn conditions(config: &Config, mode: Option<Mode>, file: Option<PathBuf>) -> Result<(), Error> {
    let conditions: Vec<Condition> = read_json(file)?;
    let mode = mode.map_or(config.condition_mode, Into::into);

    match render_conditions(&filter_empty_groups(&conditions), mode) {
        Some(text) => println!("{text}"),
        None => eprintln!("{}", "nothing to render".dimmed()),
    }

    Ok(())
}

pub fn parse_ref(text: &str, column: bool) -> Result<(), Error> {
    let json = if column {
        serde_json::to_string_pretty(&ColumnRef::un_escape(text)?)?
    } else {
        serde_json::to_string_pretty(&un_escape_ref(text)?)?
    };

    println!("{json}");

    Ok(())
}

pub fn escape(text: &str, always: bool) {
    if always {
        println!("{}", escape_identifier(text));
    } else {
        println!("{}", escape_identifier_if_required(text));
    }
}

pub fn unescape(text: &str) {
    println!("{}", un_escape_identifier(text));
}

pub fn operators(data_type: &str) {
    let data_type = DataType::from_name(data_type);

    println!("{} ({:?}):", data_type.to_string().bold(), data_type.category());
    for operator in comparison_operators_by_data_type(data_type) {
        println!("  {:<20} {operator}", operator.name());
    }
}

/// Reads JSON from `file`, or from stdin without one.
fn read_json<T: DeserializeOwned>(file: Option<PathBuf>) -> Result<T, Error> {
    let input = match file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            input
        }
    };

    Ok(serde_json::from_str(&input)?)
}

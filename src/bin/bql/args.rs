use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vysta_bql::condition::ConditionMode;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Config file to use instead of ~/.config/vysta-bql/config.json
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Writes a JSON select statement as BQL.
    ///
    /// The statement is read from FILE, or from stdin when no file is given.
    Render {
        /// One clause per line
        #[arg(short, long)]
        format: bool,
        file: Option<PathBuf>,
    },
    /// Renders a JSON condition tree as BQL condition text.
    ///
    /// Empty groups are pruned before rendering.
    Conditions {
        /// How the right hand side of conditions is read
        #[arg(short, long, value_enum)]
        mode: Option<Mode>,
        file: Option<PathBuf>,
    },
    /// Parses a possibly escaped reference like `sales."order lines"` and prints it as JSON.
    ParseRef {
        text: String,
        /// The last segment is a column name
        #[arg(long)]
        column: bool,
    },
    /// Escapes an identifier.
    Escape {
        text: String,
        /// Quote the identifier even when it does not need it
        #[arg(long)]
        always: bool,
    },
    /// Removes the quotes around an escaped identifier.
    Unescape { text: String },
    /// Lists the comparison operators allowed for a data type, e.g. `varchar` or `int`.
    Operators { data_type: String },
}

#[derive(Debug, ValueEnum, Clone, Copy)]
pub enum Mode {
    Values,
    Expressions,
}

impl From<Mode> for ConditionMode {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Values => Self::Values,
            Mode::Expressions => Self::Expressions,
        }
    }
}

//! Condition trees and the BQL writer used by Vysta filters.
//!
//! - [condition]: the filter tree, its operations, validity rules and rendering
//! - [statement] and [writer]: SELECT statements and how they are written as BQL
//! - [refs] and [identifiers]: escaping and parsing of (multi-segment) names
//! - [fields]: filter fields and the loaders providing their values

pub mod condition;
pub mod config;
mod error;
pub mod fields;
pub mod identifiers;
pub mod refs;
pub mod statement;
pub mod writer;

pub use error::{Error, ErrorKind, InternalError};
pub use writer::{render_statement, WriterOptions};

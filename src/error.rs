use crate::fields::FieldError;
use crate::refs::RefParseError;
use crate::writer::WriterError;
use std::env::VarError;
use std::fmt::{Display, Formatter};
use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl<E> From<E> for Error
where
    ErrorKind: From<E>,
{
    fn from(value: E) -> Self {
        Error(Box::new(value.into()))
    }
}

#[derive(Debug, Error)]
#[allow(clippy::enum_variant_names)]
pub enum ErrorKind {
    /// Errors originating from the Pest library
    #[error("Invalid syntax, failed to parse:\n{0}")]
    SyntaxError(#[from] PestError),
    #[error("Unsupported reference:\n{0}")]
    RefParseError(#[from] RefParseError),
    #[error("Could not write BQL:\n{0}")]
    WriterError(#[from] WriterError),
    #[error("Invalid filter field:\n{0}")]
    FieldError(#[from] FieldError),
    #[error("Internal error:\n{0}")]
    InternalError(#[from] InternalError),
    #[error("Could not find environment variable: \n{0}")]
    EnvVarError(#[from] VarError),
    #[error("IO error:\n{0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error:\n{0}")]
    JsonError(#[from] serde_json::Error),
}

pub type PestError = pest::error::Error<crate::refs::Rule>;

#[derive(Error, Debug)]
pub struct InternalError(pub String);

impl Display for InternalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    pub fn into_inner(self) -> ErrorKind {
        *self.0
    }
}

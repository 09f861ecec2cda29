//! Object and column references.
//!
//! A reference is a dotted path to something in the data service:
//! ```text
//! server.database.schema.object.column
//! ```
//! Any prefix can be missing. Each segment is escaped on its own, so `"my schema".orders` is a
//! two segment reference.
mod parsing;

pub use parsing::Rule;

use crate::identifiers::{escape_identifier, escape_identifier_if_required};
use log::error;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefParseError {
    #[error("`{reference}` has {segments} segments, only `object` and `schema.object` are supported")]
    TooManySegments { reference: String, segments: usize },
    #[error("`{0}` does not name a column")]
    MissingColumn(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    /// Informational only, never rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    #[serde(flatten)]
    pub object: ObjectRef,
    pub column_name: String,
}

/// Anything that renders as a dotted reference.
pub trait Reference {
    fn object_ref(&self) -> &ObjectRef;

    fn column_name(&self) -> Option<&str> {
        None
    }

    /// Plain text, nothing escaped.
    fn format_ref(&self) -> String {
        render_segments(self, str::to_owned)
    }

    /// Segments that need quoting are escaped, the others are left as they are.
    ///
    /// This is the canonical form used for equality.
    fn escape_ref_if_required(&self) -> String {
        render_segments(self, escape_identifier_if_required)
    }

    /// Every segment is quoted.
    fn escape_ref(&self) -> String {
        render_segments(self, escape_identifier)
    }
}

fn render_segments<R, F>(reference: &R, escape: F) -> String
where
    R: Reference + ?Sized,
    F: Fn(&str) -> String,
{
    let mut text = reference
        .object_ref()
        .segments()
        .map(&escape)
        .collect::<Vec<_>>()
        .join(".");

    if let Some(column) = reference.column_name() {
        // a bare column has no leading dot
        if !text.is_empty() {
            text.push('.');
        }

        text.push_str(&escape(column));
    }

    text
}

impl ObjectRef {
    pub fn named<T: Into<String>>(object_name: T) -> Self {
        ObjectRef {
            object_name: Some(object_name.into()),
            ..Default::default()
        }
    }

    pub fn in_schema<S, T>(schema_name: S, object_name: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        ObjectRef {
            schema_name: Some(schema_name.into()),
            object_name: Some(object_name.into()),
            ..Default::default()
        }
    }

    /// Present, non-empty segments from the server down to the object.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        [
            &self.server_name,
            &self.database_name,
            &self.schema_name,
            &self.object_name,
        ]
        .into_iter()
        .filter_map(|segment| segment.as_deref())
        .filter(|segment| !segment.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.segments().next().is_none()
    }
}

impl ColumnRef {
    pub fn new<T: Into<String>>(object: ObjectRef, column_name: T) -> Self {
        ColumnRef {
            object,
            column_name: column_name.into(),
        }
    }

    /// Parses `column`, `object.column` or `schema.object.column`.
    pub fn un_escape(text: &str) -> Result<ColumnRef, crate::Error> {
        let mut segments = parsing::parse_segments(text)?;

        let Some(column_name) = segments.pop() else {
            error!("Cannot parse column reference {text:?}: no column segment");
            return Err(RefParseError::MissingColumn(text.to_owned()).into());
        };

        let object = object_ref_from_segments(text, segments)?;

        Ok(ColumnRef::new(object, column_name))
    }
}

/// Parses `object` or `schema.object`, quoted segments included.
///
/// Longer paths are not supported and fail after being logged.
pub fn un_escape_ref(text: &str) -> Result<ObjectRef, crate::Error> {
    let segments = parsing::parse_segments(text)?;

    object_ref_from_segments(text, segments)
}

fn object_ref_from_segments(
    text: &str,
    mut segments: Vec<String>,
) -> Result<ObjectRef, crate::Error> {
    match segments.len() {
        0 => Ok(ObjectRef::default()),
        1 => Ok(ObjectRef {
            object_name: segments.pop(),
            ..Default::default()
        }),
        2 => {
            let object_name = segments.pop();
            let schema_name = segments.pop();

            Ok(ObjectRef {
                schema_name,
                object_name,
                ..Default::default()
            })
        }
        count => {
            error!("Cannot parse reference {text:?}: {count} segments");

            Err(RefParseError::TooManySegments {
                reference: text.to_owned(),
                segments: count,
            }
            .into())
        }
    }
}

impl Reference for ObjectRef {
    fn object_ref(&self) -> &ObjectRef {
        self
    }
}

impl Reference for ColumnRef {
    fn object_ref(&self) -> &ObjectRef {
        &self.object
    }

    fn column_name(&self) -> Option<&str> {
        Some(self.column_name.as_str())
    }
}

// Equality goes through the escaped text, case-sensitively, for both kinds of reference.

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.escape_ref_if_required() == other.escape_ref_if_required()
    }
}

impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.escape_ref_if_required().hash(state)
    }
}

impl PartialEq for ColumnRef {
    fn eq(&self, other: &Self) -> bool {
        self.escape_ref_if_required() == other.escape_ref_if_required()
    }
}

impl Eq for ColumnRef {}

impl Hash for ColumnRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.escape_ref_if_required().hash(state)
    }
}

impl Display for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.escape_ref_if_required())
    }
}

impl Display for ColumnRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.escape_ref_if_required())
    }
}

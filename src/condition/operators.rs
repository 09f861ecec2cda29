//! Which comparison operators make sense for which data types.
//!
//! Used to prune the operator choices offered for a field before they ever reach the UI.
use crate::condition::ComparisonOperator;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use ComparisonOperator::*;

const BOOLEAN_OPERATORS: &[ComparisonOperator] = &[Equal, NotEqual, IsNull, IsNotNull];

const UUID_OPERATORS: &[ComparisonOperator] = &[Equal, NotEqual, IsNull, IsNotNull, In, NotIn];

const ORDERED_OPERATORS: &[ComparisonOperator] = &[
    Equal,
    GreaterThan,
    LessThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    NotEqual,
    IsNull,
    IsNotNull,
    In,
    NotIn,
    Between,
    NotBetween,
];

const CHARACTER_OPERATORS: &[ComparisonOperator] =
    &[Equal, NotEqual, IsNull, IsNotNull, In, NotIn, Like, NotLike];

/// Column data types as reported by the data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    Boolean,
    Bit,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Decimal,
    Numeric,
    Money,
    Float,
    Real,
    Date,
    Time,
    DateTime,
    DateTimeOffset,
    Timestamp,
    Uuid,
    Char,
    VarChar,
    NChar,
    NVarChar,
    Text,
    Json,
    Xml,
    Binary,
    VarBinary,
    /// Anything we don't recognize is treated like text.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataTypeCategory {
    Boolean,
    Bit,
    Numeric,
    DateTime,
    Uuid,
    Character,
}

static DATA_TYPE_NAMES: Lazy<HashMap<&'static str, DataType>> = Lazy::new(|| {
    HashMap::from([
        ("boolean", DataType::Boolean),
        ("bool", DataType::Boolean),
        ("bit", DataType::Bit),
        ("tinyint", DataType::TinyInt),
        ("smallint", DataType::SmallInt),
        ("int", DataType::Int),
        ("integer", DataType::Int),
        ("bigint", DataType::BigInt),
        ("decimal", DataType::Decimal),
        ("numeric", DataType::Numeric),
        ("number", DataType::Numeric),
        ("money", DataType::Money),
        ("float", DataType::Float),
        ("double", DataType::Float),
        ("real", DataType::Real),
        ("date", DataType::Date),
        ("time", DataType::Time),
        ("datetime", DataType::DateTime),
        ("datetime2", DataType::DateTime),
        ("datetimeoffset", DataType::DateTimeOffset),
        ("timestamp", DataType::Timestamp),
        ("uuid", DataType::Uuid),
        ("guid", DataType::Uuid),
        ("uniqueidentifier", DataType::Uuid),
        ("char", DataType::Char),
        ("varchar", DataType::VarChar),
        ("nchar", DataType::NChar),
        ("nvarchar", DataType::NVarChar),
        ("text", DataType::Text),
        ("string", DataType::Text),
        ("json", DataType::Json),
        ("xml", DataType::Xml),
        ("binary", DataType::Binary),
        ("varbinary", DataType::VarBinary),
    ])
});

pub fn comparison_operators_by_data_type(data_type: DataType) -> &'static [ComparisonOperator] {
    comparison_operators_by_category(data_type.category())
}

pub fn comparison_operators_by_category(
    category: DataTypeCategory,
) -> &'static [ComparisonOperator] {
    match category {
        DataTypeCategory::Boolean => BOOLEAN_OPERATORS,
        DataTypeCategory::Uuid => UUID_OPERATORS,
        DataTypeCategory::Numeric | DataTypeCategory::DateTime | DataTypeCategory::Bit => {
            ORDERED_OPERATORS
        }
        DataTypeCategory::Character => CHARACTER_OPERATORS,
    }
}

impl DataType {
    /// Case-insensitive, knows the usual aliases (`integer`, `guid`, ...). Never fails.
    pub fn from_name(name: &str) -> DataType {
        DATA_TYPE_NAMES
            .get(name.trim().to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(DataType::Other)
    }

    pub fn category(self) -> DataTypeCategory {
        match self {
            DataType::Boolean => DataTypeCategory::Boolean,
            DataType::Bit => DataTypeCategory::Bit,
            DataType::TinyInt
            | DataType::SmallInt
            | DataType::Int
            | DataType::BigInt
            | DataType::Decimal
            | DataType::Numeric
            | DataType::Money
            | DataType::Float
            | DataType::Real => DataTypeCategory::Numeric,
            DataType::Date
            | DataType::Time
            | DataType::DateTime
            | DataType::DateTimeOffset
            | DataType::Timestamp => DataTypeCategory::DateTime,
            DataType::Uuid => DataTypeCategory::Uuid,
            // json, xml and binary columns are filtered like text
            DataType::Char
            | DataType::VarChar
            | DataType::NChar
            | DataType::NVarChar
            | DataType::Text
            | DataType::Json
            | DataType::Xml
            | DataType::Binary
            | DataType::VarBinary
            | DataType::Other => DataTypeCategory::Character,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Bit => "Bit",
            DataType::TinyInt => "TinyInt",
            DataType::SmallInt => "SmallInt",
            DataType::Int => "Int",
            DataType::BigInt => "BigInt",
            DataType::Decimal => "Decimal",
            DataType::Numeric => "Numeric",
            DataType::Money => "Money",
            DataType::Float => "Float",
            DataType::Real => "Real",
            DataType::Date => "Date",
            DataType::Time => "Time",
            DataType::DateTime => "DateTime",
            DataType::DateTimeOffset => "DateTimeOffset",
            DataType::Timestamp => "Timestamp",
            DataType::Uuid => "Uuid",
            DataType::Char => "Char",
            DataType::VarChar => "VarChar",
            DataType::NChar => "NChar",
            DataType::NVarChar => "NVarChar",
            DataType::Text => "Text",
            DataType::Json => "Json",
            DataType::Xml => "Xml",
            DataType::Binary => "Binary",
            DataType::VarBinary => "VarBinary",
            DataType::Other => "Other",
        }
    }
}

impl From<String> for DataType {
    fn from(name: String) -> Self {
        DataType::from_name(&name)
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        data_type.name().to_owned()
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

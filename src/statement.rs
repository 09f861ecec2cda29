//! The SELECT statement object model consumed by the [crate::writer::BqlWriter].
//!
//! These are plain records, built fresh for every query. A statement can nest another one as a
//! sub-query source.
use crate::condition::Condition;
use crate::refs::ObjectRef;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectStatement {
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub items: Vec<SelectStatementItem>,
    #[serde(default)]
    pub sources: Vec<TableSource>,
    /// Pre-rendered condition text. Takes precedence over `where_conditions`.
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub where_conditions: Vec<Condition>,
    /// Pre-rendered condition text. Takes precedence over `having_conditions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub having: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub having_conditions: Vec<Condition>,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_set: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectStatementItem {
    #[serde(default)]
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<GroupBy>,
    /// Whether the consumer shows the column. Does not change the rendered BQL.
    #[serde(default = "shown")]
    pub output: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSource {
    /// Serialized as either an `"object"` or a `"subQuery"` key.
    #[serde(flatten)]
    pub source: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub joins: Vec<Join>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    Object(ObjectRef),
    SubQuery(Box<SelectStatement>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Join {
    pub join_type: JoinType,
    /// The source to join to.
    pub source: Box<TableSource>,
    /// Pre-rendered ON condition. Takes precedence over `search_conditions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    #[serde(default)]
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
}

/// How a select item takes part in aggregation.
///
/// Markers we don't know about are kept as [GroupBy::Unsupported] so the writer can refuse them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupBy {
    /// Plain grouping key, listed in GROUP BY.
    GroupBy,
    Sum,
    Count,
    Min,
    Max,
    Avg,
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JoinType {
    Cross,
    Inner,
    LeftOuter,
    FullOuter,
    RightOuter,
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC", alias = "Ascending", alias = "asc")]
    Ascending,
    #[serde(rename = "DESC", alias = "Descending", alias = "desc")]
    Descending,
}

fn shown() -> bool {
    true
}

impl SelectStatement {
    /// `SELECT * FROM <object>`
    pub fn from_object(object: ObjectRef) -> Self {
        SelectStatement {
            sources: vec![TableSource::object(object)],
            ..Default::default()
        }
    }
}

impl SelectStatementItem {
    pub fn new<T: Into<String>>(expression: T) -> Self {
        SelectStatementItem {
            expression: expression.into(),
            alias: None,
            group_by: None,
            output: true,
        }
    }

    pub fn grouped<T: Into<String>>(expression: T, group_by: GroupBy) -> Self {
        SelectStatementItem {
            group_by: Some(group_by),
            ..Self::new(expression)
        }
    }

    pub fn with_alias<T: Into<String>>(self, alias: T) -> Self {
        SelectStatementItem {
            alias: Some(alias.into()),
            ..self
        }
    }

    /// Items without an expression, an alias or a group by marker render nothing.
    pub fn is_blank(&self) -> bool {
        self.expression.is_empty()
            && self.alias.as_deref().map_or(true, str::is_empty)
            && self.group_by.is_none()
    }
}

impl TableSource {
    pub fn object(object: ObjectRef) -> Self {
        TableSource {
            source: SourceKind::Object(object),
            alias: None,
            joins: vec![],
        }
    }

    pub fn sub_query(statement: SelectStatement) -> Self {
        TableSource {
            source: SourceKind::SubQuery(Box::new(statement)),
            alias: None,
            joins: vec![],
        }
    }

    pub fn with_alias<T: Into<String>>(self, alias: T) -> Self {
        TableSource {
            alias: Some(alias.into()),
            ..self
        }
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }
}

impl Join {
    pub fn new<T: Into<String>>(join_type: JoinType, source: TableSource, on: T) -> Self {
        Join {
            join_type,
            source: Box::new(source),
            search_condition: Some(on.into()),
            search_conditions: vec![],
        }
    }

    pub fn cross(source: TableSource) -> Self {
        Join {
            join_type: JoinType::Cross,
            source: Box::new(source),
            search_condition: None,
            search_conditions: vec![],
        }
    }
}

impl OrderBy {
    pub fn ascending<T: Into<String>>(expression: T) -> Self {
        OrderBy {
            expression: expression.into(),
            direction: Some(SortDirection::Ascending),
        }
    }

    pub fn descending<T: Into<String>>(expression: T) -> Self {
        OrderBy {
            expression: expression.into(),
            direction: Some(SortDirection::Descending),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.expression.is_empty() && self.direction.is_none()
    }
}

impl GroupBy {
    /// The aggregate function wrapping the expression, if any.
    pub fn aggregate_function(&self) -> Option<&'static str> {
        match self {
            GroupBy::Sum => Some("SUM"),
            GroupBy::Count => Some("COUNT"),
            GroupBy::Min => Some("MIN"),
            GroupBy::Max => Some("MAX"),
            GroupBy::Avg => Some("AVG"),
            GroupBy::GroupBy | GroupBy::Unsupported(_) => None,
        }
    }
}

impl From<String> for GroupBy {
    fn from(marker: String) -> Self {
        match marker.to_ascii_lowercase().as_str() {
            "groupby" | "group by" => GroupBy::GroupBy,
            "sum" => GroupBy::Sum,
            "count" => GroupBy::Count,
            "min" => GroupBy::Min,
            "max" => GroupBy::Max,
            "avg" | "average" => GroupBy::Avg,
            _ => GroupBy::Unsupported(marker),
        }
    }
}

impl From<GroupBy> for String {
    fn from(marker: GroupBy) -> Self {
        match marker {
            GroupBy::GroupBy => "GroupBy".to_owned(),
            GroupBy::Sum => "Sum".to_owned(),
            GroupBy::Count => "Count".to_owned(),
            GroupBy::Min => "Min".to_owned(),
            GroupBy::Max => "Max".to_owned(),
            GroupBy::Avg => "Avg".to_owned(),
            GroupBy::Unsupported(marker) => marker,
        }
    }
}

impl From<String> for JoinType {
    fn from(join_type: String) -> Self {
        match join_type.to_ascii_lowercase().as_str() {
            "cross" => JoinType::Cross,
            "inner" => JoinType::Inner,
            "leftouter" | "left" => JoinType::LeftOuter,
            "fullouter" | "full" => JoinType::FullOuter,
            "rightouter" | "right" => JoinType::RightOuter,
            _ => JoinType::Unsupported(join_type),
        }
    }
}

impl From<JoinType> for String {
    fn from(join_type: JoinType) -> Self {
        match join_type {
            JoinType::Cross => "Cross".to_owned(),
            JoinType::Inner => "Inner".to_owned(),
            JoinType::LeftOuter => "LeftOuter".to_owned(),
            JoinType::FullOuter => "FullOuter".to_owned(),
            JoinType::RightOuter => "RightOuter".to_owned(),
            JoinType::Unsupported(join_type) => join_type,
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ASC"),
            SortDirection::Descending => write!(f, "DESC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_statement() {
        let json = r#"{
            "distinct": true,
            "items": [{"expression": "price", "groupBy": "Sum", "alias": "total"}],
            "sources": [{
                "object": {"schemaName": "sales", "objectName": "orders"},
                "alias": "o",
                "joins": [{
                    "joinType": "LeftOuter",
                    "source": {"object": {"objectName": "customers"}, "alias": "c"},
                    "searchCondition": "o.customer_id = c.id"
                }]
            }],
            "where": "o.total > 0",
            "orderBy": [{"expression": "total", "direction": "DESC"}],
            "limit": 10,
            "offSet": 20
        }"#;

        let statement: SelectStatement = serde_json::from_str(json).unwrap();

        assert!(statement.distinct);
        assert_eq!(
            SelectStatementItem::grouped("price", GroupBy::Sum).with_alias("total"),
            statement.items[0]
        );
        assert_eq!(
            SourceKind::Object(ObjectRef::in_schema("sales", "orders")),
            statement.sources[0].source
        );
        assert_eq!(JoinType::LeftOuter, statement.sources[0].joins[0].join_type);
        assert_eq!(Some("o.total > 0".to_string()), statement.where_);
        assert_eq!(OrderBy::descending("total"), statement.order_by[0]);
        assert_eq!(Some(20), statement.off_set);
    }

    #[test]
    fn test_sub_query_source() {
        let json = r#"{"sources": [{"subQuery": {"sources": [{"object": {"objectName": "t"}}]}, "alias": "s"}]}"#;

        let statement: SelectStatement = serde_json::from_str(json).unwrap();

        assert_eq!(
            TableSource::sub_query(SelectStatement::from_object(ObjectRef::named("t")))
                .with_alias("s"),
            statement.sources[0]
        );
    }

    #[test]
    fn test_unknown_markers_are_kept() {
        let item: SelectStatementItem =
            serde_json::from_str(r#"{"expression": "x", "groupBy": "Median"}"#).unwrap();
        let join_type: JoinType = serde_json::from_str(r#""Lateral""#).unwrap();

        assert_eq!(Some(GroupBy::Unsupported("Median".to_string())), item.group_by);
        assert_eq!(JoinType::Unsupported("Lateral".to_string()), join_type);
    }

    #[test]
    fn test_markers_serialize_by_name() {
        let item = SelectStatementItem::grouped("x", GroupBy::Avg);

        assert_eq!(
            r#"{"expression":"x","groupBy":"Avg","output":true}"#,
            serde_json::to_string(&item).unwrap()
        );
    }

    #[test]
    fn test_blank_items() {
        assert!(SelectStatementItem::new("").is_blank());
        assert!(!SelectStatementItem::new("").with_alias("a").is_blank());
        assert!(!SelectStatementItem::grouped("", GroupBy::Count).is_blank());
        assert!(OrderBy { expression: String::new(), direction: None }.is_blank());
    }
}

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Unique within a tree. Missing ids are generated when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(String);

/// A node of the filter tree.
///
/// Serialized with a `"type"` tag, so a saved filter looks like this:
/// ```json
/// [{"type": "Group", "operator": "AND", "children": [
///     {"type": "Expression", "propertyName": "name", "comparisonOperator": "Like", "values": ["a%"]}
/// ]}]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Condition {
    Expression(ExpressionCondition),
    Group(GroupCondition),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionCondition {
    #[serde(default)]
    pub id: ConditionId,
    #[serde(default = "enabled")]
    pub active: bool,
    #[serde(default = "enabled")]
    pub valid: bool,
    #[serde(default)]
    pub property_name: String,
    #[serde(default)]
    pub comparison_operator: ComparisonOperator,
    /// Right hand side in [ConditionMode::Values].
    #[serde(default)]
    pub values: Vec<String>,
    // The following are the right hand side in [ConditionMode::Expressions].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCondition {
    #[serde(default)]
    pub id: ConditionId,
    #[serde(default = "enabled")]
    pub active: bool,
    #[serde(default = "enabled")]
    pub valid: bool,
    #[serde(default)]
    pub operator: GroupOperator,
    #[serde(default)]
    pub children: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[default]
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    IsNull,
    IsNotNull,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    NotBetween,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupOperator {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

/// How the right hand side of an [ExpressionCondition] is read.
///
/// This is chosen by whoever renders or validates the tree, it is never stored on a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionMode {
    /// `values` holds literal values.
    #[default]
    Values,
    /// The `*_expression` fields hold raw BQL.
    Expressions,
}

fn enabled() -> bool {
    true
}

impl ConditionId {
    pub fn generate() -> Self {
        ConditionId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for ConditionId {
    fn default() -> Self {
        ConditionId::generate()
    }
}

impl From<String> for ConditionId {
    fn from(id: String) -> ConditionId {
        ConditionId(id)
    }
}

impl From<&str> for ConditionId {
    fn from(id: &str) -> ConditionId {
        ConditionId(id.to_owned())
    }
}

impl Display for ConditionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Condition {
    pub fn id(&self) -> &ConditionId {
        match self {
            Condition::Expression(expression) => &expression.id,
            Condition::Group(group) => &group.id,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Condition::Expression(expression) => expression.active,
            Condition::Group(group) => group.active,
        }
    }

    /// Expressions never have children.
    pub fn children(&self) -> &[Condition] {
        match self {
            Condition::Expression(_) => &[],
            Condition::Group(group) => group.children.as_slice(),
        }
    }

    pub fn as_expression(&self) -> Option<&ExpressionCondition> {
        match self {
            Condition::Expression(expression) => Some(expression),
            Condition::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupCondition> {
        match self {
            Condition::Expression(_) => None,
            Condition::Group(group) => Some(group),
        }
    }

    pub(crate) fn id_mut(&mut self) -> &mut ConditionId {
        match self {
            Condition::Expression(expression) => &mut expression.id,
            Condition::Group(group) => &mut group.id,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Condition>> {
        match self {
            Condition::Expression(_) => None,
            Condition::Group(group) => Some(&mut group.children),
        }
    }

    /// Copies this node, building a new child list out of the current one.
    pub(crate) fn map_children<F>(&self, mapper: F) -> Condition
    where
        F: FnOnce(&[Condition]) -> Vec<Condition>,
    {
        match self {
            Condition::Expression(expression) => Condition::Expression(expression.clone()),
            Condition::Group(group) => Condition::Group(GroupCondition {
                id: group.id.clone(),
                active: group.active,
                valid: group.valid,
                operator: group.operator,
                children: mapper(&group.children),
            }),
        }
    }
}

impl ExpressionCondition {
    pub fn new<T: Into<String>>(
        property_name: T,
        comparison_operator: ComparisonOperator,
        values: Vec<String>,
    ) -> Self {
        ExpressionCondition {
            property_name: property_name.into(),
            comparison_operator,
            values,
            ..Default::default()
        }
    }

    /// Nothing filled in yet: no property, no values and no expressions.
    pub fn is_blank(&self) -> bool {
        let expressions = [
            &self.left_expression,
            &self.right_expression,
            &self.start_expression,
            &self.stop_expression,
        ];

        self.property_name.is_empty()
            && self.values.iter().all(String::is_empty)
            && expressions
                .iter()
                .all(|expression| expression.as_deref().map_or(true, str::is_empty))
    }
}

impl Default for ExpressionCondition {
    fn default() -> Self {
        ExpressionCondition {
            id: ConditionId::generate(),
            active: true,
            valid: true,
            property_name: String::new(),
            comparison_operator: ComparisonOperator::default(),
            values: Vec::new(),
            left_expression: None,
            right_expression: None,
            start_expression: None,
            stop_expression: None,
        }
    }
}

impl GroupCondition {
    pub fn new(operator: GroupOperator, children: Vec<Condition>) -> Self {
        GroupCondition {
            id: ConditionId::generate(),
            active: true,
            valid: true,
            operator,
            children,
        }
    }

    pub fn and(children: Vec<Condition>) -> Self {
        Self::new(GroupOperator::And, children)
    }

    pub fn or(children: Vec<Condition>) -> Self {
        Self::new(GroupOperator::Or, children)
    }
}

impl Default for GroupCondition {
    fn default() -> Self {
        GroupCondition::and(Vec::new())
    }
}

impl From<ExpressionCondition> for Condition {
    fn from(expression: ExpressionCondition) -> Self {
        Condition::Expression(expression)
    }
}

impl From<GroupCondition> for Condition {
    fn from(group: GroupCondition) -> Self {
        Condition::Group(group)
    }
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 14] = [
        ComparisonOperator::Equal,
        ComparisonOperator::NotEqual,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::LessThan,
        ComparisonOperator::GreaterThanOrEqual,
        ComparisonOperator::LessThanOrEqual,
        ComparisonOperator::IsNull,
        ComparisonOperator::IsNotNull,
        ComparisonOperator::Like,
        ComparisonOperator::NotLike,
        ComparisonOperator::In,
        ComparisonOperator::NotIn,
        ComparisonOperator::Between,
        ComparisonOperator::NotBetween,
    ];

    /// IS NULL and IS NOT NULL take no right hand side.
    pub fn is_null_check(self) -> bool {
        matches!(
            self,
            ComparisonOperator::IsNull | ComparisonOperator::IsNotNull
        )
    }

    pub fn is_range(self) -> bool {
        matches!(
            self,
            ComparisonOperator::Between | ComparisonOperator::NotBetween
        )
    }

    pub fn is_list(self) -> bool {
        matches!(self, ComparisonOperator::In | ComparisonOperator::NotIn)
    }

    pub fn name(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "Equal",
            ComparisonOperator::NotEqual => "NotEqual",
            ComparisonOperator::GreaterThan => "GreaterThan",
            ComparisonOperator::LessThan => "LessThan",
            ComparisonOperator::GreaterThanOrEqual => "GreaterThanOrEqual",
            ComparisonOperator::LessThanOrEqual => "LessThanOrEqual",
            ComparisonOperator::IsNull => "IsNull",
            ComparisonOperator::IsNotNull => "IsNotNull",
            ComparisonOperator::Like => "Like",
            ComparisonOperator::NotLike => "NotLike",
            ComparisonOperator::In => "In",
            ComparisonOperator::NotIn => "NotIn",
            ComparisonOperator::Between => "Between",
            ComparisonOperator::NotBetween => "NotBetween",
        }
    }
}

/// Renders the BQL keyword or symbol.
impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::IsNull => "IS NULL",
            ComparisonOperator::IsNotNull => "IS NOT NULL",
            ComparisonOperator::Like => "LIKE",
            ComparisonOperator::NotLike => "NOT LIKE",
            ComparisonOperator::In => "IN",
            ComparisonOperator::NotIn => "NOT IN",
            ComparisonOperator::Between => "BETWEEN",
            ComparisonOperator::NotBetween => "NOT BETWEEN",
        };

        write!(f, "{symbol}")
    }
}

impl Display for GroupOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupOperator::And => write!(f, "AND"),
            GroupOperator::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for ConditionMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "values" | "value" => Ok(ConditionMode::Values),
            "expressions" | "expression" => Ok(ConditionMode::Expressions),
            other => Err(format!(
                "unknown condition mode `{other}`, expected `values` or `expressions`"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_saved_filter() {
        let json = r#"[{"type": "Group", "id": "g", "operator": "OR", "children": [
            {"type": "Expression", "id": "a", "propertyName": "name",
             "comparisonOperator": "Like", "values": ["a%"], "children": []}
        ]}]"#;

        let conditions: Vec<Condition> = serde_json::from_str(json).unwrap();
        let group = conditions[0].as_group().unwrap();

        assert_eq!(GroupOperator::Or, group.operator);
        assert!(group.active);

        let expression = group.children[0].as_expression().unwrap();
        assert_eq!(&ConditionId::from("a"), &expression.id);
        assert_eq!(ComparisonOperator::Like, expression.comparison_operator);
        assert_eq!(vec!["a%".to_string()], expression.values);
    }

    #[test]
    fn test_missing_ids_are_generated() {
        let json = r#"[{"type": "Expression"}, {"type": "Expression"}]"#;
        let conditions: Vec<Condition> = serde_json::from_str(json).unwrap();

        assert_ne!(conditions[0].id(), conditions[1].id());
    }

    #[test]
    fn test_json_round_trip_keeps_shape() {
        let tree = vec![Condition::from(GroupCondition::and(vec![
            ExpressionCondition::new(
                "age",
                ComparisonOperator::Between,
                vec!["1".into(), "9".into()],
            )
            .into(),
        ]))];

        let json = serde_json::to_string(&tree).unwrap();
        let read_back: Vec<Condition> = serde_json::from_str(&json).unwrap();

        assert_eq!(tree, read_back);
    }

    #[test]
    fn test_blank_expression() {
        assert!(ExpressionCondition::default().is_blank());
        assert!(!ExpressionCondition::new("name", ComparisonOperator::Equal, vec![]).is_blank());
    }

    #[test]
    fn test_condition_mode_from_str() {
        assert_eq!(Ok(ConditionMode::Values), "values".parse());
        assert_eq!(Ok(ConditionMode::Expressions), "Expressions".parse());
        assert!("literal".parse::<ConditionMode>().is_err());
    }
}

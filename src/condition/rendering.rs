//! Renders condition trees as BQL condition text, ready for a WHERE, HAVING or ON clause.
//!
//! ```text
//! [Group OR [name LIKE 'a%', Group AND [age >= '18', age < '65']]]
//!     -> name LIKE 'a%' OR (age >= '18' AND age < '65')
//! ```
use crate::condition::{
    is_expression_valid, ComparisonOperator, Condition, ConditionMode, ExpressionCondition,
    GroupOperator,
};
use crate::identifiers::escape_identifier_if_required;
use log::debug;

/// Returns `None` when nothing in the tree renders: everything is inactive, invalid or an empty
/// group. Root conditions are combined with AND.
pub fn render_conditions(conditions: &[Condition], mode: ConditionMode) -> Option<String> {
    render_all(conditions, GroupOperator::And, mode).map(|rendered| rendered.text)
}

struct Rendered {
    text: String,
    /// Made of several parts joined by AND/OR, needs parentheses when nested.
    compound: bool,
}

fn render_all(
    conditions: &[Condition],
    operator: GroupOperator,
    mode: ConditionMode,
) -> Option<Rendered> {
    let mut parts: Vec<Rendered> = conditions
        .iter()
        .filter(|condition| condition.is_active())
        .filter_map(|condition| render_condition(condition, mode))
        .collect();

    if parts.len() <= 1 {
        return parts.pop();
    }

    let text = parts
        .into_iter()
        .map(|part| {
            if part.compound {
                format!("({})", part.text)
            } else {
                part.text
            }
        })
        .collect::<Vec<_>>()
        .join(&format!(" {operator} "));

    Some(Rendered {
        text,
        compound: true,
    })
}

fn render_condition(condition: &Condition, mode: ConditionMode) -> Option<Rendered> {
    match condition {
        Condition::Group(group) => render_all(&group.children, group.operator, mode),
        Condition::Expression(expression) => {
            render_expression(expression, mode).map(|text| Rendered {
                text,
                compound: false,
            })
        }
    }
}

fn render_expression(expression: &ExpressionCondition, mode: ConditionMode) -> Option<String> {
    if !is_expression_valid(expression, mode) {
        debug!("Skipping incomplete condition {}", expression.id);
        return None;
    }

    let left = left_side(expression, mode)?;
    let operator = expression.comparison_operator;

    let right = match mode {
        ConditionMode::Values => right_side_from_values(operator, &expression.values),
        ConditionMode::Expressions => right_side_from_expressions(expression),
    };

    match right {
        Some(right) => Some(format!("{left} {operator} {right}")),
        None if operator.is_null_check() => Some(format!("{left} {operator}")),
        None => {
            debug!("Skipping condition {} without a right hand side", expression.id);
            None
        }
    }
}

fn left_side(expression: &ExpressionCondition, mode: ConditionMode) -> Option<String> {
    let left_expression = expression
        .left_expression
        .as_deref()
        .filter(|left| !left.trim().is_empty());

    match (mode, left_expression) {
        (ConditionMode::Expressions, Some(left)) => Some(left.to_owned()),
        _ if expression.property_name.is_empty() => None,
        _ => Some(escape_identifier_if_required(&expression.property_name)),
    }
}

fn right_side_from_values(operator: ComparisonOperator, values: &[String]) -> Option<String> {
    let mut literals = values
        .iter()
        .filter(|value| !value.is_empty())
        .map(|value| literal(value));

    match operator {
        ComparisonOperator::IsNull | ComparisonOperator::IsNotNull => None,
        ComparisonOperator::In | ComparisonOperator::NotIn => {
            Some(format!("({})", literals.collect::<Vec<_>>().join(", ")))
        }
        ComparisonOperator::Between | ComparisonOperator::NotBetween => {
            let start = literals.next()?;
            let stop = literals.next()?;

            Some(format!("{start} AND {stop}"))
        }
        _ => literals.next(),
    }
}

fn right_side_from_expressions(expression: &ExpressionCondition) -> Option<String> {
    let operator = expression.comparison_operator;

    if operator.is_null_check() {
        None
    } else if operator.is_range() {
        let start = expression.start_expression.as_deref()?;
        let stop = expression.stop_expression.as_deref()?;

        Some(format!("{start} AND {stop}"))
    } else if operator.is_list() {
        let list = expression.right_expression.as_deref()?;

        Some(format!("({list})"))
    } else {
        expression.right_expression.clone()
    }
}

/// Single quoted string literal, embedded quotes doubled.
fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

use crate::condition::{
    ComparisonOperator, Condition, ConditionId, ConditionMode, ExpressionCondition,
};

/// Whether the right hand side is filled in the way the operator needs.
///
/// Null checks must not carry values. Everything else needs at least one non-empty value (or,
/// for expressions, the expression fields the operator reads).
pub fn is_expression_valid(expression: &ExpressionCondition, mode: ConditionMode) -> bool {
    let operator = expression.comparison_operator;

    match mode {
        ConditionMode::Values => {
            if operator.is_null_check() {
                expression.values.is_empty()
            } else {
                expression.values.iter().any(|value| !value.is_empty())
            }
        }
        ConditionMode::Expressions => match operator {
            ComparisonOperator::IsNull | ComparisonOperator::IsNotNull => true,
            ComparisonOperator::Between | ComparisonOperator::NotBetween => {
                is_filled(&expression.start_expression) && is_filled(&expression.stop_expression)
            }
            _ => is_filled(&expression.right_expression),
        },
    }
}

/// Every active expression in the tree is valid.
///
/// The first expression of the first group may be left blank: that is the state of a filter the
/// user hasn't started filling in.
pub fn are_conditions_valid(conditions: &[Condition], mode: ConditionMode) -> bool {
    let not_started = conditions
        .first()
        .and_then(Condition::as_group)
        .and_then(|group| group.children.first())
        .and_then(Condition::as_expression)
        .filter(|expression| expression.is_blank())
        .map(|expression| &expression.id);

    conditions
        .iter()
        .all(|condition| is_subtree_valid(condition, mode, not_started))
}

fn is_subtree_valid(
    condition: &Condition,
    mode: ConditionMode,
    not_started: Option<&ConditionId>,
) -> bool {
    if !condition.is_active() {
        return true;
    }

    match condition {
        Condition::Expression(expression) => {
            Some(&expression.id) == not_started || is_expression_valid(expression, mode)
        }
        Condition::Group(group) => group
            .children
            .iter()
            .all(|child| is_subtree_valid(child, mode, not_started)),
    }
}

fn is_filled(expression: &Option<String>) -> bool {
    expression
        .as_deref()
        .map_or(false, |expression| !expression.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{initial_conditions, new_condition_with_operator, GroupCondition};

    fn values(operator: ComparisonOperator, values: Vec<&str>) -> ExpressionCondition {
        new_condition_with_operator("name", values, operator)
    }

    #[test]
    fn test_null_checks_take_no_values() {
        let mode = ConditionMode::Values;

        assert!(is_expression_valid(&values(ComparisonOperator::IsNull, vec![]), mode));
        assert!(is_expression_valid(&values(ComparisonOperator::IsNotNull, vec![]), mode));
        assert!(!is_expression_valid(&values(ComparisonOperator::IsNull, vec!["a"]), mode));
    }

    #[test]
    fn test_other_operators_need_a_value() {
        let mode = ConditionMode::Values;

        assert!(is_expression_valid(&values(ComparisonOperator::Equal, vec!["a"]), mode));
        assert!(is_expression_valid(&values(ComparisonOperator::In, vec!["", "b"]), mode));
        assert!(!is_expression_valid(&values(ComparisonOperator::Equal, vec![]), mode));
        assert!(!is_expression_valid(&values(ComparisonOperator::Like, vec![""]), mode));
    }

    #[test]
    fn test_expression_mode() {
        let mode = ConditionMode::Expressions;

        let mut between = values(ComparisonOperator::Between, vec![]);
        between.start_expression = Some("1".to_string());
        assert!(!is_expression_valid(&between, mode));

        between.stop_expression = Some("10".to_string());
        assert!(is_expression_valid(&between, mode));

        let mut equal = values(ComparisonOperator::Equal, vec!["ignored"]);
        assert!(!is_expression_valid(&equal, mode));

        equal.right_expression = Some("other_column".to_string());
        assert!(is_expression_valid(&equal, mode));
    }

    #[test]
    fn test_untouched_filter_is_valid() {
        assert!(are_conditions_valid(&initial_conditions(), ConditionMode::Values));
    }

    #[test]
    fn test_only_the_first_blank_expression_is_allowed() {
        let tree: Vec<Condition> = vec![GroupCondition::and(vec![
            ExpressionCondition::default().into(),
            ExpressionCondition::default().into(),
        ])
        .into()];

        assert!(!are_conditions_valid(&tree, ConditionMode::Values));
    }

    #[test]
    fn test_inactive_conditions_are_ignored() {
        let mut broken = values(ComparisonOperator::Equal, vec![]);
        broken.active = false;

        let tree: Vec<Condition> = vec![GroupCondition::and(vec![
            values(ComparisonOperator::Equal, vec!["a"]).into(),
            broken.into(),
        ])
        .into()];

        assert!(are_conditions_valid(&tree, ConditionMode::Values));
    }
}

//! Structural operations over condition trees.
//!
//! None of these mutate their input (except [regenerate_condition_ids]). Each one returns a new
//! list, so whoever still holds the previous tree keeps seeing it unchanged.
use crate::condition::{
    ComparisonOperator, Condition, ConditionId, ExpressionCondition, GroupCondition,
};
use log::debug;

/// What a new condition starts with: nothing, one value or a list of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InitialValue {
    #[default]
    Empty,
    Single(String),
    Many(Vec<String>),
}

/// Creates an `In` condition for the property.
pub fn new_condition<P, V>(property_name: P, value: V) -> ExpressionCondition
where
    P: Into<String>,
    V: Into<InitialValue>,
{
    new_condition_with_operator(property_name, value, ComparisonOperator::In)
}

pub fn new_condition_with_operator<P, V>(
    property_name: P,
    value: V,
    operator: ComparisonOperator,
) -> ExpressionCondition
where
    P: Into<String>,
    V: Into<InitialValue>,
{
    let values = match value.into() {
        InitialValue::Empty => vec![],
        InitialValue::Single(value) if value.is_empty() => vec![],
        InitialValue::Single(value) => vec![value],
        InitialValue::Many(values) => values,
    };

    ExpressionCondition::new(property_name, operator, values)
}

/// The state of a filter nobody touched yet: one group holding one empty expression.
pub fn initial_conditions() -> Vec<Condition> {
    vec![GroupCondition::and(vec![ExpressionCondition::default().into()]).into()]
}

pub fn find_condition<'a>(conditions: &'a [Condition], id: &ConditionId) -> Option<&'a Condition> {
    conditions.iter().find_map(|condition| {
        if condition.id() == id {
            Some(condition)
        } else {
            find_condition(condition.children(), id)
        }
    })
}

/// Removes the condition with the given id, wherever it is.
///
/// Groups left empty by the removal are kept, see [filter_empty_groups].
pub fn filter_nested_conditions(conditions: &[Condition], id: &ConditionId) -> Vec<Condition> {
    conditions
        .iter()
        .filter(|condition| condition.id() != id)
        .map(|condition| {
            condition.map_children(|children| filter_nested_conditions(children, id))
        })
        .collect()
}

/// Drops every group without children.
///
/// Children are handled first, so a group holding nothing but empty groups is dropped as well.
pub fn filter_empty_groups(conditions: &[Condition]) -> Vec<Condition> {
    conditions
        .iter()
        .filter_map(|condition| {
            let rebuilt = condition.map_children(filter_empty_groups);

            match &rebuilt {
                Condition::Group(group) if group.children.is_empty() => {
                    debug!("Dropping empty group {}", group.id);
                    None
                }
                _ => Some(rebuilt),
            }
        })
        .collect()
}

/// Swaps the condition sharing `updated`'s id for `updated`, children included.
pub fn update_nested_condition(conditions: &[Condition], updated: &Condition) -> Vec<Condition> {
    conditions
        .iter()
        .map(|condition| {
            if condition.id() == updated.id() {
                updated.clone()
            } else {
                condition.map_children(|children| update_nested_condition(children, updated))
            }
        })
        .collect()
}

/// Appends `condition` to the group with the `parent` id, or to the root list when there is no
/// parent.
///
/// Nothing changes if the parent is missing or is not a group.
pub fn insert_condition(
    conditions: &[Condition],
    parent: Option<&ConditionId>,
    condition: Condition,
) -> Vec<Condition> {
    let Some(parent) = parent else {
        let mut inserted = conditions.to_vec();
        inserted.push(condition);

        return inserted;
    };

    conditions
        .iter()
        .map(|node| match node {
            Condition::Group(group) if &group.id == parent => node.map_children(|children| {
                let mut children = children.to_vec();
                children.push(condition.clone());
                children
            }),
            _ => node.map_children(|children| {
                insert_condition(children, Some(parent), condition.clone())
            }),
        })
        .collect()
}

/// Gives every node a fresh id.
///
/// Used when a saved filter is reused, so two copies being edited side by side never share ids.
pub fn regenerate_condition_ids(conditions: &mut [Condition]) {
    for condition in conditions {
        *condition.id_mut() = ConditionId::generate();

        if let Some(children) = condition.children_mut() {
            regenerate_condition_ids(children);
        }
    }
}

/// A deep copy of the tree with fresh ids.
pub fn clone_with_new_ids(conditions: &[Condition]) -> Vec<Condition> {
    let mut copy = conditions.to_vec();
    regenerate_condition_ids(&mut copy);

    copy
}

/// A tree without anything but empty groups filters nothing.
pub fn is_empty_filter(conditions: &[Condition]) -> bool {
    filter_empty_groups(conditions).is_empty()
}

impl From<&str> for InitialValue {
    fn from(value: &str) -> Self {
        InitialValue::Single(value.to_owned())
    }
}

impl From<String> for InitialValue {
    fn from(value: String) -> Self {
        InitialValue::Single(value)
    }
}

impl From<Vec<String>> for InitialValue {
    fn from(values: Vec<String>) -> Self {
        InitialValue::Many(values)
    }
}

impl From<Vec<&str>> for InitialValue {
    fn from(values: Vec<&str>) -> Self {
        InitialValue::Many(values.into_iter().map(str::to_owned).collect())
    }
}

impl<T: Into<InitialValue>> From<Option<T>> for InitialValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(InitialValue::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::GroupOperator;

    fn expression(id: &str) -> Condition {
        let mut expression = new_condition("name", "value");
        expression.id = id.into();

        expression.into()
    }

    fn group(id: &str, children: Vec<Condition>) -> Condition {
        let mut group = GroupCondition::and(children);
        group.id = id.into();

        group.into()
    }

    #[test]
    fn test_new_condition_normalizes_values() {
        assert!(new_condition("name", None::<&str>).values.is_empty());
        assert!(new_condition("name", "").values.is_empty());
        assert_eq!(vec!["a"], new_condition("name", "a").values);
        assert_eq!(vec!["a", "b"], new_condition("name", vec!["a", "b"]).values);
        assert_eq!(
            ComparisonOperator::In,
            new_condition("name", "a").comparison_operator
        );
        assert_eq!(
            ComparisonOperator::Like,
            new_condition_with_operator("name", "a%", ComparisonOperator::Like).comparison_operator
        );
    }

    #[test]
    fn test_initial_conditions() {
        let conditions = initial_conditions();
        let group = conditions[0].as_group().unwrap();

        assert_eq!(1, conditions.len());
        assert_eq!(GroupOperator::And, group.operator);
        assert!(group.children[0].as_expression().unwrap().is_blank());
        assert!(!is_empty_filter(&conditions));
    }

    #[test]
    fn test_find_condition() {
        let tree = vec![group("g", vec![expression("a"), group("h", vec![expression("b")])])];

        assert_eq!(Some(&expression("b")), find_condition(&tree, &"b".into()));
        assert!(find_condition(&tree, &"h".into()).unwrap().as_group().is_some());
        assert_eq!(None, find_condition(&tree, &"x".into()));
    }

    #[test]
    fn test_filter_then_prune() {
        let tree = vec![group("g", vec![expression("a"), expression("b")])];

        let without_a = filter_nested_conditions(&tree, &"a".into());
        assert_eq!(vec![group("g", vec![expression("b")])], without_a);

        let without_b = filter_nested_conditions(&without_a, &"b".into());
        assert_eq!(vec![group("g", vec![])], without_b);

        assert!(filter_empty_groups(&without_b).is_empty());
        assert!(is_empty_filter(&without_b));

        // the earlier snapshots are untouched
        assert_eq!(2, tree[0].children().len());
        assert_eq!(1, without_a[0].children().len());
    }

    #[test]
    fn test_filter_removes_whole_groups() {
        let tree = vec![
            group("g", vec![expression("a"), group("h", vec![expression("b")])]),
            expression("c"),
        ];

        let filtered = filter_nested_conditions(&tree, &"h".into());

        assert_eq!(
            vec![group("g", vec![expression("a")]), expression("c")],
            filtered
        );
    }

    #[test]
    fn test_filter_empty_groups_cascades() {
        let tree = vec![
            group("g", vec![group("h", vec![group("i", vec![])])]),
            group("j", vec![expression("a"), group("k", vec![])]),
        ];

        assert_eq!(
            vec![group("j", vec![expression("a")])],
            filter_empty_groups(&tree)
        );
    }

    #[test]
    fn test_update_nested_condition() {
        let tree = vec![group("g", vec![expression("a"), group("h", vec![expression("b")])])];

        let mut updated = new_condition("age", "42");
        updated.id = "b".into();
        let updated: Condition = updated.into();

        let result = update_nested_condition(&tree, &updated);

        assert_eq!(Some(&updated), find_condition(&result, &"b".into()));
        assert_eq!(Some(&expression("b")), find_condition(&tree, &"b".into()));
    }

    #[test]
    fn test_update_replaces_children_too() {
        let tree = vec![group("g", vec![expression("a"), expression("b")])];
        let replacement = group("g", vec![expression("c")]);

        assert_eq!(vec![replacement.clone()], update_nested_condition(&tree, &replacement));
    }

    #[test]
    fn test_insert_condition() {
        let tree = vec![group("g", vec![expression("a"), group("h", vec![])])];

        let nested = insert_condition(&tree, Some(&"h".into()), expression("b"));
        assert_eq!(
            vec![group("g", vec![expression("a"), group("h", vec![expression("b")])])],
            nested
        );

        let root = insert_condition(&tree, None, expression("c"));
        assert_eq!(2, root.len());

        // expressions can't have children
        assert_eq!(tree, insert_condition(&tree, Some(&"a".into()), expression("d")));
        assert_eq!(tree, insert_condition(&tree, Some(&"x".into()), expression("d")));
    }

    #[test]
    fn test_clone_with_new_ids() {
        let tree = vec![group("g", vec![expression("a")])];
        let copy = clone_with_new_ids(&tree);

        assert_ne!(tree[0].id(), copy[0].id());
        assert_ne!(tree[0].children()[0].id(), copy[0].children()[0].id());
        assert_eq!(
            tree[0].children()[0].as_expression().unwrap().values,
            copy[0].children()[0].as_expression().unwrap().values
        );
    }
}

//! Property tests for the condition tree operations.

use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::HashSet;

use crate::condition::{
    filter_empty_groups, filter_nested_conditions, find_condition, new_condition,
    regenerate_condition_ids, Condition, ConditionId, GroupCondition,
};

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators
// ═══════════════════════════════════════════════════════════════════════════

fn leaf_strategy() -> impl Strategy<Value = Condition> {
    (
        "[a-z]{1,8}",
        prop::collection::vec("[a-z0-9]{0,4}", 0..3),
    )
        .prop_map(|(property, values)| new_condition(property, values).into())
}

fn condition_strategy() -> impl Strategy<Value = Condition> {
    leaf_strategy().prop_recursive(4, 48, 4, |inner| {
        (any::<bool>(), prop::collection::vec(inner, 0..4)).prop_map(|(or, children)| {
            let group = if or {
                GroupCondition::or(children)
            } else {
                GroupCondition::and(children)
            };

            group.into()
        })
    })
}

fn forest_strategy() -> impl Strategy<Value = Vec<Condition>> {
    prop::collection::vec(condition_strategy(), 1..4)
}

// ═══════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn all_ids(conditions: &[Condition]) -> Vec<ConditionId> {
    conditions
        .iter()
        .flat_map(|condition| {
            let mut ids = vec![condition.id().clone()];
            ids.extend(all_ids(condition.children()));
            ids
        })
        .collect()
}

fn without_ids(conditions: &[Condition]) -> Vec<Condition> {
    let mut copy = conditions.to_vec();
    blank_ids(&mut copy);

    copy
}

fn blank_ids(conditions: &mut [Condition]) {
    for condition in conditions {
        *condition.id_mut() = "".into();

        if let Some(children) = condition.children_mut() {
            blank_ids(children);
        }
    }
}

fn has_empty_group(conditions: &[Condition]) -> bool {
    conditions.iter().any(|condition| match condition {
        Condition::Group(group) => group.children.is_empty() || has_empty_group(&group.children),
        Condition::Expression(_) => false,
    })
}

fn leaf_count(conditions: &[Condition]) -> usize {
    conditions
        .iter()
        .map(|condition| match condition {
            Condition::Group(group) => leaf_count(&group.children),
            Condition::Expression(_) => 1,
        })
        .sum()
}

// ═══════════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn regenerated_ids_are_unique(tree in forest_strategy()) {
        let mut regenerated = tree.clone();
        regenerate_condition_ids(&mut regenerated);

        let ids = all_ids(&regenerated);
        let unique: HashSet<_> = ids.iter().collect();

        prop_assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn regenerating_ids_keeps_everything_else(tree in forest_strategy()) {
        let mut regenerated = tree.clone();
        regenerate_condition_ids(&mut regenerated);

        prop_assert_eq!(without_ids(&tree), without_ids(&regenerated));

        let old_ids: HashSet<_> = all_ids(&tree).into_iter().collect();
        prop_assert!(all_ids(&regenerated).iter().all(|id| !old_ids.contains(id)));
    }

    #[test]
    fn filtering_removes_only_the_target(tree in forest_strategy(), pick in any::<Index>()) {
        let ids = all_ids(&tree);
        let target = pick.get(&ids).clone();

        let removed_subtree = find_condition(&tree, &target).map(|condition| {
            all_ids(std::slice::from_ref(condition)).len()
        });
        let filtered = filter_nested_conditions(&tree, &target);

        prop_assert!(find_condition(&filtered, &target).is_none());
        prop_assert_eq!(ids.len() - removed_subtree.unwrap_or(0), all_ids(&filtered).len());
    }

    #[test]
    fn pruning_leaves_no_empty_groups(tree in forest_strategy()) {
        let pruned = filter_empty_groups(&tree);

        prop_assert!(!has_empty_group(&pruned));
        prop_assert_eq!(leaf_count(&tree), leaf_count(&pruned));
        prop_assert_eq!(pruned.clone(), filter_empty_groups(&pruned));
    }
}

//! The filter condition model.
//!
//! A filter is a list of [Condition] trees. Leaves are [ExpressionCondition]s like
//! `name LIKE 'a%'`, inner nodes are [GroupCondition]s combining their children with AND or OR.

mod model;
/// Which operators fit which data types.
pub mod operators;
mod rendering;
mod tree;
mod validity;

#[cfg(test)]
mod property_tests;

pub use model::{
    ComparisonOperator, Condition, ConditionId, ConditionMode, ExpressionCondition,
    GroupCondition, GroupOperator,
};
pub use operators::{comparison_operators_by_data_type, DataType, DataTypeCategory};
pub use rendering::render_conditions;
pub use tree::{
    clone_with_new_ids, filter_empty_groups, filter_nested_conditions, find_condition,
    initial_conditions, insert_condition, is_empty_filter, new_condition,
    new_condition_with_operator, regenerate_condition_ids, update_nested_condition,
    InitialValue,
};
pub use validity::{are_conditions_valid, is_expression_valid};

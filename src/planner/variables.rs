use rustc_hash::FxHashSet;

use crate::ast::operation::OperationDefinition;

use super::collect_variable_names;
use super::plan_nodes::{OperationPlanNode, PlanNode, RootPlanNode};

/// Attaches to every operation node the subset of the original operation's
/// variable definitions its selections actually use (arguments and
/// remaining field conditions), preserving the original definition order.
/// Runs once, after the forest is fully assembled.
pub(crate) fn bind_operation_variables(operation: &OperationDefinition, root: &mut RootPlanNode) {
    for node in &mut root.nodes {
        bind_plan_node(operation, node);
    }
}

fn bind_plan_node(operation: &OperationDefinition, node: &mut PlanNode) {
    match node {
        PlanNode::Condition(condition) => bind_plan_node(operation, &mut condition.node),
        PlanNode::Operation(operation_node) => bind_operation(operation, operation_node),
    }
}

fn bind_operation(operation: &OperationDefinition, operation_node: &mut OperationPlanNode) {
    let mut used = FxHashSet::default();
    collect_variable_names(&operation_node.selections, &mut used);

    operation_node.variable_definitions = operation
        .variable_definitions
        .iter()
        .filter(|definition| used.contains(&definition.name))
        .cloned()
        .collect();

    for child in &mut operation_node.child_nodes {
        bind_plan_node(operation, child);
    }
}

use serde::{Deserialize, Serialize};

use crate::ast::directive::Directive;
use crate::ast::value::Value;

use super::plan_nodes::{ConditionPlanNode, FieldPlanNode, OperationPlanNode, PlanNode};

const SKIP_DIRECTIVE: &str = "skip";
const INCLUDE_DIRECTIVE: &str = "include";
const IF_ARGUMENT: &str = "if";

/// A boolean inclusion condition derived from `@skip`/`@include`:
/// the selection is taken when `variable_name` holds `passing_value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub variable_name: String,
    pub passing_value: bool,
}

/// Whether the selection is excluded for every request.
///
/// A literal `@skip(if: true)` or `@include(if: false)` drops the selection
/// permanently, regardless of any other directive on it. Static skip wins
/// over variable-bound conditions; directive order carries no meaning.
pub fn is_statically_skipped(directives: &[Directive]) -> bool {
    for directive in directives {
        let is_skip = directive.name == SKIP_DIRECTIVE;
        let is_include = directive.name == INCLUDE_DIRECTIVE;
        if !is_skip && !is_include {
            continue;
        }

        if let Some(Value::Boolean(value)) = directive.argument(IF_ARGUMENT) {
            if (is_skip && *value) || (is_include && !*value) {
                return true;
            }
        }
    }

    false
}

/// Variable-bound conditions contributed by `@skip`/`@include` directives.
/// Each directive contributes independently; duplicates collapse.
pub fn extract_conditions(directives: &[Directive]) -> Vec<Condition> {
    let mut conditions = Vec::new();

    for directive in directives {
        let is_skip = directive.name == SKIP_DIRECTIVE;
        let is_include = directive.name == INCLUDE_DIRECTIVE;
        if !is_skip && !is_include {
            continue;
        }

        if let Some(Value::Variable(variable_name)) = directive.argument(IF_ARGUMENT) {
            let condition = Condition {
                variable_name: variable_name.clone(),
                passing_value: is_include,
            };
            if !conditions.contains(&condition) {
                conditions.push(condition);
            }
        }
    }

    conditions
}

/// Hoists conditions shared by every top-level selection of a completed
/// operation into a chain of condition nodes wrapping it.
///
/// Folding happens only when every selection carries exactly the first
/// selection's condition set; a selection with no conditions, a missing
/// shared condition, or an extra one leaves the operation untouched. For
/// lookup operations (`lookup_rooted`) the selections under the synthetic
/// lookup field are folded instead of the operation's own selection list.
pub fn fold_shared_conditions(mut operation: OperationPlanNode, lookup_rooted: bool) -> PlanNode {
    let shared = shared_conditions(fold_target(&operation, lookup_rooted));
    if shared.is_empty() {
        return PlanNode::Operation(operation);
    }

    for selection in fold_target_mut(&mut operation, lookup_rooted) {
        for condition in &shared {
            selection.remove_condition(condition);
        }
    }

    let mut node = PlanNode::Operation(operation);
    for condition in shared.into_iter().rev() {
        node = PlanNode::Condition(ConditionPlanNode {
            variable_name: condition.variable_name,
            passing_value: condition.passing_value,
            node: Box::new(node),
        });
    }

    node
}

fn fold_target(operation: &OperationPlanNode, lookup_rooted: bool) -> &[FieldPlanNode] {
    if lookup_rooted {
        operation
            .selections
            .first()
            .and_then(|lookup_field| lookup_field.selections.as_deref())
            .unwrap_or(&[])
    } else {
        &operation.selections
    }
}

fn fold_target_mut(
    operation: &mut OperationPlanNode,
    lookup_rooted: bool,
) -> &mut [FieldPlanNode] {
    if lookup_rooted {
        operation
            .selections
            .first_mut()
            .and_then(|lookup_field| lookup_field.selections.as_deref_mut())
            .unwrap_or(&mut [])
    } else {
        &mut operation.selections
    }
}

fn shared_conditions(selections: &[FieldPlanNode]) -> Vec<Condition> {
    let Some(first) = selections.first() else {
        return Vec::new();
    };
    if first.conditions.is_empty() {
        return Vec::new();
    }

    for selection in &selections[1..] {
        if selection.conditions.len() != first.conditions.len() {
            return Vec::new();
        }
        if !first
            .conditions
            .iter()
            .all(|condition| selection.conditions.contains(condition))
        {
            return Vec::new();
        }
    }

    first.conditions.clone()
}

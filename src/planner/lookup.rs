use rustc_hash::FxHashSet;
use tracing::trace;

use crate::ast::selection_set::SelectionItem;
use crate::state::composite_schema::{CompositeType, OutputField};

use super::conditions::fold_shared_conditions;
use super::error::{PlanInvariantError, PlanningError};
use super::plan_nodes::{FieldPlanNode, OperationPlanNode, PlanNode};
use super::weights::{schemas_by_weight, weigh_unresolved_fields};
use super::{OperationPlanner, PathSegment, PlanAttempt, UnresolvedField};

/// The nearest entity ancestor of a selection path, plus the fields between
/// it and the unresolved fields' parent. Every hop must be traversable in a
/// candidate schema for a lookup from that schema to reach the fields.
struct EntityPath<'a> {
    entity_type: &'a CompositeType,
    hops: Vec<&'a OutputField>,
}

impl<'a> OperationPlanner<'a> {
    /// Bridges a batch of unresolved sibling fields into child operations:
    /// walks the selection path to the nearest entity, weighs candidate
    /// schemas, and spawns one lookup operation per schema that claims a
    /// subset of the batch. The batch succeeds only if every field is
    /// claimed; on failure all spawned branches are discarded.
    pub(crate) fn resolve_unresolved(
        &self,
        parent_type: &'a CompositeType,
        unresolved: &[UnresolvedField<'_, 'a>],
        path: &[PathSegment<'a>],
        child_nodes: &mut Vec<PlanNode>,
    ) -> Result<bool, PlanningError> {
        let query_type = self
            .schema
            .query_type_def()
            .ok_or(PlanInvariantError::MissingQueryRoot)?;

        let Some(entity_path) = resolve_entity_path(query_type, path) else {
            trace!(
                type_name = %parent_type.name,
                "no entity boundary found for unresolved selections"
            );
            return Ok(false);
        };

        let mut processed_schemas: FxHashSet<String> = FxHashSet::default();
        let mut processed_fields: FxHashSet<String> = FxHashSet::default();
        let mut resolved_branches: Vec<PlanNode> = Vec::new();

        let weights = weigh_unresolved_fields(unresolved, &processed_schemas);
        for schema_name in schemas_by_weight(weights) {
            if !processed_schemas.insert(schema_name.clone()) {
                continue;
            }

            // A schema that cannot traverse the path from the entity down
            // to the parent cannot host the lookup branch.
            let Some(type_source) = entity_path.entity_type.sources.get(&schema_name) else {
                continue;
            };
            if !entity_path
                .hops
                .iter()
                .all(|hop| hop.sources.contains(&schema_name))
            {
                continue;
            }

            // Weighting promised this schema resolves part of the batch; an
            // entity source without a lookup breaks the registry contract.
            let Some(lookup) = type_source.lookups.first() else {
                return Err(PlanInvariantError::MissingLookup {
                    schema_name: schema_name.clone(),
                    type_name: entity_path.entity_type.name.clone(),
                }
                .into());
            };

            let subset: Vec<SelectionItem> = unresolved
                .iter()
                .filter(|unresolved_field| {
                    unresolved_field.field.sources.contains(&schema_name)
                        && !processed_fields.contains(&unresolved_field.field.name)
                })
                .map(|unresolved_field| SelectionItem::Field(unresolved_field.field_node.clone()))
                .collect();
            if subset.is_empty() {
                continue;
            }

            // The lookup operation re-enters the entity on the candidate
            // schema; its path starts fresh so that entity discovery for
            // nested unresolved fields terminates at this boundary.
            let mut lookup_path = vec![PathSegment {
                field: None,
                output_type: parent_type,
            }];
            let mut lookup_children = Vec::new();

            let planned = match self.plan_selections(
                &schema_name,
                parent_type,
                &subset,
                &mut lookup_path,
                &mut lookup_children,
                false,
                false,
            )? {
                PlanAttempt::Planned(planned) => planned,
                // The branch stays unresolved for the next candidate.
                PlanAttempt::Blocked(_) => continue,
            };

            for selection in &planned {
                processed_fields.insert(selection.name.clone());
            }

            let mut lookup_operation =
                OperationPlanNode::new(&schema_name, &self.schema.query_type);
            lookup_operation.selections = vec![FieldPlanNode {
                alias: None,
                name: lookup.name.clone(),
                arguments: Vec::new(),
                type_name: parent_type.name.clone(),
                conditions: Vec::new(),
                selections: Some(planned),
            }];
            lookup_operation.child_nodes = lookup_children;

            trace!(
                schema = %schema_name,
                lookup = %lookup.name,
                entity = %entity_path.entity_type.name,
                "attached lookup branch"
            );
            resolved_branches.push(fold_shared_conditions(lookup_operation, true));
        }

        if processed_fields.len() == unresolved.len() {
            child_nodes.extend(resolved_branches);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Walks the selection path upward to the nearest node whose declaring type
/// is an entity. The walk stops at the operation boundary; reaching it
/// without an entity means the batch cannot be bridged in this attempt.
fn resolve_entity_path<'a>(
    query_type: &'a CompositeType,
    path: &[PathSegment<'a>],
) -> Option<EntityPath<'a>> {
    for index in (0..path.len()).rev() {
        if path[index].output_type.is_entity() {
            let mut hops = Vec::new();
            for segment in &path[index + 1..] {
                hops.push(segment.field?);
            }
            return Some(EntityPath {
                entity_type: path[index].output_type,
                hops,
            });
        }
    }

    if query_type.is_entity() {
        let mut hops = Vec::new();
        for segment in path {
            hops.push(segment.field?);
        }
        return Some(EntityPath {
            entity_type: query_type,
            hops,
        });
    }

    None
}

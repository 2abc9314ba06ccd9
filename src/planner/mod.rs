use graphql_parser::query;
use rustc_hash::FxHashSet;
use tracing::{instrument, trace};

use crate::ast::document::extract_operation;
use crate::ast::operation::OperationDefinition;
use crate::ast::selection_set::{FieldSelection, SelectionItem};
use crate::state::composite_schema::{CompositeSchema, CompositeType, OutputField};

use conditions::{extract_conditions, fold_shared_conditions, is_statically_skipped};
use plan_nodes::{FieldPlanNode, OperationPlanNode, PlanNode, RootPlanNode};
use variables::bind_operation_variables;
use weights::{schemas_by_weight, weigh_selection_set};

pub mod conditions;
mod error;
mod lookup;
pub mod plan_nodes;
mod variables;
mod weights;

pub use error::{PlanInvariantError, PlanningError};

const TYPENAME_FIELD: &str = "__typename";

/// Plans a GraphQL operation against a composite schema: every requested
/// field is assigned to a source-schema sub-operation, bridging across
/// schemas through entity lookups where a single schema cannot resolve a
/// selection set on its own.
///
/// Planning is a pure, synchronous transform; the registry is never
/// written to, so one schema may back concurrent planners.
pub struct OperationPlanner<'a> {
    schema: &'a CompositeSchema,
}

/// One hop of the selection path currently being planned, innermost last.
/// `field` is `None` only for the synthetic root of a lookup operation.
pub(crate) struct PathSegment<'a> {
    pub field: Option<&'a OutputField>,
    pub output_type: &'a CompositeType,
}

/// A requested field the current schema attempt could not place; collected
/// and replayed against lookup-spawned child operations.
pub(crate) struct UnresolvedField<'op, 'a> {
    pub field_node: &'op FieldSelection,
    pub field: &'a OutputField,
}

/// Outcome of one planning attempt.
pub(crate) enum PlanAttempt {
    Planned(Vec<FieldPlanNode>),
    Blocked(PlanBlocker),
}

/// The innermost field that stopped a discarded attempt; carried upward so
/// that an unsatisfiable operation is reported at the real culprit instead
/// of its root ancestor.
#[derive(Debug, Clone)]
pub(crate) struct PlanBlocker {
    pub type_name: String,
    pub field_name: String,
}

impl<'a> OperationPlanner<'a> {
    pub fn new(schema: &'a CompositeSchema) -> Self {
        OperationPlanner { schema }
    }

    /// Builds the execution plan for the selected operation of `document`.
    #[instrument(level = "trace", skip_all)]
    pub fn create_plan(
        &self,
        document: &query::Document<'_, String>,
        operation_name: Option<&str>,
    ) -> Result<RootPlanNode, PlanningError> {
        let operation =
            extract_operation(document, operation_name).ok_or(PlanningError::MissingOperation)?;
        self.plan_operation(&operation)
    }

    pub fn plan_operation(
        &self,
        operation: &OperationDefinition,
    ) -> Result<RootPlanNode, PlanningError> {
        let query_type = self
            .schema
            .query_type_def()
            .ok_or(PlanInvariantError::MissingQueryRoot)?;

        // Statically excluded root selections never participate in planning.
        let root_items: Vec<&SelectionItem> = operation
            .selection_set
            .items
            .iter()
            .filter(|item| !is_statically_skipped(&item.field().directives))
            .collect();

        let weights = weigh_selection_set(query_type, &root_items)?;

        let mut root = RootPlanNode::default();
        let mut remaining = root_items;
        let mut last_blocker: Option<PlanBlocker> = None;

        // Greedy partition of the root selections: each schema, visited in
        // descending weight, takes the still-unplanned fields it can
        // resolve. A failed attempt keeps its fields for later candidates.
        for schema_name in schemas_by_weight(weights) {
            if remaining.is_empty() {
                break;
            }

            let (taken, kept): (Vec<&SelectionItem>, Vec<&SelectionItem>) =
                remaining.iter().copied().partition(|item| {
                    root_field_resolvable(query_type, item.field(), &schema_name)
                });
            if taken.is_empty() {
                continue;
            }

            let items: Vec<SelectionItem> = taken.iter().map(|item| (*item).clone()).collect();
            let mut path = Vec::new();
            let mut child_nodes = Vec::new();

            match self.plan_selections(
                &schema_name,
                query_type,
                &items,
                &mut path,
                &mut child_nodes,
                true,
                false,
            )? {
                PlanAttempt::Planned(selections) if !selections.is_empty() => {
                    let mut operation_node = OperationPlanNode::new(&schema_name, &query_type.name);
                    operation_node.selections = selections;
                    operation_node.child_nodes = child_nodes;
                    root.nodes.push(fold_shared_conditions(operation_node, false));
                    remaining = kept;
                }
                PlanAttempt::Blocked(blocker) => {
                    trace!(schema = %schema_name, "root planning attempt discarded");
                    last_blocker.get_or_insert(blocker);
                }
                PlanAttempt::Planned(_) => {
                    trace!(schema = %schema_name, "root planning attempt discarded");
                }
            }
        }

        // `__typename` carries no weight, so an operation made of nothing
        // else never produces a candidate schema. Any source of the query
        // root can answer it; the smallest name keeps the choice
        // deterministic.
        if !remaining.is_empty()
            && remaining
                .iter()
                .all(|item| item.field().name == TYPENAME_FIELD)
        {
            if let Some(schema_name) = query_type.sources.keys().min() {
                let mut operation_node = OperationPlanNode::new(schema_name, &query_type.name);
                operation_node.selections = remaining
                    .iter()
                    .map(|item| typename_plan_node(item.field()))
                    .collect();
                root.nodes.push(fold_shared_conditions(operation_node, false));
                remaining.clear();
            }
        }

        if let Some(item) = remaining.first() {
            let (type_name, field_name) = match last_blocker {
                Some(blocker) => (blocker.type_name, blocker.field_name),
                None => (query_type.name.clone(), item.field().name.clone()),
            };
            return Err(PlanningError::Unsatisfiable {
                type_name,
                field_name,
            });
        }

        bind_operation_variables(operation, &mut root);

        Ok(root)
    }

    /// Attempts to place every selection of `selection_nodes` (declared on
    /// `declaring_type`) into the operation currently targeting
    /// `schema_name`.
    ///
    /// `PlanAttempt::Planned` carries the accepted fields;
    /// `PlanAttempt::Blocked` means the attempt is unplannable and must be
    /// discarded by the caller — a frequent, expected outcome of the
    /// search, not an error — and names the innermost field that stopped
    /// it. `Err` is reserved for invariant violations. Lookup sub-plans
    /// spawned along the way accumulate in `child_nodes` and are only kept
    /// when the surrounding attempt succeeds.
    ///
    /// `skip_unresolved` suppresses lookup bridging entirely: unresolved
    /// fields are tolerated and simply left out, which callers use to probe
    /// a branch without recursing into lookup exploration.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn plan_selections(
        &self,
        schema_name: &str,
        declaring_type: &'a CompositeType,
        selection_nodes: &[SelectionItem],
        path: &mut Vec<PathSegment<'a>>,
        child_nodes: &mut Vec<PlanNode>,
        is_operation_root: bool,
        skip_unresolved: bool,
    ) -> Result<PlanAttempt, PlanningError> {
        let mut fields: Vec<FieldPlanNode> = Vec::new();
        let mut unresolved: Vec<UnresolvedField<'_, 'a>> = Vec::new();
        let mut conditional_selections_removed = false;
        let mut blocked: Option<PlanBlocker> = None;

        for item in selection_nodes {
            let field_node = item.field();

            if is_statically_skipped(&field_node.directives) {
                conditional_selections_removed = true;
                continue;
            }

            if field_node.name == TYPENAME_FIELD {
                fields.push(typename_plan_node(field_node));
                continue;
            }

            let field = declaring_type.field(&field_node.name).ok_or_else(|| {
                PlanInvariantError::UnknownField {
                    type_name: declaring_type.name.clone(),
                    field_name: field_node.name.clone(),
                }
            })?;

            // Root selections were assigned to this schema by weighting and
            // are trusted to be resolvable here.
            if is_operation_root || field.sources.contains(schema_name) {
                let field_type_kind = self
                    .schema
                    .type_kind(&field.type_name)
                    .ok_or_else(|| PlanInvariantError::UnknownType(field.type_name.clone()))?;

                // A field without a selection set must be a leaf; it can be
                // included as-is with no further processing.
                if field_node.selections.is_empty() {
                    if !field_type_kind.is_leaf() {
                        return Err(PlanInvariantError::CompositeFieldWithoutSelections {
                            type_name: declaring_type.name.clone(),
                            field_name: field.name.clone(),
                        }
                        .into());
                    }
                    fields.push(field_plan_node(field_node, field, None));
                    continue;
                }

                if field_type_kind.is_leaf() {
                    return Err(PlanInvariantError::LeafFieldWithSelections {
                        type_name: declaring_type.name.clone(),
                        field_name: field.name.clone(),
                    }
                    .into());
                }

                let output_type = self
                    .schema
                    .type_def(&field.type_name)
                    .ok_or_else(|| PlanInvariantError::UnknownType(field.type_name.clone()))?;

                let mut subtree_children = Vec::new();
                path.push(PathSegment {
                    field: Some(field),
                    output_type,
                });
                let planned = self.plan_selections(
                    schema_name,
                    output_type,
                    &field_node.selections.items,
                    path,
                    &mut subtree_children,
                    false,
                    skip_unresolved,
                )?;
                path.pop();

                match planned {
                    PlanAttempt::Planned(children) => {
                        child_nodes.extend(subtree_children);
                        fields.push(field_plan_node(field_node, field, Some(children)));
                    }
                    // The subtree could not be completed here; backtrack
                    // and retry the whole field through a lookup. Its
                    // blocker is remembered in case the retry fails too.
                    PlanAttempt::Blocked(subtree_blocker) => {
                        blocked.get_or_insert(subtree_blocker);
                        unresolved.push(UnresolvedField { field_node, field });
                    }
                }
            } else {
                unresolved.push(UnresolvedField { field_node, field });
            }
        }

        // Removing conditional selections may not leave the operation root
        // without selections; such an attempt is discarded entirely.
        if conditional_selections_removed && fields.is_empty() && is_operation_root {
            return Ok(PlanAttempt::Blocked(PlanBlocker {
                type_name: declaring_type.name.clone(),
                field_name: selection_nodes
                    .first()
                    .map(|item| item.field().name.clone())
                    .unwrap_or_default(),
            }));
        }

        let resolved = skip_unresolved
            || unresolved.is_empty()
            || self.resolve_unresolved(declaring_type, &unresolved, path, child_nodes)?;
        if !resolved {
            let blocker = blocked.unwrap_or_else(|| PlanBlocker {
                type_name: declaring_type.name.clone(),
                field_name: unresolved
                    .first()
                    .map(|unresolved_field| unresolved_field.field.name.clone())
                    .unwrap_or_default(),
            });
            return Ok(PlanAttempt::Blocked(blocker));
        }

        // A composite field's selection set must never end up empty; keep
        // it valid with a synthetic __typename.
        if fields.is_empty() && !is_operation_root {
            fields.push(FieldPlanNode::typename());
        }

        Ok(PlanAttempt::Planned(fields))
    }
}

fn root_field_resolvable(
    query_type: &CompositeType,
    field_node: &FieldSelection,
    schema_name: &str,
) -> bool {
    if field_node.name == TYPENAME_FIELD {
        return true;
    }

    query_type
        .field(&field_node.name)
        .is_some_and(|field| field.sources.contains(schema_name))
}

fn field_plan_node(
    field_node: &FieldSelection,
    field: &OutputField,
    selections: Option<Vec<FieldPlanNode>>,
) -> FieldPlanNode {
    FieldPlanNode {
        alias: field_node.alias.clone(),
        name: field_node.name.clone(),
        arguments: field_node.arguments.clone(),
        type_name: field.type_name.clone(),
        conditions: extract_conditions(&field_node.directives),
        selections,
    }
}

fn typename_plan_node(field_node: &FieldSelection) -> FieldPlanNode {
    let mut node = FieldPlanNode::typename();
    node.alias = field_node.alias.clone();
    node.conditions = extract_conditions(&field_node.directives);
    node
}

pub(crate) fn collect_variable_names(fields: &[FieldPlanNode], used: &mut FxHashSet<String>) {
    for field in fields {
        for (_, value) in &field.arguments {
            value.collect_variables(used);
        }
        for condition in &field.conditions {
            used.insert(condition.variable_name.clone());
        }
        if let Some(selections) = &field.selections {
            collect_variable_names(selections, used);
        }
    }
}

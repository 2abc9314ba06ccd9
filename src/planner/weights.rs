use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::selection_set::SelectionItem;
use crate::state::composite_schema::CompositeType;

use super::error::PlanInvariantError;
use super::UnresolvedField;

/// Counts, per source schema, how many of the selection set's fields that
/// schema can resolve. Used to order root planning attempts.
pub(crate) fn weigh_selection_set(
    operation_type: &CompositeType,
    selections: &[&SelectionItem],
) -> Result<FxHashMap<String, usize>, PlanInvariantError> {
    let mut counts = FxHashMap::default();

    for item in selections {
        let field_node = item.field();
        if field_node.name == "__typename" {
            continue;
        }

        let field = operation_type.field(&field_node.name).ok_or_else(|| {
            PlanInvariantError::UnknownField {
                type_name: operation_type.name.clone(),
                field_name: field_node.name.clone(),
            }
        })?;

        for schema_name in &field.sources {
            *counts.entry(schema_name.clone()).or_insert(0) += 1;
        }
    }

    Ok(counts)
}

/// Same policy over an unresolved-field batch, with already-attempted
/// schemas removed from the outcome.
pub(crate) fn weigh_unresolved_fields(
    unresolved: &[UnresolvedField<'_, '_>],
    skip_schema_names: &FxHashSet<String>,
) -> FxHashMap<String, usize> {
    let mut counts = FxHashMap::default();

    for unresolved_field in unresolved {
        for schema_name in &unresolved_field.field.sources {
            *counts.entry(schema_name.clone()).or_insert(0) += 1;
        }
    }

    for schema_name in skip_schema_names {
        counts.remove(schema_name);
    }

    counts
}

/// Schemas in descending weight order. Ties break by name so that two runs
/// over the same inputs pick the same schemas.
pub(crate) fn schemas_by_weight(counts: FxHashMap<String, usize>) -> Vec<String> {
    let mut weighted: Vec<(String, usize)> = counts.into_iter().collect();
    weighted.sort_by(|(a_name, a_count), (b_name, b_count)| {
        b_count.cmp(a_count).then_with(|| a_name.cmp(b_name))
    });
    weighted.into_iter().map(|(name, _)| name).collect()
}

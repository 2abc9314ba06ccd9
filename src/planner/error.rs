/// Violations of contracts upstream validation is expected to uphold, or
/// planner bugs. These abort planning immediately; a structurally invalid
/// plan is worse than no plan.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanInvariantError {
    #[error("unknown field '{field_name}' in the selection set of type '{type_name}'")]
    UnknownField {
        type_name: String,
        field_name: String,
    },
    #[error("type '{0}' is not defined in the composite schema")]
    UnknownType(String),
    #[error("leaf field '{field_name}' on type '{type_name}' cannot carry a selection set")]
    LeafFieldWithSelections {
        type_name: String,
        field_name: String,
    },
    #[error("field '{field_name}' on type '{type_name}' resolves to a composite type and requires a selection set")]
    CompositeFieldWithoutSelections {
        type_name: String,
        field_name: String,
    },
    #[error("source schema '{schema_name}' exposes entity type '{type_name}' without any lookup")]
    MissingLookup {
        schema_name: String,
        type_name: String,
    },
    #[error("the composite schema has no query root type")]
    MissingQueryRoot,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanningError {
    #[error("failed to locate an executable operation to plan")]
    MissingOperation,
    /// Expected outcome of the search when no schema combination covers a
    /// field; surfaced to callers as "operation not satisfiable", never as
    /// an internal fault.
    #[error("operation is not satisfiable by the composite schema: field '{field_name}' on type '{type_name}' cannot be resolved by any source schema")]
    Unsatisfiable {
        type_name: String,
        field_name: String,
    },
    #[error("planning invariant violated: {0}")]
    Invariant(#[from] PlanInvariantError),
}

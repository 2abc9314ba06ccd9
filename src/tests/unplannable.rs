use crate::planner::{PlanInvariantError, PlanningError};
use crate::tests::testkit::{build_plan, init_logger};
use crate::utils::parsing::parse_operation;

const ECOMMERCE: &str = "fixture/tests/ecommerce.composite.graphql";

#[test]
fn field_without_any_reachable_schema_is_unsatisfiable() {
    init_logger();
    // `legacySku` only exists in a schema that no lookup can reach; the
    // error names that field, not its root ancestor.
    let error = build_plan(ECOMMERCE, parse_operation("{ products { id legacySku } }"))
        .expect_err("plan should fail");
    assert!(matches!(
        error,
        PlanningError::Unsatisfiable {
            ref type_name,
            ref field_name,
        } if type_name == "Product" && field_name == "legacySku"
    ));
}

#[test]
fn shared_type_without_an_entity_boundary_is_unsatisfiable() {
    init_logger();
    let error = build_plan(
        "fixture/tests/no-entity.composite.graphql",
        parse_operation("{ settings { locale timezone } }"),
    )
    .expect_err("plan should fail");
    assert!(matches!(
        error,
        PlanningError::Unsatisfiable {
            ref type_name,
            ref field_name,
        } if type_name == "Settings" && field_name == "timezone"
    ));
}

#[test]
fn entity_source_without_a_lookup_is_an_invariant_violation() {
    init_logger();
    let error = build_plan(
        "fixture/tests/missing-lookup.composite.graphql",
        parse_operation("{ products { name price } }"),
    )
    .expect_err("plan should fail");
    assert!(matches!(
        error,
        PlanningError::Invariant(PlanInvariantError::MissingLookup {
            ref schema_name,
            ref type_name,
        }) if schema_name == "pricing" && type_name == "Product"
    ));
}

#[test]
fn unknown_nested_field_is_reported() {
    init_logger();
    let error = build_plan(ECOMMERCE, parse_operation("{ products { bogus } }"))
        .expect_err("plan should fail");
    assert!(matches!(
        error,
        PlanningError::Invariant(PlanInvariantError::UnknownField {
            ref type_name,
            ref field_name,
        }) if type_name == "Product" && field_name == "bogus"
    ));
}

#[test]
fn unknown_root_field_is_reported() {
    init_logger();
    let error =
        build_plan(ECOMMERCE, parse_operation("{ bogus }")).expect_err("plan should fail");
    assert!(matches!(
        error,
        PlanningError::Invariant(PlanInvariantError::UnknownField { ref type_name, .. })
            if type_name == "Query"
    ));
}

#[test]
fn leaf_field_with_a_selection_set_is_rejected() {
    init_logger();
    let error = build_plan(ECOMMERCE, parse_operation("{ products { name { id } } }"))
        .expect_err("plan should fail");
    assert!(matches!(
        error,
        PlanningError::Invariant(PlanInvariantError::LeafFieldWithSelections { .. })
    ));
}

#[test]
fn composite_field_without_a_selection_set_is_rejected() {
    init_logger();
    let error =
        build_plan(ECOMMERCE, parse_operation("{ products }")).expect_err("plan should fail");
    assert!(matches!(
        error,
        PlanningError::Invariant(PlanInvariantError::CompositeFieldWithoutSelections { .. })
    ));
}

#[test]
fn document_without_a_matching_operation_is_rejected() {
    init_logger();
    let error = build_plan(
        ECOMMERCE,
        parse_operation("fragment ProductParts on Product { id }"),
    )
    .expect_err("plan should fail");
    assert!(matches!(error, PlanningError::MissingOperation));
}

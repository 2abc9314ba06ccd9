mod entities;
mod include_skip;
mod unplannable;

use crate::ast::document::extract_operation;
use crate::ast::selection_set::SelectionItem;
use crate::planner::{OperationPlanner, PlanAttempt};
use crate::tests::testkit::{init_logger, read_composite_schema};
use crate::utils::parsing::parse_operation;

#[test]
fn probing_with_skip_unresolved_tolerates_missing_fields() {
    init_logger();
    let schema = read_composite_schema("fixture/tests/ecommerce.composite.graphql");
    let planner = OperationPlanner::new(&schema);
    let document = parse_operation("{ products { name price } }");
    let operation = extract_operation(&document, None).unwrap();

    let SelectionItem::Field(products) = &operation.selection_set.items[0];
    let product_type = schema.type_def("Product").unwrap();

    let mut path = Vec::new();
    let mut child_nodes = Vec::new();
    let planned = match planner
        .plan_selections(
            "catalog",
            product_type,
            &products.selections.items,
            &mut path,
            &mut child_nodes,
            false,
            true,
        )
        .unwrap()
    {
        PlanAttempt::Planned(planned) => planned,
        PlanAttempt::Blocked(blocker) => panic!(
            "attempt unexpectedly blocked at {}.{}",
            blocker.type_name, blocker.field_name
        ),
    };

    // `price` is not resolvable in catalog; probing leaves it out without
    // spawning any lookup branch.
    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].name, "name");
    assert!(child_nodes.is_empty());
}

use crate::tests::testkit::{build_plan, init_logger};
use crate::utils::parsing::parse_operation;

const ECOMMERCE: &str = "fixture/tests/ecommerce.composite.graphql";

#[test]
fn bridges_foreign_field_through_lookup() {
    init_logger();
    let plan = build_plan(ECOMMERCE, parse_operation("{ products { id name price } }")).unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "catalog") {
        query {products {id name}}
        Operation(schema: "pricing") {
          query {productById {price}}
        },
      },
    }
    "#);
}

#[test]
fn weighting_batches_fields_into_the_heaviest_schema() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation("{ products { name price discount reviews { body } } }"),
    )
    .unwrap();
    // pricing resolves two of the unresolved fields and is visited first.
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "catalog") {
        query {products {name}}
        Operation(schema: "pricing") {
          query {productById {price discount}}
        },
        Operation(schema: "reviews") {
          query {productById {reviews {body}}}
        },
      },
    }
    "#);
}

#[test]
fn splits_a_batch_across_multiple_lookups() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation("{ products { name price reviews { body } } }"),
    )
    .unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "catalog") {
        query {products {name}}
        Operation(schema: "pricing") {
          query {productById {price}}
        },
        Operation(schema: "reviews") {
          query {productById {reviews {body}}}
        },
      },
    }
    "#);
}

#[test]
fn lookup_reaches_below_the_entity_boundary() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation("{ products { dimensions { width weight } } }"),
    )
    .unwrap();
    // Dimensions is not an entity; the lookup is discovered on Product and
    // the planned fields sit directly under it at their own depth.
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "catalog") {
        query {products {dimensions {width}}}
        Operation(schema: "pricing") {
          query {productById {weight}}
        },
      },
    }
    "#);
}

#[test]
fn blocked_entity_path_falls_through_to_the_next_candidate() {
    init_logger();
    let plan = build_plan(
        "fixture/tests/blocked-hop.composite.graphql",
        parse_operation("{ products { shipping { eta cost carrier } } }"),
    )
    .unwrap();
    // inventory is tried first but cannot traverse `shipping` from the
    // Product entity; logistics hosts the lookup instead.
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "storefront") {
        query {products {shipping {eta}}}
        Operation(schema: "logistics") {
          query {productById {cost carrier}}
        },
      },
    }
    "#);
}

#[test]
fn emptied_parent_keeps_a_typename_placeholder() {
    init_logger();
    let plan = build_plan(ECOMMERCE, parse_operation("{ products { price } }")).unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "catalog") {
        query {products {__typename}}
        Operation(schema: "pricing") {
          query {productById {price}}
        },
      },
    }
    "#);
}

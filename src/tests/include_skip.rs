use crate::tests::testkit::{build_plan, init_logger};
use crate::utils::parsing::parse_operation;

const ECOMMERCE: &str = "fixture/tests/ecommerce.composite.graphql";

#[test]
fn literal_skip_removes_the_selection() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation("{ products { id name @skip(if: true) } }"),
    )
    .unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "catalog") {
        query {products {id}}
      },
    }
    "#);
}

#[test]
fn literal_include_false_removes_the_selection() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation("{ products { id name @include(if: false) } }"),
    )
    .unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "catalog") {
        query {products {id}}
      },
    }
    "#);
}

#[test]
fn static_skip_wins_over_a_variable_include() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation(
            "query($flag: Boolean!) { products { id name @skip(if: true) @include(if: $flag) } }",
        ),
    )
    .unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "catalog") {
        query {products {id}}
      },
    }
    "#);
}

#[test]
fn statically_emptied_selection_set_keeps_a_typename() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation("{ products { name @skip(if: true) } }"),
    )
    .unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "catalog") {
        query {products {__typename}}
      },
    }
    "#);
}

#[test]
fn statically_emptied_operation_yields_an_empty_plan() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation("{ products @skip(if: true) { id } }"),
    )
    .unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
    }
    "#);
}

#[test]
fn variable_conditions_stay_on_unshared_selections() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation("query($a: Boolean!) { products { id @include(if: $a) name } }"),
    )
    .unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "catalog") {
        query($a: Boolean!) {products {id @include(if: $a) name}}
      },
    }
    "#);
}

#[test]
fn shared_root_condition_is_hoisted() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation("query($a: Boolean!) { products @include(if: $a) { id } }"),
    )
    .unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Include(if: $a) {
        Operation(schema: "catalog") {
          query {products {id}}
        },
      },
    }
    "#);
}

#[test]
fn shared_conditions_nest_in_declaration_order() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation(
            "query($a: Boolean!, $b: Boolean!) { products @include(if: $a) @skip(if: $b) { id } }",
        ),
    )
    .unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Include(if: $a) {
        Skip(if: $b) {
          Operation(schema: "catalog") {
            query {products {id}}
          },
        },
      },
    }
    "#);
}

#[test]
fn skip_condition_shared_by_all_roots_is_hoisted() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation(
            "query($off: Boolean!) { products @skip(if: $off) { id } categories @skip(if: $off) }",
        ),
    )
    .unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Skip(if: $off) {
        Operation(schema: "catalog") {
          query {products {id} categories}
        },
      },
    }
    "#);
}

#[test]
fn partially_shared_conditions_are_not_hoisted() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation("query($a: Boolean!) { products @include(if: $a) { id } categories }"),
    )
    .unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "catalog") {
        query($a: Boolean!) {products @include(if: $a) {id} categories}
      },
    }
    "#);
}

#[test]
fn lookup_operation_folds_its_own_conditions() {
    init_logger();
    let plan = build_plan(
        ECOMMERCE,
        parse_operation("query($inc: Boolean!) { products { name price @include(if: $inc) } }"),
    )
    .unwrap();
    insta::assert_snapshot!(format!("{}", plan), @r#"
    QueryPlan {
      Operation(schema: "catalog") {
        query {products {name}}
        Include(if: $inc) {
          Operation(schema: "pricing") {
            query {productById {price}}
          },
        },
      },
    }
    "#);
}

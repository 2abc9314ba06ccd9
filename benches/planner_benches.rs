use composite_query_planner::utils::parsing::parse_operation;
use composite_query_planner::{CompositeSchema, OperationPlanner};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn read_schema() -> CompositeSchema {
    let sdl = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/fixture/tests/ecommerce.composite.graphql"
    ))
    .expect("Unable to read input file");
    CompositeSchema::parse(&sdl).expect("failed to build composite schema")
}

fn plan_ecommerce_operation(c: &mut Criterion) {
    let schema = read_schema();
    let planner = OperationPlanner::new(&schema);
    let document = parse_operation(
        "query($a: Boolean!) { \
           products { id name price discount dimensions { width weight } reviews { body author } } \
           topReviews { id body } \
           categories @include(if: $a) \
         }",
    );

    c.bench_function("plan_ecommerce_operation", |b| {
        b.iter(|| {
            let plan = planner
                .create_plan(black_box(&document), None)
                .expect("plan should succeed");
            black_box(plan)
        })
    });
}

criterion_group!(benches, plan_ecommerce_operation);
criterion_main!(benches);

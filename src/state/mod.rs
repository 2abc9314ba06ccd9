pub mod composite_schema;

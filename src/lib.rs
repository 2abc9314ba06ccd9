pub mod ast;
pub mod planner;
pub mod state;
pub mod utils;

#[cfg(test)]
mod tests;

pub use planner::{OperationPlanner, PlanningError};
pub use state::composite_schema::CompositeSchema;

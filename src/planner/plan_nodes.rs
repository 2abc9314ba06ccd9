use std::fmt::{Display, Formatter as FmtFormatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::ast::operation::VariableDefinition;
use crate::ast::value::Value;
use crate::utils::pretty_display::{get_indent, PrettyDisplay};

use super::conditions::Condition;

/// The planned forest: one node per source-schema operation, optionally
/// wrapped in condition chains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RootPlanNode {
    pub nodes: Vec<PlanNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlanNode {
    Operation(OperationPlanNode),
    Condition(ConditionPlanNode),
}

/// A sub-operation to execute against a single source schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationPlanNode {
    pub schema_name: String,
    pub root_type_name: String,
    pub selections: Vec<FieldPlanNode>,
    /// Lookup sub-plans spawned for fields this schema could not resolve.
    pub child_nodes: Vec<PlanNode>,
    /// Bound after the forest is complete, see `bind_operation_variables`.
    pub variable_definitions: Vec<VariableDefinition>,
}

impl OperationPlanNode {
    pub fn new(schema_name: impl Into<String>, root_type_name: impl Into<String>) -> Self {
        OperationPlanNode {
            schema_name: schema_name.into(),
            root_type_name: root_type_name.into(),
            selections: Vec::new(),
            child_nodes: Vec::new(),
            variable_definitions: Vec::new(),
        }
    }
}

/// A field accepted into a plan. `selections` is `None` for leaf fields;
/// `conditions` is the only part mutated after construction (condition
/// folding removes entries).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPlanNode {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<(String, Value)>,
    /// Named type this field resolves to; the declaring type of its children.
    pub type_name: String,
    pub conditions: Vec<Condition>,
    pub selections: Option<Vec<FieldPlanNode>>,
}

impl FieldPlanNode {
    pub fn typename() -> Self {
        FieldPlanNode {
            alias: None,
            name: "__typename".to_string(),
            arguments: Vec::new(),
            type_name: "String".to_string(),
            conditions: Vec::new(),
            selections: None,
        }
    }

    pub fn remove_condition(&mut self, condition: &Condition) {
        self.conditions.retain(|c| c != condition);
    }

    pub fn response_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// A branch taken only when `variable_name` evaluates to `passing_value`.
/// Shared conditions nest linearly, the innermost node wraps an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionPlanNode {
    pub variable_name: String,
    pub passing_value: bool,
    pub node: Box<PlanNode>,
}

impl Display for RootPlanNode {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        self.pretty_fmt(f, 0)
    }
}

impl PrettyDisplay for RootPlanNode {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);
        writeln!(f, "{indent}QueryPlan {{")?;
        for node in &self.nodes {
            node.pretty_fmt(f, depth + 1)?;
        }
        write!(f, "{indent}}}")
    }
}

impl PrettyDisplay for PlanNode {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        match self {
            PlanNode::Operation(operation) => operation.pretty_fmt(f, depth),
            PlanNode::Condition(condition) => condition.pretty_fmt(f, depth),
        }
    }
}

impl PrettyDisplay for OperationPlanNode {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);
        writeln!(f, "{indent}Operation(schema: \"{}\") {{", self.schema_name)?;
        writeln!(f, "{}{}", get_indent(depth + 1), self)?;
        for child in &self.child_nodes {
            child.pretty_fmt(f, depth + 1)?;
        }
        writeln!(f, "{indent}}},")
    }
}

impl PrettyDisplay for ConditionPlanNode {
    fn pretty_fmt(&self, f: &mut FmtFormatter<'_>, depth: usize) -> FmtResult {
        let indent = get_indent(depth);
        let keyword = if self.passing_value { "Include" } else { "Skip" };
        writeln!(f, "{indent}{keyword}(if: ${}) {{", self.variable_name)?;
        self.node.pretty_fmt(f, depth + 1)?;
        writeln!(f, "{indent}}},")
    }
}

/// Compact single-line GraphQL document of this sub-operation.
impl Display for OperationPlanNode {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        write!(f, "query")?;
        if !self.variable_definitions.is_empty() {
            write!(f, "(")?;
            for (i, definition) in self.variable_definitions.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", definition)?;
            }
            write!(f, ")")?;
        }
        write!(f, " ")?;
        fmt_selections(f, &self.selections)
    }
}

impl Display for FieldPlanNode {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        if let Some(alias) = &self.alias {
            write!(f, "{}: ", alias)?;
        }
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "(")?;
            for (i, (name, value)) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", name, value)?;
            }
            write!(f, ")")?;
        }
        for condition in &self.conditions {
            let directive = if condition.passing_value {
                "include"
            } else {
                "skip"
            };
            write!(f, " @{}(if: ${})", directive, condition.variable_name)?;
        }
        if let Some(selections) = &self.selections {
            write!(f, " ")?;
            fmt_selections(f, selections)?;
        }
        Ok(())
    }
}

fn fmt_selections(f: &mut FmtFormatter<'_>, selections: &[FieldPlanNode]) -> FmtResult {
    write!(f, "{{")?;
    for (i, selection) in selections.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", selection)?;
    }
    write!(f, "}}")
}

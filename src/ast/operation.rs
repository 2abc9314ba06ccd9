use std::fmt::Display;

use graphql_parser::query as parser;
use serde::{Deserialize, Serialize};

use super::selection_set::SelectionSet;
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
            OperationKind::Subscription => write!(f, "subscription"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDefinition {
    pub name: Option<String>,
    pub operation_kind: OperationKind,
    pub selection_set: SelectionSet,
    pub variable_definitions: Vec<VariableDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeNode {
    Named(String),
    List(Box<TypeNode>),
    NonNull(Box<TypeNode>),
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeNode::Named(name) => write!(f, "{}", name),
            TypeNode::List(inner) => write!(f, "[{}]", inner),
            TypeNode::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

impl TypeNode {
    /// The innermost named type, with list and non-null wrappers stripped.
    pub fn named_type(&self) -> &str {
        match self {
            TypeNode::Named(name) => name,
            TypeNode::List(inner) => inner.named_type(),
            TypeNode::NonNull(inner) => inner.named_type(),
        }
    }
}

impl From<&parser::Type<'_, String>> for TypeNode {
    fn from(parser_type: &parser::Type<'_, String>) -> Self {
        match parser_type {
            parser::Type::NamedType(name) => TypeNode::Named(name.clone()),
            parser::Type::ListType(inner) => TypeNode::List(Box::new(inner.as_ref().into())),
            parser::Type::NonNullType(inner) => TypeNode::NonNull(Box::new(inner.as_ref().into())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    pub variable_type: TypeNode,
    pub default_value: Option<Value>,
}

impl Display for VariableDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.default_value {
            Some(default_value) => write!(
                f,
                "${}: {} = {}",
                self.name, self.variable_type, default_value
            ),
            None => write!(f, "${}: {}", self.name, self.variable_type),
        }
    }
}

impl From<&parser::VariableDefinition<'_, String>> for VariableDefinition {
    fn from(definition: &parser::VariableDefinition<'_, String>) -> Self {
        VariableDefinition {
            name: definition.name.clone(),
            variable_type: (&definition.var_type).into(),
            default_value: definition.default_value.as_ref().map(Value::from),
        }
    }
}

impl From<&parser::OperationDefinition<'_, String>> for OperationDefinition {
    fn from(operation: &parser::OperationDefinition<'_, String>) -> Self {
        match operation {
            parser::OperationDefinition::SelectionSet(selection_set) => OperationDefinition {
                name: None,
                operation_kind: OperationKind::Query,
                selection_set: selection_set.into(),
                variable_definitions: Vec::new(),
            },
            parser::OperationDefinition::Query(query) => OperationDefinition {
                name: query.name.clone(),
                operation_kind: OperationKind::Query,
                selection_set: (&query.selection_set).into(),
                variable_definitions: query
                    .variable_definitions
                    .iter()
                    .map(VariableDefinition::from)
                    .collect(),
            },
            parser::OperationDefinition::Mutation(mutation) => OperationDefinition {
                name: mutation.name.clone(),
                operation_kind: OperationKind::Mutation,
                selection_set: (&mutation.selection_set).into(),
                variable_definitions: mutation
                    .variable_definitions
                    .iter()
                    .map(VariableDefinition::from)
                    .collect(),
            },
            parser::OperationDefinition::Subscription(subscription) => OperationDefinition {
                name: subscription.name.clone(),
                operation_kind: OperationKind::Subscription,
                selection_set: (&subscription.selection_set).into(),
                variable_definitions: subscription
                    .variable_definitions
                    .iter()
                    .map(VariableDefinition::from)
                    .collect(),
            },
        }
    }
}

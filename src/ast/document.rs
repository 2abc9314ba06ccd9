use graphql_parser::query::{Definition, Document, OperationDefinition as ParserOperation};

use super::operation::OperationDefinition;

/// Picks the operation to plan from a parsed document.
///
/// With an explicit name only the matching named operation is returned;
/// without one the first executable operation wins.
pub fn extract_operation(
    document: &Document<'_, String>,
    operation_name: Option<&str>,
) -> Option<OperationDefinition> {
    document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            Definition::Operation(operation) => Some(operation),
            Definition::Fragment(_) => None,
        })
        .find(|operation| match operation_name {
            Some(name) => parser_operation_name(operation) == Some(name),
            None => true,
        })
        .map(OperationDefinition::from)
}

fn parser_operation_name<'a>(operation: &'a ParserOperation<'_, String>) -> Option<&'a str> {
    match operation {
        ParserOperation::SelectionSet(_) => None,
        ParserOperation::Query(query) => query.name.as_deref(),
        ParserOperation::Mutation(mutation) => mutation.name.as_deref(),
        ParserOperation::Subscription(subscription) => subscription.name.as_deref(),
    }
}

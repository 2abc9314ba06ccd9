use graphql_parser::query;

#[inline]
pub fn parse_operation(operation: &str) -> query::Document<'_, String> {
    graphql_parser::parse_query(operation).unwrap()
}

#[inline]
pub fn safe_parse_operation(
    operation: &str,
) -> Result<query::Document<'_, String>, query::ParseError> {
    graphql_parser::parse_query(operation)
}

use graphql_parser::query::Directive as ParserDirective;
use serde::{Deserialize, Serialize};

use super::value::Value;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Directive {
    pub name: String,
    pub arguments: Vec<(String, Value)>,
}

impl Directive {
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|(argument_name, _)| argument_name == name)
            .map(|(_, value)| value)
    }
}

impl From<&ParserDirective<'_, String>> for Directive {
    fn from(directive: &ParserDirective<'_, String>) -> Self {
        Directive {
            name: directive.name.clone(),
            arguments: directive
                .arguments
                .iter()
                .map(|(name, value)| (name.clone(), Value::from(value)))
                .collect(),
        }
    }
}
